//! The main game module for the endless jumper.
//!
//! This module contains all the gameplay logic including:
//! - Player physics and platform collision response
//! - Procedural platform generation ahead of the camera
//! - Enemies, bonuses and bullets
//! - The monotonically climbing camera
//! - Score tracking and the restart flow
//!
//! The simulation advances in `FixedUpdate`. One logical tick runs the
//! chained [`SimSet`] phases: player physics (input, integration, firing,
//! collision response) -> enemy fire and hit resolution -> bullet motion and
//! culling -> platform sliding, pruning and generation -> camera follow.
//! Deferred `Commands` flush between phases, so removals scheduled during
//! collision response are applied before generation runs.

mod bonus;
mod bullet;
mod camera;
mod collide;
pub mod config;
mod debug;
mod enemy;
pub mod input;
mod level;
mod platform;
mod player;
pub mod score;

use bevy::prelude::*;

use crate::{PausableSystems, screens::Screen};

pub(super) fn plugin(app: &mut App) {
    app.add_message::<RestartGame>();

    app.configure_sets(
        FixedUpdate,
        (
            SimSet::Player,
            SimSet::Enemies,
            SimSet::Bullets,
            SimSet::Level,
            SimSet::Camera,
        )
            .chain()
            .in_set(PausableSystems)
            .run_if(in_state(Screen::Gameplay)),
    );

    app.add_plugins((
        bonus::plugin,
        bullet::plugin,
        camera::plugin,
        debug::plugin,
        enemy::plugin,
        input::plugin,
        level::plugin,
        platform::plugin,
        player::plugin,
        score::plugin,
    ));
}

/// The ordered phases of one simulation tick.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimSet {
    Player,
    Enemies,
    Bullets,
    Level,
    Camera,
}

/// Message to restart the current run in place after a death.
/// Every gameplay module re-arms its own state when this fires.
#[derive(Message, Debug, Clone)]
pub struct RestartGame;
