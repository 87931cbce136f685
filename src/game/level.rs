//! Platform generation and the live registry.
//!
//! The [`Level`] resource owns the live platforms in generation order; the
//! last entry is the topmost and anchors the next spawn. Every tick the
//! level phase slides the moving platforms, prunes whatever dropped out of
//! view (or shattered under the player earlier in the tick), then tops the
//! field back up to `max_count` platforms, each a random gap above the last.

use bevy::prelude::*;
use rand::Rng;

use super::{
    RestartGame, SimSet,
    camera::CameraScroll,
    config::GameConfig,
    platform::{Platform, PlatformLayout, slide_platforms, spawn_platform},
};
use crate::screens::Screen;

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<Level>();
    app.register_type::<Level>();

    app.add_systems(OnEnter(Screen::Gameplay), init_level);
    app.add_systems(OnExit(Screen::Gameplay), forget_platforms);

    app.add_systems(
        FixedUpdate,
        (slide_platforms, prune_platforms, generate_platforms)
            .chain()
            .in_set(SimSet::Level),
    );
    app.add_systems(
        Update,
        reset_on_restart.run_if(in_state(Screen::Gameplay)),
    );
}

/// The live platform registry.
#[derive(Resource, Debug, Default, Reflect)]
#[reflect(Resource)]
pub struct Level {
    /// Live platforms in generation order; the last is the topmost.
    #[reflect(ignore)]
    platforms: Vec<Entity>,
    /// World y of the most recently generated platform.
    anchor_y: f32,
}

impl Level {
    pub fn live(&self) -> &[Entity] {
        &self.platforms
    }
}

/// Where the base platform sits: centered, a third of the window below the
/// start of the view, right under the player's spawn point.
fn base_position(config: &GameConfig) -> Vec2 {
    Vec2::new(0.0, -config.window.height / 3.0)
}

fn spawn_base(commands: &mut Commands, config: &GameConfig, level: &mut Level) {
    let position = base_position(config);
    let entity = spawn_platform(commands, config, position, PlatformLayout::solid());
    level.platforms.push(entity);
    level.anchor_y = position.y;
}

fn init_level(mut commands: Commands, config: Res<GameConfig>, mut level: ResMut<Level>) {
    level.platforms.clear();
    spawn_base(&mut commands, &config, &mut level);
}

/// Drop out-of-view platforms and any registry entry whose entity already
/// shattered under the player this tick.
fn prune_platforms(
    mut commands: Commands,
    config: Res<GameConfig>,
    scroll: Res<CameraScroll>,
    mut level: ResMut<Level>,
    platforms: Query<&Transform, With<Platform>>,
) {
    let cutoff = scroll.view_bottom(&config.window);
    let live = std::mem::take(&mut level.platforms);
    let mut kept = Vec::with_capacity(live.len());
    for entity in live {
        let Ok(tf) = platforms.get(entity) else {
            // Already despawned (broke under the player).
            continue;
        };
        let top = tf.translation.y + config.platform.height / 2.0;
        if top < cutoff {
            commands.entity(entity).despawn();
        } else {
            kept.push(entity);
        }
    }
    level.platforms = kept;
}

/// Top the field back up to the configured platform count.
fn generate_platforms(mut commands: Commands, config: Res<GameConfig>, mut level: ResMut<Level>) {
    let mut rng = rand::rng();

    if level.platforms.is_empty() {
        spawn_base(&mut commands, &config, &mut level);
    }

    let deficit = config.platform.max_count.saturating_sub(level.live().len());
    let reach = config.window.half_width() - config.platform.width / 2.0;
    for _ in 0..deficit {
        let gap = rng.random_range(config.platform.gap_min..=config.platform.gap_max);
        let x = rng.random_range(-reach..=reach);
        let y = level.anchor_y + gap;
        let layout = PlatformLayout::roll(&config.chances, &mut rng);
        let entity = spawn_platform(&mut commands, &config, Vec2::new(x, y), layout);
        level.platforms.push(entity);
        level.anchor_y = y;
    }
}

/// Rebuild the field from scratch for a fresh run.
fn reset_on_restart(
    mut commands: Commands,
    mut restart: MessageReader<RestartGame>,
    config: Res<GameConfig>,
    mut level: ResMut<Level>,
) {
    if restart.is_empty() {
        return;
    }
    restart.clear();
    for &entity in &level.platforms {
        commands.entity(entity).despawn();
    }
    level.platforms.clear();
    spawn_base(&mut commands, &config, &mut level);
    info!("Level rebuilt for a new run");
}

/// The entities die via `DespawnOnExit`; only the bookkeeping needs clearing.
fn forget_platforms(mut level: ResMut<Level>) {
    level.platforms.clear();
    level.anchor_y = 0.0;
}
