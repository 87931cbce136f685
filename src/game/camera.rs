//! The climbing camera.
//!
//! A [`CameraScroll`] resource tracks the vertical world offset of the
//! viewport center. It only ever moves up: the world scrolls past in one
//! direction, and anything that drops out of the bottom of the view is gone
//! for good. The `Camera2d` transform mirrors the offset once per tick, so
//! rendering is the plain camera view transform (the horizontal axis is
//! never shifted).

use bevy::prelude::*;

use super::{RestartGame, SimSet, config::GameConfig, config::WindowConfig, player::Player};
use crate::screens::Screen;

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<CameraScroll>();
    app.register_type::<CameraScroll>();

    app.add_systems(OnEnter(Screen::Gameplay), reset_scroll);
    app.add_systems(FixedUpdate, follow_player.in_set(SimSet::Camera));
    app.add_systems(
        Update,
        reset_on_restart.run_if(in_state(Screen::Gameplay)),
    );
}

/// Vertical world offset of the viewport center. Monotonically
/// non-decreasing for the lifetime of a run.
#[derive(Resource, Debug, Default, Reflect)]
#[reflect(Resource)]
pub struct CameraScroll {
    pub offset: f32,
}

impl CameraScroll {
    /// World y of the top viewport edge.
    pub fn view_top(&self, window: &WindowConfig) -> f32 {
        self.offset + window.half_height()
    }

    /// World y of the bottom viewport edge.
    pub fn view_bottom(&self, window: &WindowConfig) -> f32 {
        self.offset - window.half_height()
    }
}

/// The fixed world floor: the bottom edge of the session-start viewport.
/// Falling past it is fatal at any height; the floor does not scroll.
pub(super) fn kill_floor(window: &WindowConfig) -> f32 {
    -window.half_height()
}

/// Raise the offset so the target rides `comfort_lead` below the viewport
/// center while climbing; never retreat.
fn advance(offset: f32, target_y: f32, comfort_lead: f32) -> f32 {
    offset.max(target_y + comfort_lead)
}

fn follow_player(
    config: Res<GameConfig>,
    mut scroll: ResMut<CameraScroll>,
    players: Query<&Transform, With<Player>>,
    mut cameras: Query<&mut Transform, (With<Camera2d>, Without<Player>)>,
) {
    let Ok(player_tf) = players.single() else {
        return;
    };
    scroll.offset = advance(
        scroll.offset,
        player_tf.translation.y,
        config.camera.comfort_lead,
    );

    if let Ok(mut camera_tf) = cameras.single_mut() {
        camera_tf.translation.y = scroll.offset;
    }
}

fn reset_scroll(
    mut scroll: ResMut<CameraScroll>,
    mut cameras: Query<&mut Transform, With<Camera2d>>,
) {
    scroll.offset = 0.0;
    if let Ok(mut camera_tf) = cameras.single_mut() {
        camera_tf.translation.y = 0.0;
    }
}

fn reset_on_restart(
    mut restart: MessageReader<RestartGame>,
    scroll: ResMut<CameraScroll>,
    cameras: Query<&mut Transform, With<Camera2d>>,
) {
    if restart.is_empty() {
        return;
    }
    restart.clear();
    reset_scroll(scroll, cameras);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrolls_up_when_target_climbs_past_the_band() {
        let offset = advance(0.0, 100.0, 120.0);
        assert_eq!(offset, 220.0);
    }

    #[test]
    fn never_retreats() {
        let mut offset = 500.0;
        // A falling target far below the band must not pull the view down.
        for target in [300.0, 0.0, -400.0, -10_000.0] {
            offset = advance(offset, target, 120.0);
            assert_eq!(offset, 500.0);
        }
    }

    #[test]
    fn consecutive_advances_are_monotonic() {
        let targets = [0.0, 50.0, 30.0, 120.0, 80.0, 400.0];
        let mut offset = 0.0;
        for target in targets {
            let next = advance(offset, target, 120.0);
            assert!(next >= offset);
            offset = next;
        }
    }

    #[test]
    fn view_bounds_are_centered_on_the_offset() {
        let window = WindowConfig {
            width: 600.0,
            height: 800.0,
        };
        let scroll = CameraScroll { offset: 250.0 };
        assert_eq!(scroll.view_top(&window), 650.0);
        assert_eq!(scroll.view_bottom(&window), -150.0);
        assert_eq!(kill_floor(&window), -400.0);
    }
}
