//! Debug visualization for the simulation.
//!
//! Toggle with F3 during gameplay. Shows:
//! - Collision boxes for the player, platforms, attachments and bullets
//! - The camera's comfort band
//! - The kill floor

use bevy::{color::palettes::css, input::common_conditions::input_just_pressed, prelude::*};

use super::{
    bonus::{BONUS_SIZE, Bonus},
    bullet::Bullet,
    camera::{self, CameraScroll},
    config::GameConfig,
    enemy::Enemy,
    platform::Platform,
    player::Player,
};
use crate::screens::Screen;

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<DebugOverlayVisible>();

    app.add_systems(
        Update,
        toggle_overlay
            .run_if(in_state(Screen::Gameplay).and(input_just_pressed(KeyCode::F3))),
    );
    app.add_systems(
        Update,
        draw_overlay.run_if(in_state(Screen::Gameplay).and(overlay_visible)),
    );
}

/// Resource to track if the debug overlay is visible.
#[derive(Resource, Default)]
pub struct DebugOverlayVisible(pub bool);

fn overlay_visible(visible: Res<DebugOverlayVisible>) -> bool {
    visible.0
}

fn toggle_overlay(mut visible: ResMut<DebugOverlayVisible>) {
    visible.0 = !visible.0;
    let state = if visible.0 { "ON" } else { "OFF" };
    info!("Debug overlay: {}", state);
}

fn draw_overlay(
    mut gizmos: Gizmos,
    config: Res<GameConfig>,
    scroll: Res<CameraScroll>,
    players: Query<&Transform, With<Player>>,
    platforms: Query<(Entity, &Transform), With<Platform>>,
    bonuses: Query<(&ChildOf, &Transform), With<Bonus>>,
    enemies: Query<(&ChildOf, &Transform), With<Enemy>>,
    bullets: Query<&Transform, With<Bullet>>,
) {
    let half_width = config.window.half_width();

    for tf in &players {
        draw_box(
            &mut gizmos,
            tf.translation.truncate(),
            config.player.size(),
            css::AQUA,
        );
    }

    for (entity, tf) in &platforms {
        let center = tf.translation.truncate();
        draw_box(
            &mut gizmos,
            center,
            config.platform.size(),
            css::WHITE.with_alpha(0.6),
        );

        for (child_of, local_tf) in &bonuses {
            if child_of.parent() == entity {
                let attachment = center + local_tf.translation.truncate();
                draw_box(&mut gizmos, attachment, BONUS_SIZE, css::GOLD);
            }
        }
        for (child_of, local_tf) in &enemies {
            if child_of.parent() == entity {
                let attachment = center + local_tf.translation.truncate();
                draw_box(&mut gizmos, attachment, config.enemy.size(), css::INDIAN_RED);
            }
        }
    }

    for tf in &bullets {
        draw_box(
            &mut gizmos,
            tf.translation.truncate(),
            config.bullet.size(),
            css::ORANGE,
        );
    }

    // The height the camera holds the player at while climbing.
    let band_y = scroll.offset - config.camera.comfort_lead;
    gizmos.line_2d(
        Vec2::new(-half_width, band_y),
        Vec2::new(half_width, band_y),
        css::LIMEGREEN.with_alpha(0.5),
    );

    // The kill floor never scrolls; it slides out of view as the run climbs.
    let floor_y = camera::kill_floor(&config.window);
    gizmos.line_2d(
        Vec2::new(-half_width, floor_y),
        Vec2::new(half_width, floor_y),
        css::RED,
    );
}

fn draw_box(gizmos: &mut Gizmos, center: Vec2, size: Vec2, color: impl Into<Color>) {
    gizmos.rect_2d(Isometry2d::from_translation(center), size, color.into());
}
