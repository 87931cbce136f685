//! Jump bonuses perched on platforms.
//!
//! A bonus is a child entity of its platform, so it rides along when the
//! platform slides and disappears with it. Landing on one consumes it and
//! launches the player with its stronger impulse; the platform underneath
//! is untouched.

use bevy::prelude::*;

use super::config::GameConfig;

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Bonus>();
}

const BONUS_COLOR: Color = Color::srgb(0.95, 0.55, 0.25);

pub(super) const BONUS_SIZE: Vec2 = Vec2::new(24.0, 16.0);

/// Vertical clearance between a platform's top and its attachment.
const ATTACH_GAP: f32 = 4.0;

const ATTACH_Z: f32 = 0.1;

#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Bonus {
    /// Upward impulse granted on pickup; overrides the default jump force.
    pub jump_force: f32,
}

/// Local translation of an attachment sitting centered on its platform.
pub(super) fn attachment_offset(platform_height: f32, attachment_height: f32) -> Vec3 {
    Vec3::new(
        0.0,
        platform_height / 2.0 + ATTACH_GAP + attachment_height / 2.0,
        ATTACH_Z,
    )
}

pub(super) fn spawn_bonus(commands: &mut Commands, config: &GameConfig, platform: Entity) {
    commands.spawn((
        Name::new("Bonus"),
        Bonus {
            jump_force: config.player.bonus_jump_force,
        },
        Sprite::from_color(BONUS_COLOR, BONUS_SIZE),
        Transform::from_translation(attachment_offset(config.platform.height, BONUS_SIZE.y)),
        ChildOf(platform),
    ));
}
