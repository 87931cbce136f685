//! Platforms: the things you land on.
//!
//! A platform is static or breakable, may slide horizontally between the
//! field edges, and may carry one attachment — a bonus or an enemy, never
//! both, and never on a breakable platform. Attachments are child entities,
//! so they track a sliding parent through the transform hierarchy.

use bevy::prelude::*;
use rand::Rng;

use super::{
    bonus,
    config::{GameConfig, SpawnChances},
    enemy,
};
use crate::screens::Screen;

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Platform>();
    app.register_type::<Sliding>();
}

const ICE_COLOR: Color = Color::srgb(0.62, 0.8, 0.92);
const CRACKED_ICE_COLOR: Color = Color::srgb(0.87, 0.94, 0.98);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum PlatformKind {
    Static,
    /// Shatters the first time the player lands on it.
    Breakable,
}

#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Platform {
    pub kind: PlatformKind,
}

/// Horizontal oscillation between the field edges.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Sliding {
    /// -1 or +1.
    pub direction: f32,
    pub speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Attachment {
    None,
    Bonus,
    Enemy,
}

/// Everything randomly decided about a platform before it is spawned.
/// Exclusivity rules hold by construction: a breakable platform carries
/// nothing, and the bonus roll wins over the enemy roll.
#[derive(Debug, Clone, Copy)]
pub(super) struct PlatformLayout {
    pub kind: PlatformKind,
    pub slide_direction: Option<f32>,
    pub attachment: Attachment,
}

impl PlatformLayout {
    /// A plain static platform, used for the base the run starts on.
    pub fn solid() -> Self {
        Self {
            kind: PlatformKind::Static,
            slide_direction: None,
            attachment: Attachment::None,
        }
    }

    pub fn roll(chances: &SpawnChances, rng: &mut impl Rng) -> Self {
        let kind = if rng.random_bool(chances.breakable) {
            PlatformKind::Breakable
        } else {
            PlatformKind::Static
        };
        let slide_direction = rng
            .random_bool(chances.sliding)
            .then(|| if rng.random_bool(0.5) { 1.0 } else { -1.0 });
        let attachment = if kind == PlatformKind::Breakable {
            Attachment::None
        } else if rng.random_bool(chances.bonus) {
            Attachment::Bonus
        } else if rng.random_bool(chances.enemy) {
            Attachment::Enemy
        } else {
            Attachment::None
        };
        Self {
            kind,
            slide_direction,
            attachment,
        }
    }
}

pub(super) fn spawn_platform(
    commands: &mut Commands,
    config: &GameConfig,
    position: Vec2,
    layout: PlatformLayout,
) -> Entity {
    // A breakable platform carrying an attachment is a layout-roll bug.
    debug_assert!(
        layout.kind != PlatformKind::Breakable || layout.attachment == Attachment::None
    );
    let color = match layout.kind {
        PlatformKind::Static => ICE_COLOR,
        PlatformKind::Breakable => CRACKED_ICE_COLOR,
    };
    let platform = commands
        .spawn((
            Name::new("Platform"),
            Platform { kind: layout.kind },
            Sprite::from_color(color, config.platform.size()),
            Transform::from_translation(position.extend(0.0)),
            DespawnOnExit(Screen::Gameplay),
        ))
        .id();

    if let Some(direction) = layout.slide_direction {
        commands.entity(platform).insert(Sliding {
            direction,
            speed: config.platform.slide_speed,
        });
    }

    match layout.attachment {
        Attachment::Bonus => bonus::spawn_bonus(commands, config, platform),
        Attachment::Enemy => enemy::spawn_enemy(commands, config, platform),
        Attachment::None => {}
    }

    platform
}

pub(super) fn slide_platforms(
    config: Res<GameConfig>,
    mut platforms: Query<(&mut Transform, &mut Sliding)>,
) {
    let half_platform = config.platform.width / 2.0;
    let half_field = config.window.half_width();
    for (mut tf, mut sliding) in &mut platforms {
        let (x, direction) = slide_step(
            tf.translation.x,
            sliding.direction,
            sliding.speed,
            half_platform,
            half_field,
        );
        tf.translation.x = x;
        sliding.direction = direction;
    }
}

/// One slide step; reflects off the field edges, never wraps.
fn slide_step(
    x: f32,
    direction: f32,
    speed: f32,
    half_platform: f32,
    half_field: f32,
) -> (f32, f32) {
    let limit = half_field - half_platform;
    let x = x + direction * speed;
    if x >= limit {
        (limit, -1.0)
    } else if x <= -limit {
        (-limit, 1.0)
    } else {
        (x, direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakable_platforms_carry_nothing() {
        let chances = SpawnChances {
            bonus: 1.0,
            breakable: 1.0,
            sliding: 0.0,
            enemy: 1.0,
        };
        let mut rng = rand::rng();
        for _ in 0..100 {
            let layout = PlatformLayout::roll(&chances, &mut rng);
            assert_eq!(layout.kind, PlatformKind::Breakable);
            assert_eq!(layout.attachment, Attachment::None);
        }
    }

    #[test]
    fn bonus_wins_over_enemy() {
        let chances = SpawnChances {
            bonus: 1.0,
            breakable: 0.0,
            sliding: 0.0,
            enemy: 1.0,
        };
        let mut rng = rand::rng();
        for _ in 0..100 {
            let layout = PlatformLayout::roll(&chances, &mut rng);
            assert_eq!(layout.attachment, Attachment::Bonus);
        }
    }

    #[test]
    fn attachments_are_never_doubled_under_random_rolls() {
        let chances = SpawnChances {
            bonus: 0.5,
            breakable: 0.5,
            sliding: 0.5,
            enemy: 0.5,
        };
        let mut rng = rand::rng();
        for _ in 0..1000 {
            let layout = PlatformLayout::roll(&chances, &mut rng);
            if layout.kind == PlatformKind::Breakable {
                assert_eq!(layout.attachment, Attachment::None);
            }
        }
    }

    #[test]
    fn sliding_reflects_at_the_right_edge() {
        // Field [-300, 300], platform half width 50 -> centers clamp to ±250.
        let (x, dir) = slide_step(249.0, 1.0, 2.0, 50.0, 300.0);
        assert_eq!((x, dir), (250.0, -1.0));
        // Next step moves away from the edge.
        let (x, dir) = slide_step(x, dir, 2.0, 50.0, 300.0);
        assert_eq!((x, dir), (248.0, -1.0));
    }

    #[test]
    fn sliding_reflects_at_the_left_edge() {
        let (x, dir) = slide_step(-249.5, -1.0, 2.0, 50.0, 300.0);
        assert_eq!((x, dir), (-250.0, 1.0));
    }
}
