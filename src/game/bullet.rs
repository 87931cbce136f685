//! Bullets fired by the player and by enemies.
//!
//! A bullet moves vertically by its signed `velocity_y` every tick — player
//! bullets up, enemy bullets down — and despawns once it has fully left the
//! camera's vertical view band. Rate limiting lives with the owners; this
//! module never checks cooldowns.

use bevy::prelude::*;

use super::{
    RestartGame, SimSet, camera::CameraScroll, collide, config::GameConfig, enemy::Enemy,
    player::Player,
};
use crate::screens::Screen;

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Bullet>();
    app.register_type::<FiredBy>();

    app.add_systems(
        FixedUpdate,
        (move_bullets, cull_bullets, despawn_orphaned_bullets)
            .chain()
            .in_set(SimSet::Bullets),
    );
    app.add_systems(
        Update,
        clear_on_restart.run_if(in_state(Screen::Gameplay)),
    );
}

const PLAYER_BULLET_COLOR: Color = Color::srgb(1.0, 0.9, 0.35);
const ENEMY_BULLET_COLOR: Color = Color::srgb(0.9, 0.3, 0.25);

const BULLET_Z: f32 = 3.0;

/// Which side fired a bullet; a bullet only ever harms the other side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum Faction {
    Player,
    Enemy,
}

#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Bullet {
    /// Signed vertical speed in px/tick; positive travels up.
    pub velocity_y: f32,
    pub faction: Faction,
}

/// Link back to the entity that fired this bullet. Bullets do not outlive
/// their owner.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct FiredBy(pub Entity);

/// Spawn a bullet; callers are responsible for their cooldown checks.
pub(super) fn spawn_bullet(
    commands: &mut Commands,
    config: &GameConfig,
    position: Vec2,
    velocity_y: f32,
    faction: Faction,
    owner: Entity,
) -> Entity {
    // A motionless bullet would never cull itself.
    debug_assert!(velocity_y != 0.0);
    let color = match faction {
        Faction::Player => PLAYER_BULLET_COLOR,
        Faction::Enemy => ENEMY_BULLET_COLOR,
    };
    commands
        .spawn((
            Name::new("Bullet"),
            Bullet {
                velocity_y,
                faction,
            },
            FiredBy(owner),
            Sprite::from_color(color, config.bullet.size()),
            Transform::from_translation(position.extend(BULLET_Z)),
            DespawnOnExit(Screen::Gameplay),
        ))
        .id()
}

fn move_bullets(mut bullets: Query<(&Bullet, &mut Transform)>) {
    for (bullet, mut tf) in &mut bullets {
        tf.translation.y += bullet.velocity_y;
    }
}

fn cull_bullets(
    mut commands: Commands,
    config: Res<GameConfig>,
    scroll: Res<CameraScroll>,
    bullets: Query<(Entity, &Transform), With<Bullet>>,
) {
    let bottom = scroll.view_bottom(&config.window);
    let top = scroll.view_top(&config.window);
    for (entity, tf) in &bullets {
        if collide::outside_vertical_view(tf.translation.y, config.bullet.height, bottom, top) {
            commands.entity(entity).despawn();
        }
    }
}

/// A bullet whose firing entity is gone goes with it, in the same tick the
/// owner was destroyed.
pub(super) fn despawn_orphaned_bullets(
    mut commands: Commands,
    bullets: Query<(Entity, &FiredBy)>,
    owners: Query<(), Or<(With<Player>, With<Enemy>)>>,
) {
    for (entity, fired_by) in &bullets {
        if !owners.contains(fired_by.0) {
            commands.entity(entity).despawn();
        }
    }
}

fn clear_on_restart(
    mut commands: Commands,
    mut restart: MessageReader<RestartGame>,
    bullets: Query<Entity, With<Bullet>>,
) {
    if restart.is_empty() {
        return;
    }
    restart.clear();
    for entity in &bullets {
        commands.entity(entity).despawn();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    fn test_app() -> App {
        let mut app = App::new();
        app.insert_resource(GameConfig::default());
        app.init_resource::<CameraScroll>();
        app
    }

    fn spawn_test_bullet(app: &mut App, y: f32, velocity_y: f32, faction: Faction) -> Entity {
        let owner = app.world_mut().spawn_empty().id();
        app.world_mut()
            .spawn((
                Bullet {
                    velocity_y,
                    faction,
                },
                FiredBy(owner),
                Transform::from_xyz(0.0, y, BULLET_Z),
            ))
            .id()
    }

    #[test]
    fn bullets_advance_by_signed_velocity() {
        let mut app = test_app();
        let up = spawn_test_bullet(&mut app, 0.0, 9.0, Faction::Player);
        let down = spawn_test_bullet(&mut app, 0.0, -9.0, Faction::Enemy);

        app.world_mut().run_system_once(move_bullets).unwrap();

        assert_eq!(app.world().get::<Transform>(up).unwrap().translation.y, 9.0);
        assert_eq!(
            app.world().get::<Transform>(down).unwrap().translation.y,
            -9.0
        );
    }

    #[test]
    fn bullets_outside_the_view_are_culled() {
        let mut app = test_app();
        // View band is [-400, 400] with the default window and zero scroll.
        let kept = spawn_test_bullet(&mut app, 390.0, 9.0, Faction::Player);
        let above = spawn_test_bullet(&mut app, 430.0, 9.0, Faction::Player);
        let below = spawn_test_bullet(&mut app, -420.0, -9.0, Faction::Enemy);

        app.world_mut().run_system_once(cull_bullets).unwrap();

        assert!(app.world().get_entity(kept).is_ok());
        assert!(app.world().get_entity(above).is_err());
        assert!(app.world().get_entity(below).is_err());
    }

    #[test]
    fn bullets_die_with_their_owner() {
        let mut app = test_app();
        let enemy = app.world_mut().spawn(Enemy).id();
        let bullet = app
            .world_mut()
            .spawn((
                Bullet {
                    velocity_y: -9.0,
                    faction: Faction::Enemy,
                },
                FiredBy(enemy),
                Transform::default(),
            ))
            .id();

        // Owner alive: the bullet stays.
        app.world_mut()
            .run_system_once(despawn_orphaned_bullets)
            .unwrap();
        assert!(app.world().get_entity(bullet).is_ok());

        app.world_mut().despawn(enemy);
        app.world_mut()
            .run_system_once(despawn_orphaned_bullets)
            .unwrap();
        assert!(app.world().get_entity(bullet).is_err());
    }
}
