//! Enemies perched on platforms.
//!
//! An enemy is a child of its platform, fires a downward bullet on a
//! repeating timer, and dies to a player bullet. Its bullets die with it in
//! the same tick (the orphan pass in the bullet phase runs right after hit
//! resolution).

use bevy::prelude::*;

use super::{
    SimSet, bonus, bullet,
    bullet::{Bullet, Faction},
    collide,
    config::GameConfig,
    platform::Platform,
};

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Enemy>();
    app.register_type::<ShootTimer>();

    app.add_systems(
        FixedUpdate,
        (enemy_fire, resolve_player_bullet_hits)
            .chain()
            .in_set(SimSet::Enemies),
    );
}

const ENEMY_COLOR: Color = Color::srgb(0.45, 0.38, 0.35);

#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Enemy;

#[derive(Component, Debug, Reflect)]
#[reflect(Component)]
pub struct ShootTimer(pub Timer);

pub(super) fn spawn_enemy(commands: &mut Commands, config: &GameConfig, platform: Entity) {
    commands.spawn((
        Name::new("Enemy"),
        Enemy,
        ShootTimer(Timer::from_seconds(
            config.enemy.shoot_interval,
            TimerMode::Repeating,
        )),
        Sprite::from_color(ENEMY_COLOR, config.enemy.size()),
        Transform::from_translation(bonus::attachment_offset(
            config.platform.height,
            config.enemy.height,
        )),
        ChildOf(platform),
    ));
}

/// World-space center of an enemy: its platform's position plus the local
/// perch offset.
fn enemy_center(platform_tf: &Transform, local_tf: &Transform) -> Vec2 {
    platform_tf.translation.truncate() + local_tf.translation.truncate()
}

fn enemy_fire(
    mut commands: Commands,
    config: Res<GameConfig>,
    time: Res<Time>,
    mut enemies: Query<(Entity, &ChildOf, &Transform, &mut ShootTimer), With<Enemy>>,
    platforms: Query<&Transform, (With<Platform>, Without<Enemy>)>,
) {
    for (entity, child_of, local_tf, mut timer) in &mut enemies {
        if !timer.0.tick(time.delta()).just_finished() {
            continue;
        }
        let Ok(platform_tf) = platforms.get(child_of.parent()) else {
            continue;
        };
        let center = enemy_center(platform_tf, local_tf);
        let muzzle = center - Vec2::new(0.0, (config.enemy.height + config.bullet.height) / 2.0);
        bullet::spawn_bullet(
            &mut commands,
            &config,
            muzzle,
            -config.bullet.speed,
            Faction::Enemy,
            entity,
        );
    }
}

/// Test every player bullet against every live enemy; a hit destroys both.
/// All removals go through `Commands`, so nothing is mutated mid-scan.
fn resolve_player_bullet_hits(
    mut commands: Commands,
    config: Res<GameConfig>,
    bullets: Query<(Entity, &Bullet, &Transform), Without<Enemy>>,
    enemies: Query<(Entity, &ChildOf, &Transform), With<Enemy>>,
    platforms: Query<&Transform, (With<Platform>, Without<Enemy>)>,
) {
    let mut spent: Vec<Entity> = Vec::new();
    for (enemy_entity, child_of, local_tf) in &enemies {
        let Ok(platform_tf) = platforms.get(child_of.parent()) else {
            continue;
        };
        let center = enemy_center(platform_tf, local_tf);
        for (bullet_entity, bullet, bullet_tf) in &bullets {
            if bullet.faction != Faction::Player || spent.contains(&bullet_entity) {
                continue;
            }
            if collide::overlap(
                center,
                config.enemy.size(),
                bullet_tf.translation.truncate(),
                config.bullet.size(),
            ) {
                info!("Enemy shot down at {center}");
                commands.entity(enemy_entity).despawn();
                commands.entity(bullet_entity).despawn();
                spent.push(bullet_entity);
                break;
            }
        }
    }
}
