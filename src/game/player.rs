//! The player: gravity, input-driven movement, collision response, firing,
//! and death.
//!
//! One ordered pass per tick: integrate velocity (gravity, input accel or
//! release decel, clamps), check enemy fire, maybe shoot, integrate position
//! (the field wraps horizontally), resolve landings, check the kill floor.
//! Death is terminal until a restart re-arms everything in place.

use bevy::prelude::*;
use std::time::Duration;

use super::{
    RestartGame, SimSet,
    bonus::{BONUS_SIZE, Bonus},
    bullet,
    bullet::{Bullet, Faction},
    camera, collide,
    config::GameConfig,
    input::ControlState,
    platform::{Platform, PlatformKind},
};
use crate::screens::Screen;

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Player>();
    app.add_message::<PlayerDied>();

    app.add_systems(OnEnter(Screen::Gameplay), spawn_player);
    app.add_systems(FixedUpdate, update_player.in_set(SimSet::Player));
    app.add_systems(
        Update,
        reset_on_restart.run_if(in_state(Screen::Gameplay)),
    );
}

const PLAYER_COLOR: Color = Color::srgb(0.15, 0.16, 0.2);

const PLAYER_Z: f32 = 2.0;

/// Downward speed beyond which landing checks engage. Slower (or upward)
/// motion passes through platforms, so rising never snags an underside.
const LANDING_THRESHOLD: f32 = 0.5;

#[derive(Component, Debug, Reflect)]
#[reflect(Component)]
pub struct Player {
    pub velocity: Vec2,
    pub dead: bool,
}

/// Rate limit between shots. Spawned already elapsed so the first shot is
/// never delayed.
#[derive(Component, Debug, Reflect)]
#[reflect(Component)]
pub struct FireCooldown(pub Timer);

impl FireCooldown {
    fn ready(seconds: f32) -> Self {
        let mut timer = Timer::from_seconds(seconds, TimerMode::Once);
        timer.tick(Duration::from_secs_f32(seconds));
        Self(timer)
    }
}

/// Fired the moment the player dies, however it happened.
#[derive(Message, Debug, Clone)]
pub struct PlayerDied;

fn start_position(config: &GameConfig) -> Vec3 {
    Vec3::new(0.0, -config.window.height / 4.0, PLAYER_Z)
}

fn spawn_player(mut commands: Commands, config: Res<GameConfig>) {
    commands.spawn((
        Name::new("Player"),
        Player {
            velocity: Vec2::ZERO,
            dead: false,
        },
        FireCooldown::ready(config.player.fire_cooldown),
        Sprite::from_color(PLAYER_COLOR, config.player.size()),
        Transform::from_translation(start_position(&config)),
        DespawnOnExit(Screen::Gameplay),
    ));
}

fn update_player(
    mut commands: Commands,
    config: Res<GameConfig>,
    control: Res<ControlState>,
    time: Res<Time>,
    mut died: MessageWriter<PlayerDied>,
    mut players: Query<(Entity, &mut Transform, &mut Player, &mut FireCooldown)>,
    platforms: Query<(Entity, &Platform, &Transform), Without<Player>>,
    bonuses: Query<(Entity, &Bonus, &ChildOf, &Transform), Without<Player>>,
    bullets: Query<(Entity, &Bullet, &Transform), Without<Player>>,
) {
    let Ok((entity, mut tf, mut player, mut cooldown)) = players.single_mut() else {
        return;
    };
    cooldown.0.tick(time.delta());
    if player.dead {
        return;
    }

    // Integrate velocity.
    player.velocity.y -= config.player.gravity;
    player.velocity.x = accelerate(
        player.velocity.x,
        control.dir,
        config.player.accel,
        config.player.deccel,
    );
    player.velocity = clamp_velocity(
        player.velocity,
        config.player.max_run_speed,
        config.player.max_fall_speed,
    );

    // An enemy bullet ends the run on the spot.
    let center = tf.translation.truncate();
    for (bullet_entity, bullet, bullet_tf) in &bullets {
        if bullet.faction != Faction::Enemy {
            continue;
        }
        if collide::overlap(
            center,
            config.player.size(),
            bullet_tf.translation.truncate(),
            config.bullet.size(),
        ) {
            commands.entity(bullet_entity).despawn();
            kill(&mut player, &mut died);
            return;
        }
    }

    // Fire from the top-center, rate-limited by the cooldown.
    if control.fire && cooldown.0.is_finished() {
        let muzzle = center + Vec2::new(0.0, (config.player.height + config.bullet.height) / 2.0);
        bullet::spawn_bullet(
            &mut commands,
            &config,
            muzzle,
            config.bullet.speed,
            Faction::Player,
            entity,
        );
        cooldown.0.reset();
    }

    // Integrate position; the field is a horizontal torus.
    tf.translation.x = wrap_x(tf.translation.x + player.velocity.x, config.window.width);
    tf.translation.y += player.velocity.y;

    if player.velocity.y < -LANDING_THRESHOLD {
        let center = tf.translation.truncate();
        'landing: for (platform_entity, platform, platform_tf) in &platforms {
            // A platform's bonus is checked before the platform itself.
            for (bonus_entity, bonus, child_of, local_tf) in &bonuses {
                if child_of.parent() != platform_entity {
                    continue;
                }
                let bonus_center =
                    platform_tf.translation.truncate() + local_tf.translation.truncate();
                if collide::overlap(center, config.player.size(), bonus_center, BONUS_SIZE) {
                    tf.translation.y =
                        bonus_center.y + (BONUS_SIZE.y + config.player.height) / 2.0;
                    player.velocity.y = bonus.jump_force;
                    commands.entity(bonus_entity).despawn();
                    break 'landing;
                }
            }

            let platform_center = platform_tf.translation.truncate();
            if collide::overlap(
                center,
                config.player.size(),
                platform_center,
                config.platform.size(),
            ) {
                tf.translation.y =
                    platform_center.y + (config.platform.height + config.player.height) / 2.0;
                player.velocity.y = config.player.jump_force;
                if platform.kind == PlatformKind::Breakable {
                    // Deferred; the level registry drops the entry on its
                    // own phase, after this pass has fully finished.
                    commands.entity(platform_entity).despawn();
                }
                break 'landing;
            }
        }
    }

    // The kill floor is fixed at the bottom of the session-start view; it
    // does not scroll with the camera.
    if tf.translation.y + config.player.height / 2.0 < camera::kill_floor(&config.window) {
        kill(&mut player, &mut died);
    }
}

fn kill(player: &mut Player, died: &mut MessageWriter<PlayerDied>) {
    player.dead = true;
    player.velocity = Vec2::ZERO;
    died.write(PlayerDied);
}

/// Horizontal velocity update: accelerate with input, otherwise bleed speed
/// toward zero without ever flipping sign in a single tick.
fn accelerate(vx: f32, dir: i8, accel: f32, deccel: f32) -> f32 {
    if dir != 0 {
        vx + f32::from(dir) * accel
    } else if vx > 0.0 {
        (vx - deccel).max(0.0)
    } else if vx < 0.0 {
        (vx + deccel).min(0.0)
    } else {
        0.0
    }
}

fn clamp_velocity(v: Vec2, max_run: f32, max_fall: f32) -> Vec2 {
    Vec2::new(v.x.clamp(-max_run, max_run), v.y.clamp(-max_fall, max_fall))
}

/// Toroidal horizontal wrap over `[-width/2, +width/2)`.
fn wrap_x(x: f32, width: f32) -> f32 {
    let half = width / 2.0;
    (x + half).rem_euclid(width) - half
}

fn reset_on_restart(
    mut restart: MessageReader<RestartGame>,
    config: Res<GameConfig>,
    mut players: Query<(&mut Transform, &mut Player, &mut FireCooldown)>,
) {
    if restart.is_empty() {
        return;
    }
    restart.clear();
    let Ok((mut tf, mut player, mut cooldown)) = players.single_mut() else {
        return;
    };
    tf.translation = start_position(&config);
    player.velocity = Vec2::ZERO;
    player.dead = false;
    *cooldown = FireCooldown::ready(config.player.fire_cooldown);
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    use super::super::{
        bonus::spawn_bonus,
        bullet::FiredBy,
        platform::{PlatformLayout, spawn_platform},
    };

    #[test]
    fn input_accelerates() {
        assert_eq!(accelerate(0.0, 1, 0.5, 0.6), 0.5);
        assert_eq!(accelerate(-2.0, -1, 0.5, 0.6), -2.5);
    }

    #[test]
    fn release_decelerates_without_reversing() {
        // Decelerating never crosses zero within one tick.
        assert_eq!(accelerate(0.4, 0, 0.5, 0.6), 0.0);
        assert_eq!(accelerate(-0.4, 0, 0.5, 0.6), 0.0);
        assert_eq!(accelerate(2.0, 0, 0.5, 0.6), 1.4);
        assert_eq!(accelerate(0.0, 0, 0.5, 0.6), 0.0);
    }

    #[test]
    fn velocity_is_clamped_both_signs() {
        let v = clamp_velocity(Vec2::new(50.0, -500.0), 8.0, 60.0);
        assert_eq!(v, Vec2::new(8.0, -60.0));
        let v = clamp_velocity(Vec2::new(-50.0, 500.0), 8.0, 60.0);
        assert_eq!(v, Vec2::new(-8.0, 60.0));
    }

    #[test]
    fn position_wraps_around_the_field() {
        // Exiting on the right reappears near the left edge.
        assert_eq!(wrap_x(304.0, 600.0), -296.0);
        assert_eq!(wrap_x(-305.0, 600.0), 295.0);
        // In-range positions are untouched.
        assert_eq!(wrap_x(120.0, 600.0), 120.0);
        // The result always lands in [-300, 300).
        for x in [-1000.0, -300.0, 0.0, 299.9, 300.0, 1234.5] {
            let wrapped = wrap_x(x, 600.0);
            assert!((-300.0..300.0).contains(&wrapped), "{x} -> {wrapped}");
        }
    }

    // --- scenario tests -------------------------------------------------

    fn test_app() -> App {
        let mut app = App::new();
        app.add_message::<PlayerDied>();
        app.insert_resource(GameConfig::default());
        app.init_resource::<ControlState>();
        app.init_resource::<Time>();
        app
    }

    fn spawn_test_player(app: &mut App, position: Vec2, velocity: Vec2) -> Entity {
        let cooldown = app.world().resource::<GameConfig>().player.fire_cooldown;
        app.world_mut()
            .spawn((
                Player {
                    velocity,
                    dead: false,
                },
                FireCooldown::ready(cooldown),
                Transform::from_translation(position.extend(PLAYER_Z)),
            ))
            .id()
    }

    fn run_tick(app: &mut App) {
        app.world_mut().run_system_once(update_player).unwrap();
    }

    fn player_state(app: &mut App, entity: Entity) -> (Vec3, Vec2, bool) {
        let tf = *app.world().get::<Transform>(entity).unwrap();
        let player = app.world().get::<Player>(entity).unwrap();
        (tf.translation, player.velocity, player.dead)
    }

    #[test]
    fn landing_on_a_bonus_launches_with_its_force() {
        let mut app = test_app();
        let config = app.world().resource::<GameConfig>().clone();
        let platform = app
            .world_mut()
            .run_system_once(move |mut commands: Commands| {
                let platform =
                    spawn_platform(&mut commands, &config, Vec2::ZERO, PlatformLayout::solid());
                spawn_bonus(&mut commands, &config, platform);
                platform
            })
            .unwrap();
        let bonus = app
            .world_mut()
            .query_filtered::<Entity, With<Bonus>>()
            .single(app.world())
            .unwrap();

        // Falling onto the bonus (perched at y=22 over the platform).
        let player = spawn_test_player(&mut app, Vec2::new(0.0, 40.0), Vec2::new(0.0, -3.0));
        run_tick(&mut app);

        let (_, velocity, dead) = player_state(&mut app, player);
        assert_eq!(velocity.y, 15.0, "bonus impulse beats the default jump");
        assert!(!dead);
        assert!(app.world().get_entity(bonus).is_err(), "bonus consumed");
        assert!(
            app.world().get_entity(platform).is_ok(),
            "platform survives a bonus pickup"
        );
    }

    #[test]
    fn landing_on_a_breakable_platform_shatters_it() {
        let mut app = test_app();
        let config = app.world().resource::<GameConfig>().clone();
        let platform = app
            .world_mut()
            .run_system_once(move |mut commands: Commands| {
                let layout = PlatformLayout {
                    kind: PlatformKind::Breakable,
                    ..PlatformLayout::solid()
                };
                spawn_platform(&mut commands, &config, Vec2::ZERO, layout)
            })
            .unwrap();

        let player = spawn_test_player(&mut app, Vec2::new(0.0, 37.0), Vec2::new(0.0, -3.0));
        run_tick(&mut app);

        let (translation, velocity, _) = player_state(&mut app, player);
        assert_eq!(velocity.y, 10.0, "default jump applied");
        // Bottom snapped to the platform top before it shattered.
        assert_eq!(translation.y, 34.0);
        assert!(app.world().get_entity(platform).is_err());
    }

    #[test]
    fn rising_never_collides_with_platforms() {
        let mut app = test_app();
        let config = app.world().resource::<GameConfig>().clone();
        app.world_mut()
            .run_system_once(move |mut commands: Commands| {
                spawn_platform(&mut commands, &config, Vec2::ZERO, PlatformLayout::solid())
            })
            .unwrap();

        // Overlapping the platform from below while moving up.
        let player = spawn_test_player(&mut app, Vec2::new(0.0, -5.0), Vec2::new(0.0, 8.0));
        run_tick(&mut app);

        let (_, velocity, _) = player_state(&mut app, player);
        // Gravity bled a little speed off, but no landing impulse fired.
        assert_eq!(velocity.y, 8.0 - 0.35);
    }

    #[test]
    fn an_enemy_bullet_is_lethal() {
        let mut app = test_app();
        let owner = app.world_mut().spawn_empty().id();
        let bullet = app
            .world_mut()
            .spawn((
                Bullet {
                    velocity_y: -9.0,
                    faction: Faction::Enemy,
                },
                FiredBy(owner),
                Transform::from_xyz(0.0, 10.0, 0.0),
            ))
            .id();
        let player = spawn_test_player(&mut app, Vec2::ZERO, Vec2::ZERO);

        run_tick(&mut app);

        let (_, velocity, dead) = player_state(&mut app, player);
        assert!(dead);
        assert_eq!(velocity, Vec2::ZERO);
        assert!(app.world().get_entity(bullet).is_err(), "bullet consumed");
        assert!(
            !app.world()
                .resource::<Messages<PlayerDied>>()
                .is_empty()
        );
    }

    #[test]
    fn death_is_idempotent_until_reset() {
        let mut app = test_app();
        let player = spawn_test_player(&mut app, Vec2::new(10.0, 20.0), Vec2::ZERO);
        app.world_mut().get_mut::<Player>(player).unwrap().dead = true;

        let before = player_state(&mut app, player);
        for _ in 0..5 {
            run_tick(&mut app);
        }
        assert_eq!(player_state(&mut app, player), before);
    }

    #[test]
    fn falling_below_the_world_floor_is_fatal() {
        let mut app = test_app();
        // Default window: the floor sits at -400 and never scrolls.
        let player = spawn_test_player(&mut app, Vec2::new(0.0, -450.0), Vec2::new(0.0, -5.0));
        run_tick(&mut app);

        let (_, _, dead) = player_state(&mut app, player);
        assert!(dead);
    }

    #[test]
    fn firing_is_rate_limited() {
        let mut app = test_app();
        app.world_mut().resource_mut::<ControlState>().fire = true;
        spawn_test_player(&mut app, Vec2::ZERO, Vec2::ZERO);

        run_tick(&mut app);
        run_tick(&mut app);

        // Two ticks with no time advanced: the cooldown admits one shot.
        let world = app.world_mut();
        let fired: Vec<_> = world.query::<&Bullet>().iter(world).collect();
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].faction, Faction::Player);
        assert!(fired[0].velocity_y > 0.0, "player bullets travel up");
    }
}
