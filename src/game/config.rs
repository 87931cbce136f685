//! Game configuration: tunable constants with defaults, optionally
//! overridden by a RON file next to the binary.
//!
//! All speeds and forces are expressed in pixels per simulation tick; time
//! intervals (cooldowns) are in seconds. Spawn chances are probabilities in
//! `[0, 1]`. [`GameConfig::validate`] collects every violation; the caller
//! treats a non-empty result as fatal before the app starts.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 800.0,
        }
    }
}

impl WindowConfig {
    /// Half the playable width; the field spans `[-half_width, +half_width)`.
    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }

    pub fn half_height(&self) -> f32 {
        self.height / 2.0
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    pub width: f32,
    pub height: f32,
    /// Downward acceleration, applied every tick.
    pub gravity: f32,
    /// Upward impulse applied on landing.
    pub jump_force: f32,
    /// Upward impulse applied when landing on a bonus.
    pub bonus_jump_force: f32,
    pub max_run_speed: f32,
    pub max_fall_speed: f32,
    /// Horizontal acceleration while input is held.
    pub accel: f32,
    /// Horizontal deceleration while input is released.
    pub deccel: f32,
    /// Minimum seconds between shots.
    pub fire_cooldown: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            width: 48.0,
            height: 48.0,
            gravity: 0.35,
            jump_force: 10.0,
            bonus_jump_force: 15.0,
            max_run_speed: 8.0,
            max_fall_speed: 60.0,
            accel: 0.5,
            deccel: 0.6,
            fire_cooldown: 0.3,
        }
    }
}

impl PlayerConfig {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Bullet direction convention: `velocity_y` is signed, positive travels up.
/// Player bullets spawn with `+speed`, enemy bullets with `-speed`; nothing
/// else flips the sign afterwards.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct BulletConfig {
    pub speed: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for BulletConfig {
    fn default() -> Self {
        Self {
            speed: 9.0,
            width: 5.0,
            height: 15.0,
        }
    }
}

impl BulletConfig {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct PlatformConfig {
    pub width: f32,
    pub height: f32,
    /// Horizontal speed of sliding platforms.
    pub slide_speed: f32,
    /// Smallest vertical gap between consecutively generated platforms.
    pub gap_min: f32,
    /// Largest vertical gap; must stay reachable with `jump_force`.
    pub gap_max: f32,
    /// Target number of concurrently live platforms.
    pub max_count: usize,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 20.0,
            slide_speed: 1.5,
            gap_min: 50.0,
            gap_max: 110.0,
            max_count: 10,
        }
    }
}

impl PlatformConfig {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Independent per-platform spawn rolls, each a probability in `[0, 1]`.
/// Breakable platforms never carry an attachment, and a bonus and an enemy
/// are mutually exclusive; the roll order makes the bonus win ties.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct SpawnChances {
    pub bonus: f64,
    pub breakable: f64,
    pub sliding: f64,
    pub enemy: f64,
}

impl Default for SpawnChances {
    fn default() -> Self {
        Self {
            bonus: 0.10,
            breakable: 0.12,
            sliding: 0.10,
            enemy: 0.08,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct EnemyConfig {
    pub width: f32,
    pub height: f32,
    /// Seconds between shots.
    pub shoot_interval: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            width: 50.0,
            height: 24.0,
            shoot_interval: 1.0,
        }
    }
}

impl EnemyConfig {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// How far below the viewport center the player rides while climbing.
    /// The camera only ever scrolls up.
    pub comfort_lead: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            comfort_lead: 120.0,
        }
    }
}

#[derive(Resource, Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    /// Simulation ticks per second.
    pub tick_hz: f64,
    pub player: PlayerConfig,
    pub bullet: BulletConfig,
    pub platform: PlatformConfig,
    pub chances: SpawnChances,
    pub enemy: EnemyConfig,
    pub camera: CameraConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window: Default::default(),
            tick_hz: 60.0,
            player: Default::default(),
            bullet: Default::default(),
            platform: Default::default(),
            chances: Default::default(),
            enemy: Default::default(),
            camera: Default::default(),
        }
    }
}

impl GameConfig {
    /// Load from a single RON file (errors contain human-readable context).
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let data = fs::read_to_string(&path).map_err(|e| format!("read config: {e}"))?;
        ron::from_str(&data).map_err(|e| format!("parse RON: {e}"))
    }

    /// Load file; on failure returns default config plus error string.
    /// A missing file is expected and not reported.
    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        if !path.as_ref().exists() {
            return (Self::default(), None);
        }
        match Self::load_from_file(&path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Collect every constraint violation. Any entry is fatal at startup.
    pub fn validate(&self) -> Vec<String> {
        let mut v = Vec::new();

        fn check_positive(v: &mut Vec<String>, label: &str, value: f32) {
            if value <= 0.0 {
                v.push(format!("{label} must be > 0 (got {value})"));
            }
        }
        fn check_not_negative(v: &mut Vec<String>, label: &str, value: f32) {
            if value < 0.0 {
                v.push(format!("{label} must be >= 0 (got {value})"));
            }
        }
        fn check_chance(v: &mut Vec<String>, label: &str, value: f64) {
            if !(0.0..=1.0).contains(&value) {
                v.push(format!("{label} must be a probability in [0, 1] (got {value})"));
            }
        }

        check_positive(&mut v, "window.width", self.window.width);
        check_positive(&mut v, "window.height", self.window.height);
        if self.tick_hz <= 0.0 {
            v.push(format!("tick_hz must be > 0 (got {})", self.tick_hz));
        }

        check_positive(&mut v, "player.width", self.player.width);
        check_positive(&mut v, "player.height", self.player.height);
        check_positive(&mut v, "player.gravity", self.player.gravity);
        check_positive(&mut v, "player.jump_force", self.player.jump_force);
        check_positive(&mut v, "player.bonus_jump_force", self.player.bonus_jump_force);
        check_positive(&mut v, "player.max_run_speed", self.player.max_run_speed);
        check_positive(&mut v, "player.max_fall_speed", self.player.max_fall_speed);
        check_positive(&mut v, "player.accel", self.player.accel);
        check_positive(&mut v, "player.deccel", self.player.deccel);
        check_not_negative(&mut v, "player.fire_cooldown", self.player.fire_cooldown);

        check_positive(&mut v, "bullet.speed", self.bullet.speed);
        check_positive(&mut v, "bullet.width", self.bullet.width);
        check_positive(&mut v, "bullet.height", self.bullet.height);

        check_positive(&mut v, "platform.width", self.platform.width);
        check_positive(&mut v, "platform.height", self.platform.height);
        check_not_negative(&mut v, "platform.slide_speed", self.platform.slide_speed);
        check_positive(&mut v, "platform.gap_min", self.platform.gap_min);
        if self.platform.gap_max < self.platform.gap_min {
            v.push(format!(
                "platform.gap_max ({}) must be >= platform.gap_min ({})",
                self.platform.gap_max, self.platform.gap_min
            ));
        }
        if self.platform.max_count == 0 {
            v.push("platform.max_count must be > 0".into());
        }
        if self.platform.width > self.window.width {
            v.push(format!(
                "platform.width ({}) does not fit the window width ({})",
                self.platform.width, self.window.width
            ));
        }

        check_chance(&mut v, "chances.bonus", self.chances.bonus);
        check_chance(&mut v, "chances.breakable", self.chances.breakable);
        check_chance(&mut v, "chances.sliding", self.chances.sliding);
        check_chance(&mut v, "chances.enemy", self.chances.enemy);

        check_positive(&mut v, "enemy.width", self.enemy.width);
        check_positive(&mut v, "enemy.height", self.enemy.height);
        check_positive(&mut v, "enemy.shoot_interval", self.enemy.shoot_interval);

        check_not_negative(&mut v, "camera.comfort_lead", self.camera.comfort_lead);
        if self.camera.comfort_lead >= self.window.half_height() {
            v.push(format!(
                "camera.comfort_lead ({}) must be less than half the window height ({})",
                self.camera.comfort_lead,
                self.window.half_height()
            ));
        }

        v
    }
}
