// Disable console on Windows for non-dev builds.
#![cfg_attr(not(feature = "dev"), windows_subsystem = "windows")]

mod game;
mod menus;
mod screens;
mod theme;

use bevy::prelude::*;

use crate::game::config::GameConfig;

/// Path of the optional configuration file, looked up relative to the
/// working directory. A missing file is fine (defaults apply); a present
/// but invalid one is a startup error.
const CONFIG_PATH: &str = "icehop.ron";

fn main() -> AppExit {
    let (config, load_err) = GameConfig::load_or_default(CONFIG_PATH);
    if let Some(err) = load_err {
        eprintln!("icehop: {err}; continuing with default configuration");
    }

    // Configuration problems are fatal before the app starts; a session must
    // never begin with e.g. a spawn probability outside [0, 1].
    let violations = config.validate();
    if !violations.is_empty() {
        for violation in &violations {
            eprintln!("icehop: invalid configuration: {violation}");
        }
        return AppExit::error();
    }

    App::new().add_plugins(AppPlugin { config }).run()
}

struct AppPlugin {
    config: GameConfig,
}

impl Plugin for AppPlugin {
    fn build(&self, app: &mut App) {
        // Order new `AppSystems` variants by adding them here:
        app.configure_sets(
            Update,
            (AppSystems::RecordInput, AppSystems::Update).chain(),
        );

        // Set up the `Pause` state. Opening any menu pauses the simulation
        // clock in both schedules.
        app.init_state::<Pause>();
        app.configure_sets(Update, PausableSystems.run_if(in_state(Pause(false))));
        app.configure_sets(FixedUpdate, PausableSystems.run_if(in_state(Pause(false))));

        app.add_plugins(
            DefaultPlugins.set(WindowPlugin {
                primary_window: Window {
                    title: "Icehop".to_string(),
                    resolution: (
                        self.config.window.width as u32,
                        self.config.window.height as u32,
                    )
                        .into(),
                    resizable: false,
                    fit_canvas_to_parent: true,
                    ..default()
                }
                .into(),
                ..default()
            }),
        );

        // The simulation advances on a fixed tick; all speeds in the
        // configuration are expressed per tick.
        app.insert_resource(Time::<Fixed>::from_hz(self.config.tick_hz));
        app.insert_resource(ClearColor(theme::palette::NIGHT_SKY));
        app.insert_resource(self.config.clone());

        // Add other plugins.
        app.add_plugins((
            game::plugin,
            menus::plugin,
            screens::plugin,
            theme::plugin,
        ));

        // Spawn the main camera.
        app.add_systems(Startup, spawn_camera);
    }
}

/// High-level groupings of systems for the app in the `Update` schedule.
/// When adding a new variant, make sure to order it in the `configure_sets`
/// call above.
#[derive(SystemSet, Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum AppSystems {
    /// Record player input.
    RecordInput,
    /// Do everything else (consider splitting this into further variants).
    Update,
}

/// Whether or not the game is paused.
#[derive(States, Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Pause(pub bool);

/// A system set for systems that shouldn't run while the game is paused.
#[derive(SystemSet, Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct PausableSystems;

fn spawn_camera(mut commands: Commands) {
    commands.spawn((Name::new("Camera"), Camera2d));
}
