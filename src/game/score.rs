//! Session state - score tracking and the death -> game over transition.
//!
//! The score is the climbed distance: the camera's scroll offset converted
//! to meters. It only ever goes up, because the camera never retreats.

use bevy::prelude::*;

use super::{RestartGame, camera::CameraScroll, player::PlayerDied};
use crate::{AppSystems, menus::Menu, screens::Screen, theme::palette::LABEL_TEXT};

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<Score>();
    app.register_type::<Score>();

    app.add_systems(OnEnter(Screen::Gameplay), (reset_score, spawn_hud));

    app.add_systems(
        Update,
        ((update_score, update_hud).chain(), open_game_over_on_death)
            .in_set(AppSystems::Update)
            .run_if(in_state(Screen::Gameplay)),
    );
    app.add_systems(
        Update,
        reset_on_restart.run_if(in_state(Screen::Gameplay)),
    );
}

/// World pixels per displayed meter.
const PIXELS_PER_METER: f32 = 50.0;

/// The distance climbed this run.
#[derive(Resource, Debug, Default, Reflect)]
#[reflect(Resource)]
pub struct Score {
    pub meters: i64,
}

#[derive(Component)]
struct ScoreLabel;

fn meters_from_offset(offset: f32) -> i64 {
    (offset / PIXELS_PER_METER).floor().max(0.0) as i64
}

fn update_score(scroll: Res<CameraScroll>, mut score: ResMut<Score>) {
    let meters = meters_from_offset(scroll.offset);
    // Only write on change so the HUD refresh piggybacks on change detection.
    if score.meters != meters {
        score.meters = meters;
    }
}

fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        Name::new("Score HUD"),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            ..default()
        },
        GlobalZIndex(1),
        DespawnOnExit(Screen::Gameplay),
        children![(
            ScoreLabel,
            Text("0 m".to_string()),
            TextFont::from_font_size(24.0),
            TextColor(LABEL_TEXT),
        )],
    ));
}

fn update_hud(score: Res<Score>, mut labels: Query<&mut Text, With<ScoreLabel>>) {
    if !score.is_changed() {
        return;
    }
    for mut text in &mut labels {
        text.0 = format!("{} m", score.meters);
    }
}

fn open_game_over_on_death(
    mut died: MessageReader<PlayerDied>,
    score: Res<Score>,
    mut next_menu: ResMut<NextState<Menu>>,
) {
    if died.is_empty() {
        return;
    }
    died.clear();
    info!("Run over at {} m", score.meters);
    next_menu.set(Menu::GameOver);
}

fn reset_score(mut score: ResMut<Score>) {
    score.meters = 0;
}

fn reset_on_restart(mut restart: MessageReader<RestartGame>, score: ResMut<Score>) {
    if restart.is_empty() {
        return;
    }
    restart.clear();
    reset_score(score);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_converts_to_whole_meters() {
        assert_eq!(meters_from_offset(0.0), 0);
        assert_eq!(meters_from_offset(49.9), 0);
        assert_eq!(meters_from_offset(50.0), 1);
        assert_eq!(meters_from_offset(500.0), 10);
    }

    #[test]
    fn the_start_of_a_run_never_scores_negative() {
        assert_eq!(meters_from_offset(-120.0), 0);
    }
}
