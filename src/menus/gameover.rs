//! The game over overlay, shown when the player dies.
//!
//! The run can be restarted in place (nothing is torn down; every gameplay
//! module re-arms itself on [`RestartGame`]) or abandoned back to the title.

use bevy::prelude::*;

use crate::{
    AppSystems,
    game::{RestartGame, input::ControlState, score::Score},
    menus::Menu,
    screens::Screen,
    theme::widget,
};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Menu::GameOver), spawn_game_over_menu);

    // The fire button doubles as a restart button while dead. Runs after
    // input recording so the edge is seen the frame it happens.
    app.add_systems(
        Update,
        restart_from_input
            .in_set(AppSystems::Update)
            .run_if(in_state(Menu::GameOver).and(in_state(Screen::Gameplay))),
    );
}

fn spawn_game_over_menu(mut commands: Commands, score: Res<Score>) {
    commands.spawn((
        widget::overlay_root("Game Over Menu"),
        GlobalZIndex(2),
        DespawnOnExit(Menu::GameOver),
        children![
            widget::header("Game Over"),
            widget::label(format!("You climbed {} m", score.meters)),
            widget::button("Retry", retry),
            widget::button("Quit to title", quit_to_title),
        ],
    ));
}

fn retry(
    _: On<Pointer<Click>>,
    mut restart: MessageWriter<RestartGame>,
    mut next_menu: ResMut<NextState<Menu>>,
) {
    restart.write(RestartGame);
    next_menu.set(Menu::None);
}

fn restart_from_input(
    mut control: ResMut<ControlState>,
    mut restart: MessageWriter<RestartGame>,
    mut next_menu: ResMut<NextState<Menu>>,
) {
    if control.restart {
        control.restart = false;
        restart.write(RestartGame);
        next_menu.set(Menu::None);
    }
}

fn quit_to_title(_: On<Pointer<Click>>, mut next_screen: ResMut<NextState<Screen>>) {
    next_screen.set(Screen::Title);
}
