//! The game's menus and transitions between them.

mod gameover;
mod main;
mod pause;

use bevy::prelude::*;

use crate::Pause;

pub(super) fn plugin(app: &mut App) {
    app.init_state::<Menu>();

    // The simulation clock stops whenever any menu overlay is open.
    app.add_systems(OnExit(Menu::None), pause_game);
    app.add_systems(OnEnter(Menu::None), unpause_game);

    app.add_plugins((gameover::plugin, main::plugin, pause::plugin));
}

#[derive(States, Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Menu {
    #[default]
    None,
    Main,
    Pause,
    GameOver,
}

fn pause_game(mut next_pause: ResMut<NextState<Pause>>) {
    next_pause.set(Pause(true));
}

fn unpause_game(mut next_pause: ResMut<NextState<Pause>>) {
    next_pause.set(Pause(false));
}
