use bevy::prelude::*;
use tictactoe_ui::{GameSettings, TicTacToeUiPlugin};

fn main() {
    App::new()
        .add_plugins(TicTacToeUiPlugin::new(GameSettings::default()))
        .run();
}
