use macroquad::prelude::{KeyCode, is_key_pressed};

use crate::game::{Direction, Game, Phase};
use crate::storage::ScoreStore;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    TogglePause,
    Reset,
    ToggleWalls,
    Quit,
}

const BOUND_KEYS: &[KeyCode] = &[
    KeyCode::Up,
    KeyCode::W,
    KeyCode::Down,
    KeyCode::S,
    KeyCode::Left,
    KeyCode::A,
    KeyCode::Right,
    KeyCode::D,
    KeyCode::Space,
    KeyCode::R,
    KeyCode::T,
    KeyCode::Escape,
    KeyCode::Q,
];

pub fn command_for_key(key: KeyCode) -> Option<Command> {
    let command = match key {
        KeyCode::Up | KeyCode::W => Command::Turn(Direction::Up),
        KeyCode::Down | KeyCode::S => Command::Turn(Direction::Down),
        KeyCode::Left | KeyCode::A => Command::Turn(Direction::Left),
        KeyCode::Right | KeyCode::D => Command::Turn(Direction::Right),
        KeyCode::Space => Command::TogglePause,
        KeyCode::R => Command::Reset,
        KeyCode::T => Command::ToggleWalls,
        KeyCode::Escape | KeyCode::Q => Command::Quit,
        _ => return None,
    };
    Some(command)
}

/// Commands for every bound key pressed this frame.
pub fn poll_commands() -> Vec<Command> {
    BOUND_KEYS
        .iter()
        .filter(|key| is_key_pressed(**key))
        .filter_map(|key| command_for_key(*key))
        .collect()
}

/// Routes a command to the game. `Quit` is left to the caller.
pub fn apply<S: ScoreStore>(game: &mut Game<S>, command: Command) {
    match command {
        Command::Turn(direction) => game.set_direction(direction),
        Command::TogglePause if game.phase() == Phase::Over => {
            game.reset();
            game.start();
        }
        Command::TogglePause => game.toggle_pause(),
        Command::Reset => game.reset(),
        Command::ToggleWalls => game.toggle_wall_mode(),
        Command::Quit => {}
    }
}
