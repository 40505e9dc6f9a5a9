//! Text front end: command parsing and board rendering.

use thiserror::Error;
use tictactoe_core::{
    GameController, GameError, GameInput, GamePhase, Outcome, Player, Seats, CELL_COUNT,
};

/// A line typed by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Forwarded to the engine
    Input(GameInput),
    /// Print the JSON snapshot
    State,
    /// Start a new game
    Restart,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("cell must be a number from 1 to 9, got '{0}'")]
    BadCell(String),

    #[error("unknown command '{0}' (type 'help')")]
    Unknown(String),
}

pub const HELP: &str = "\
Commands:
  x | o        choose your shape
  1-9          place your mark on a cell
  hover <1-9>  preview your mark on a cell ('hover' alone clears it)
  state        print the game as JSON
  new          start a new game
  quit         leave";

/// Parse a typed line. Cells are numbered 1-9 for the user and 0-8 internally.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let mut words = line.split_whitespace();
    let first = words.next().ok_or(CommandError::Empty)?.to_ascii_lowercase();

    let command = match first.as_str() {
        "x" | "cross" => Command::Input(GameInput::ChooseShape(Player::Cross)),
        "o" | "circle" => Command::Input(GameInput::ChooseShape(Player::Circle)),
        "h" | "hover" => {
            let index = words.next().map(parse_cell).transpose()?;
            Command::Input(GameInput::HoverCell(index))
        }
        "state" => Command::State,
        "new" | "restart" => Command::Restart,
        "help" | "?" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,
        other if other.chars().all(|c| c.is_ascii_digit()) => {
            Command::Input(GameInput::SelectCell(parse_cell(other)?))
        }
        other => return Err(CommandError::Unknown(other.to_string())),
    };

    Ok(command)
}

fn parse_cell(word: &str) -> Result<usize, CommandError> {
    match word.parse::<usize>() {
        Ok(n) if (1..=CELL_COUNT).contains(&n) => Ok(n - 1),
        _ => Err(CommandError::BadCell(word.to_string())),
    }
}

/// What to show above the input prompt
pub fn render(game: &GameController) -> String {
    match game.phase() {
        GamePhase::ChoosingShape => "Choose your shape: x or o".to_string(),
        GamePhase::InProgress { .. } => format!("{}\n\nYour move (1-9):", game.board()),
        GamePhase::Finished { outcome } => format!(
            "{}\n\n{}\nType 'new' to play again or 'quit' to leave.",
            game.board(),
            outcome_message(outcome, game.seats())
        ),
    }
}

pub fn outcome_message(outcome: Outcome, seats: Option<Seats>) -> String {
    match outcome.winner() {
        None => "It's a draw.".to_string(),
        Some(player) if seats.map(|s| s.human) == Some(player) => {
            format!("You win as {}!", player)
        }
        Some(player) => format!("The computer wins as {}.", player),
    }
}

/// Engine errors worded for the user, with cells numbered 1-9
pub fn describe_error(error: &GameError) -> String {
    match error {
        GameError::CellOccupied(index) => format!("Cell {} is already occupied", index + 1),
        GameError::IndexOutOfRange(index) => {
            format!("Cell {} is out of range (expected 1-9)", index + 1)
        }
        other => other.to_string(),
    }
}
