//! Tic-tac-toe game engine for a human playing against the computer.
//!
//! This crate provides the game-state core only:
//! - Board and cell state, including the hover-preview flag
//! - Win and draw detection over the 8 lines
//! - Computer opponents behind a pluggable trait
//! - A controller that sequences turns and reports outcomes
//!
//! # Architecture
//!
//! Rendering and input polling live outside this crate. A front end feeds
//! [`GameInput`]s to [`GameController::handle`], reacts to the returned
//! [`GameEvent`]s, and polls [`GameController::snapshot`] to draw a frame.
//! With the `wasm` feature the controller is also exposed to JavaScript.
//!
//! # Modules
//!
//! - [`board`]: Players, cells and the 3x3 grid
//! - [`win`]: Line evaluation and terminal outcomes
//! - [`opponent`]: Computer move selection
//! - [`game`]: Turn sequencing state machine
//! - [`actions`]: Inputs and events

pub mod actions;
pub mod board;
pub mod game;
pub mod opponent;
#[cfg(feature = "wasm")]
pub mod wasm;
pub mod win;

// Re-export commonly used types
pub use actions::{GameEvent, GameInput};
pub use board::{Board, Cell, Occupant, Player, CELL_COUNT};
pub use game::{GameController, GameError, GamePhase, GameSnapshot, Seats};
pub use opponent::{Difficulty, Opponent, RandomOpponent};
pub use win::{evaluate, outcome, winning_line, Outcome, LINES};
