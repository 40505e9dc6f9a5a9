//! Inputs the presentation layer sends and the events the engine emits back.

use crate::board::Player;
use crate::win::Outcome;
use serde::{Deserialize, Serialize};

/// Everything a front end can ask the engine to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameInput {
    /// The human picks their mark; only valid before the game starts
    ChooseShape(Player),
    /// The human clicks a cell (0-8)
    SelectCell(usize),
    /// The pointer moved over a cell, or off the board (`None`)
    HoverCell(Option<usize>),
}

/// Side effects a front end should reflect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Marks were bound to the two sides
    ShapeChosen { human: Player, opponent: Player },

    /// A cell now shows a mark
    CellMarked { index: usize, player: Player },

    /// The game reached a terminal state
    GameEnded { outcome: Outcome },
}
