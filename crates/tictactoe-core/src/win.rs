//! Terminal-state detection.
//!
//! Pure functions over a [`Board`]. The detector assumes the board was built
//! through [`Board::place`] under the normal turn protocol, so at most one
//! player can hold a complete line. If that does not hold, the first line in
//! scan order wins.

use crate::board::{Board, Player};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// The 8 winning lines: rows, then columns, then diagonals
pub const LINES: [[usize; 3]; 8] = [
    // Rows
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // Columns
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // Diagonals
    [0, 4, 8],
    [2, 4, 6],
];

/// How a finished game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win(Player),
    Draw,
}

impl Outcome {
    pub fn winner(&self) -> Option<Player> {
        match self {
            Outcome::Win(player) => Some(*player),
            Outcome::Draw => None,
        }
    }
}

/// First fully-marked line and its owner
pub fn winning_line(board: &Board) -> Option<(Player, [usize; 3])> {
    let cells = board.cells();
    LINES.iter().find_map(|&line| {
        let [a, b, c] = line;
        let player = cells[a].mark()?;
        (cells[b].mark() == Some(player) && cells[c].mark() == Some(player))
            .then_some((player, line))
    })
}

/// The player holding a complete line, if any
#[instrument(skip(board))]
pub fn evaluate(board: &Board) -> Option<Player> {
    winning_line(board).map(|(player, _)| player)
}

/// Combine line evaluation with board fullness.
///
/// `None` means the game continues.
pub fn outcome(board: &Board) -> Option<Outcome> {
    if let Some(player) = evaluate(board) {
        Some(Outcome::Win(player))
    } else if board.is_full() {
        Some(Outcome::Draw)
    } else {
        None
    }
}
