//! Board representation: players, cells and the 3x3 grid.
//!
//! This module contains:
//! - The two marks a player can hold (`Cross`, `Circle`)
//! - Cell occupancy and the transient hover-preview flag
//! - The 9-cell board with placement and preview operations
//!
//! The board knows nothing about turns or who is human. Turn order lives in
//! [`crate::game::GameController`].

use crate::game::GameError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Number of cells on the board
pub const CELL_COUNT: usize = 9;

/// Width (and height) of the square grid
pub const BOARD_WIDTH: usize = 3;

/// The mark a player places on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    /// X - always moves first
    Cross,
    /// O
    Circle,
}

impl Player {
    /// Both marks, in turn order
    pub const ALL: [Player; 2] = [Player::Cross, Player::Circle];

    /// The opposing mark
    pub fn other(self) -> Self {
        match self {
            Player::Cross => Player::Circle,
            Player::Circle => Player::Cross,
        }
    }

    /// Single-character symbol used for text rendering
    pub fn symbol(self) -> char {
        match self {
            Player::Cross => 'X',
            Player::Circle => 'O',
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Cross => write!(f, "Cross"),
            Player::Circle => write!(f, "Circle"),
        }
    }
}

/// What currently sits in a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occupant {
    Empty,
    Mark(Player),
}

/// A single grid position.
///
/// Once marked, a cell never changes again for the rest of the game.
/// `previewed` is a presentation hint and only ever true while the cell is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCell")]
pub struct Cell {
    occupant: Occupant,
    previewed: bool,
}

/// Unchecked wire form of a [`Cell`]
#[derive(Deserialize)]
struct RawCell {
    occupant: Occupant,
    previewed: bool,
}

impl TryFrom<RawCell> for Cell {
    type Error = String;

    fn try_from(raw: RawCell) -> Result<Self, Self::Error> {
        if raw.previewed && raw.occupant != Occupant::Empty {
            return Err(format!("marked cell cannot be previewed: {:?}", raw.occupant));
        }
        Ok(Self {
            occupant: raw.occupant,
            previewed: raw.previewed,
        })
    }
}

impl Cell {
    /// Create an empty, unpreviewed cell
    pub fn new() -> Self {
        Self {
            occupant: Occupant::Empty,
            previewed: false,
        }
    }

    pub fn occupant(&self) -> Occupant {
        self.occupant
    }

    pub fn is_previewed(&self) -> bool {
        self.previewed
    }

    pub fn is_empty(&self) -> bool {
        self.occupant == Occupant::Empty
    }

    /// The player holding this cell, if any
    pub fn mark(&self) -> Option<Player> {
        match self.occupant {
            Occupant::Mark(player) => Some(player),
            Occupant::Empty => None,
        }
    }

    /// Toggle the preview flag. Ignored on marked cells; returns whether the flag changed.
    fn set_preview(&mut self, previewed: bool) -> bool {
        if !self.is_empty() || self.previewed == previewed {
            return false;
        }
        self.previewed = previewed;
        true
    }

    fn place(&mut self, player: Player) {
        self.occupant = Occupant::Mark(player);
        self.previewed = false;
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new()
    }
}

/// The 3x3 grid, indexed 0-8 row-major (`row * 3 + column`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [Cell; CELL_COUNT],
}

impl Board {
    /// Create an empty board
    pub fn new() -> Self {
        Self {
            cells: [Cell::new(); CELL_COUNT],
        }
    }

    /// Get the cell at an index
    pub fn cell_at(&self, index: usize) -> Result<&Cell, GameError> {
        self.cells.get(index).ok_or(GameError::IndexOutOfRange(index))
    }

    /// All cells in index order
    pub fn cells(&self) -> &[Cell; CELL_COUNT] {
        &self.cells
    }

    /// Mark a cell for a player.
    ///
    /// Fails without touching the board if the index is invalid or the cell
    /// is already marked. Clears the cell's preview flag.
    pub fn place(&mut self, index: usize, player: Player) -> Result<(), GameError> {
        let cell = self
            .cells
            .get_mut(index)
            .ok_or(GameError::IndexOutOfRange(index))?;

        if !cell.is_empty() {
            return Err(GameError::CellOccupied(index));
        }

        cell.place(player);
        debug!(index, %player, "cell marked");
        Ok(())
    }

    /// Set or clear the preview flag on an empty cell.
    ///
    /// Returns `Ok(false)` when nothing changed, including when the cell is marked.
    pub fn set_preview(&mut self, index: usize, previewed: bool) -> Result<bool, GameError> {
        let cell = self
            .cells
            .get_mut(index)
            .ok_or(GameError::IndexOutOfRange(index))?;
        Ok(cell.set_preview(previewed))
    }

    /// Clear every preview flag
    pub fn clear_previews(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.set_preview(false);
        }
    }

    /// Index of the previewed cell, if one is
    pub fn previewed_cell(&self) -> Option<usize> {
        self.cells.iter().position(|c| c.is_previewed())
    }

    /// Indices of all empty cells, ascending
    pub fn empty_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_empty())
            .map(|(index, _)| index)
    }

    /// Number of marked cells
    pub fn marked_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    /// True when every cell holds a mark
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    /// Renders the grid with cell numbers 1-9 on empty cells and a
    /// dot on a previewed cell.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..BOARD_WIDTH {
            for column in 0..BOARD_WIDTH {
                let index = row * BOARD_WIDTH + column;
                let cell = &self.cells[index];
                match cell.occupant {
                    Occupant::Mark(player) => write!(f, " {} ", player.symbol())?,
                    Occupant::Empty if cell.previewed => write!(f, " . ")?,
                    Occupant::Empty => write!(f, " {} ", index + 1)?,
                }
                if column < BOARD_WIDTH - 1 {
                    write!(f, "|")?;
                }
            }
            if row < BOARD_WIDTH - 1 {
                write!(f, "\n---+---+---\n")?;
            }
        }
        Ok(())
    }
}
