//! Computer opponents.
//!
//! The controller only sees the [`Opponent`] trait. Only the uniformly random
//! strategy is implemented; [`Difficulty::Medium`] and [`Difficulty::Hard`]
//! are named so front ends can offer them, but building one fails with
//! [`GameError::UnsupportedDifficulty`].

use crate::board::Board;
use crate::game::GameError;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A strategy for picking the computer's next cell
pub trait Opponent: fmt::Debug {
    /// Choose an empty cell on `board`.
    ///
    /// Fails with [`GameError::NoLegalMoves`] if the board is full.
    fn choose_move(&mut self, board: &Board) -> Result<usize, GameError>;
}

/// Opponent difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Build the opponent for this difficulty, seeded if `seed` is given
    pub fn opponent(self, seed: Option<u64>) -> Result<Box<dyn Opponent>, GameError> {
        match self {
            Difficulty::Easy => Ok(Box::new(match seed {
                Some(seed) => RandomOpponent::with_seed(seed),
                None => RandomOpponent::new(),
            })),
            Difficulty::Medium | Difficulty::Hard => Err(GameError::UnsupportedDifficulty(self)),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty '{}'", other)),
        }
    }
}

/// Easy: picks uniformly among the empty cells
#[derive(Debug)]
pub struct RandomOpponent {
    rng: StdRng,
}

impl RandomOpponent {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomOpponent {
    fn default() -> Self {
        Self::new()
    }
}

impl Opponent for RandomOpponent {
    fn choose_move(&mut self, board: &Board) -> Result<usize, GameError> {
        let empty: Vec<usize> = board.empty_cells().collect();
        empty
            .choose(&mut self.rng)
            .copied()
            .ok_or(GameError::NoLegalMoves)
    }
}
