//! Startup configuration read from the environment.

use anyhow::{anyhow, Context};
use tictactoe_core::Difficulty;

/// Seeds the opponent for reproducible games
pub const SEED_VAR: &str = "TICTACTOE_SEED";

/// easy | medium | hard
pub const DIFFICULTY_VAR: &str = "TICTACTOE_DIFFICULTY";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Config {
    pub seed: Option<u64>,
    pub difficulty: Difficulty,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(
            std::env::var(SEED_VAR).ok().as_deref(),
            std::env::var(DIFFICULTY_VAR).ok().as_deref(),
        )
    }

    fn from_vars(seed: Option<&str>, difficulty: Option<&str>) -> anyhow::Result<Self> {
        let seed = seed
            .map(|s| s.trim().parse::<u64>())
            .transpose()
            .with_context(|| format!("{} must be an unsigned integer", SEED_VAR))?;

        let difficulty = difficulty
            .map(|d| d.parse::<Difficulty>())
            .transpose()
            .map_err(|e| anyhow!("invalid {}: {}", DIFFICULTY_VAR, e))?
            .unwrap_or_default();

        Ok(Self { seed, difficulty })
    }
}
