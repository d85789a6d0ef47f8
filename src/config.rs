//! Tunables for the grid, pacing and runaway guards.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::grid::{DEFAULT_CELL_SIZE, DEFAULT_GRID_SIZE};
use crate::program::Limits;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    /// Cells per side of the square grid.
    pub grid_size: u32,
    /// Pixel edge of one cell; only used for derived pixel positions.
    pub cell_size: f64,
    /// Pause after each visible step (ms).
    pub step_delay_ms: u32,
    /// Instructions executed per run before it is abandoned.
    pub max_steps: u32,
    pub max_expanded_instructions: usize,
    pub max_nesting_depth: usize,
    /// Reject blocks that are not in the current level's toolbox.
    pub enforce_toolbox: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            cell_size: DEFAULT_CELL_SIZE,
            step_delay_ms: 150,
            max_steps: 10_000,
            max_expanded_instructions: 10_000,
            max_nesting_depth: 32,
            enforce_toolbox: true,
        }
    }
}

impl GameConfig {
    /// Parse a (possibly partial) JSON override; missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: GameConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size == 0 {
            return Err(ConfigError::Invalid("gridSize must be at least 1".into()));
        }
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(ConfigError::Invalid("cellSize must be positive".into()));
        }
        if self.max_steps == 0 {
            return Err(ConfigError::Invalid("maxSteps must be at least 1".into()));
        }
        if self.max_expanded_instructions == 0 {
            return Err(ConfigError::Invalid(
                "maxExpandedInstructions must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn limits(&self) -> Limits {
        Limits {
            max_expanded_instructions: self.max_expanded_instructions,
            max_nesting_depth: self.max_nesting_depth,
        }
    }
}
