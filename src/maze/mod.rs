//! Level data and the level manager.
//!
//! Levels are immutable statics, one per file (`maze_levelN.rs`). The manager
//! only tracks which one is current; rewinding run state on a level change is
//! the session's job.

use serde::Serialize;

use crate::blocks::BlockKind;
use crate::error::LevelError;
use crate::grid::{Grid, GridPosition, Heading};
use crate::interpreter::Course;

mod maze_level1;
mod maze_level2;
mod maze_level3;
mod maze_level4;

pub use maze_level1::LEVEL1;
pub use maze_level2::LEVEL2;
pub use maze_level3::LEVEL3;
pub use maze_level4::LEVEL4;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    pub name: &'static str,
    pub start: GridPosition,
    pub goal: GridPosition,
    pub initial_heading: Heading,
    /// Toolbox contents for this level.
    pub required_blocks: &'static [BlockKind],
    pub instruction: &'static str,
}

impl Level {
    pub fn course(&self) -> Course {
        Course { start: self.start, heading: self.initial_heading, goal: self.goal }
    }

    pub fn fits(&self, grid: &Grid) -> bool {
        grid.contains(self.start) && grid.contains(self.goal)
    }

    pub fn allows(&self, kind: BlockKind) -> bool {
        self.required_blocks.contains(&kind)
    }
}

static LEVELS: [&Level; 4] = [&LEVEL1, &LEVEL2, &LEVEL3, &LEVEL4];

/// Shipped levels in play order.
pub fn levels() -> &'static [&'static Level] {
    &LEVELS
}

#[derive(Clone, Debug)]
pub struct LevelManager {
    levels: Vec<Level>,
    current: usize,
}

impl Default for LevelManager {
    fn default() -> Self {
        Self { levels: levels().iter().map(|l| (*l).clone()).collect(), current: 0 }
    }
}

impl LevelManager {
    pub fn new(levels: Vec<Level>) -> Result<Self, LevelError> {
        if levels.is_empty() {
            return Err(LevelError::OutOfRange { index: 0, len: 0 });
        }
        Ok(Self { levels, current: 0 })
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn current(&self) -> &Level {
        &self.levels[self.current]
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn load(&mut self, index: usize) -> Result<&Level, LevelError> {
        if index >= self.levels.len() {
            return Err(LevelError::OutOfRange { index, len: self.levels.len() });
        }
        self.current = index;
        Ok(&self.levels[index])
    }

    /// Next level; no wraparound past the end.
    pub fn advance(&mut self) -> Result<&Level, LevelError> {
        if self.current + 1 >= self.levels.len() {
            return Err(LevelError::NoNextLevel);
        }
        self.load(self.current + 1)
    }

    pub fn retreat(&mut self) -> Result<&Level, LevelError> {
        if self.current == 0 {
            return Err(LevelError::NoPreviousLevel);
        }
        self.load(self.current - 1)
    }
}
