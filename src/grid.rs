//! Grid geometry: cell positions, headings and the outer-boundary check used by
//! both `Move` and the path-clear predicate.

use serde::{Deserialize, Serialize};

pub const DEFAULT_GRID_SIZE: u32 = 8;
pub const DEFAULT_CELL_SIZE: f64 = 50.0;

// --- Positions ----------------------------------------------------------------

/// Integer cell coordinates. Rows grow downward, matching canvas space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPosition {
    pub col: u32,
    pub row: u32,
}

impl GridPosition {
    pub const fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }

    /// Pixel coordinates of the cell center.
    pub fn pixel_center(self, cell_size: f64) -> (f64, f64) {
        let half = cell_size / 2.0;
        (
            self.col as f64 * cell_size + half,
            self.row as f64 * cell_size + half,
        )
    }

    /// Inverse of [`pixel_center`](Self::pixel_center). Returns `None` for points
    /// that are not exactly a cell center.
    pub fn from_pixel_center(x: f64, y: f64, cell_size: f64) -> Option<Self> {
        if cell_size <= 0.0 {
            return None;
        }
        let half = cell_size / 2.0;
        let col = (x - half) / cell_size;
        let row = (y - half) / cell_size;
        if col < 0.0 || row < 0.0 || col.fract() != 0.0 || row.fract() != 0.0 {
            return None;
        }
        Some(Self::new(col as u32, row as u32))
    }
}

// --- Headings -----------------------------------------------------------------

/// Facing direction. Discriminants match the integer encoding used by level data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Heading {
    #[default]
    Right = 0,
    Down = 1,
    Left = 2,
    Up = 3,
}

impl Heading {
    pub const ALL: [Heading; 4] = [Heading::Right, Heading::Down, Heading::Left, Heading::Up];

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(idx: u8) -> Option<Self> {
        Self::ALL.get(idx as usize).copied()
    }

    pub fn turned_left(self) -> Self {
        Self::ALL[(self.index() as usize + 3) % 4]
    }

    pub fn turned_right(self) -> Self {
        Self::ALL[(self.index() as usize + 1) % 4]
    }

    /// One-cell step as (dcol, drow).
    pub fn delta(self) -> (i64, i64) {
        match self {
            Heading::Right => (1, 0),
            Heading::Down => (0, 1),
            Heading::Left => (-1, 0),
            Heading::Up => (0, -1),
        }
    }
}

// --- Grid ---------------------------------------------------------------------

/// Square playing field. Only the outer boundary blocks movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub size: u32,
}

impl Default for Grid {
    fn default() -> Self {
        Self { size: DEFAULT_GRID_SIZE }
    }
}

impl Grid {
    pub const fn new(size: u32) -> Self {
        Self { size }
    }

    pub fn contains(&self, pos: GridPosition) -> bool {
        pos.col < self.size && pos.row < self.size
    }

    /// The cell one step ahead, or `None` if that step would leave the grid.
    pub fn forward(&self, pos: GridPosition, heading: Heading) -> Option<GridPosition> {
        let (dx, dy) = heading.delta();
        let nx = pos.col as i64 + dx;
        let ny = pos.row as i64 + dy;
        if nx < 0 || ny < 0 || nx >= self.size as i64 || ny >= self.size as i64 {
            return None;
        }
        Some(GridPosition::new(nx as u32, ny as u32))
    }

    /// Path-clear predicate: true iff a forward move stays on the grid.
    pub fn is_path_clear(&self, pos: GridPosition, heading: Heading) -> bool {
        self.forward(pos, heading).is_some()
    }
}
