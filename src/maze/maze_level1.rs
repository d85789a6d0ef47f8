// Maze Level 1: a straight run along the top row.
// The first level table put the goal at (7,7); it sits at (7,0) so that the
// promised seven moves with no turns actually reach it.
use super::Level;
use crate::blocks::BlockKind;
use crate::grid::{GridPosition, Heading};

pub static LEVEL1: Level = Level {
    name: "Level 1: The First Step",
    start: GridPosition::new(0, 0),
    goal: GridPosition::new(7, 0),
    initial_heading: Heading::Right,
    required_blocks: &[BlockKind::MoveForward, BlockKind::TurnRight, BlockKind::TurnLeft],
    instruction: "Use MOVE FORWARD blocks to reach the goal. It's 7 steps!",
};
