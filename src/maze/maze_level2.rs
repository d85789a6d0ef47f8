// Maze Level 2: start facing the wrong way, then loop along the edge.
use super::Level;
use crate::blocks::BlockKind;
use crate::grid::{GridPosition, Heading};

pub static LEVEL2: Level = Level {
    name: "Level 2: Looping the Corner",
    start: GridPosition::new(0, 0),
    goal: GridPosition::new(7, 0),
    initial_heading: Heading::Down,
    required_blocks: &[
        BlockKind::MoveForward,
        BlockKind::TurnLeft,
        BlockKind::TurnRight,
        BlockKind::ControlsRepeatExt,
    ],
    instruction: "Turn toward the goal, then use a REPEAT block instead of stacking moves.",
};
