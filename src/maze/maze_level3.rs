// Maze Level 3: corner to corner with conditionals and open-ended loops.
use super::Level;
use crate::blocks::BlockKind;
use crate::grid::{GridPosition, Heading};

pub static LEVEL3: Level = Level {
    name: "Level 3: The Long Way Round",
    start: GridPosition::new(0, 0),
    goal: GridPosition::new(7, 7),
    initial_heading: Heading::Right,
    required_blocks: &[
        BlockKind::MoveForward,
        BlockKind::TurnLeft,
        BlockKind::TurnRight,
        BlockKind::ControlsRepeatExt,
        BlockKind::IfFrontIsClear,
        BlockKind::RepeatUntil,
    ],
    instruction: "Walk to the wall, turn, then REPEAT UNTIL the goal is reached.",
};
