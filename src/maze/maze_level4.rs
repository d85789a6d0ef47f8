// Maze Level 4: a diagonal staircase built from one procedure.
use super::Level;
use crate::blocks::BlockKind;
use crate::grid::{GridPosition, Heading};

pub static LEVEL4: Level = Level {
    name: "Level 4: Staircase",
    start: GridPosition::new(2, 2),
    goal: GridPosition::new(5, 5),
    initial_heading: Heading::Right,
    required_blocks: &[
        BlockKind::MoveForward,
        BlockKind::TurnLeft,
        BlockKind::TurnRight,
        BlockKind::ControlsRepeatExt,
        BlockKind::ProcedureDefinition,
        BlockKind::ProcedureCall,
    ],
    instruction: "Define a STEP procedure (move, turn right, move, turn left) and call it three times.",
};
