// Behavioural properties of the interpreter, checked exhaustively over the 8x8 grid.

use maze_blocks::{Course, Grid, GridPosition, Heading, Instruction, Interpreter, RunOutcome};

fn interpreter_at(pos: GridPosition, heading: Heading) -> Interpreter {
    // Goal off the beaten path so runs end by exhausting the queue.
    let goal = if pos == GridPosition::new(7, 7) { GridPosition::new(0, 0) } else { GridPosition::new(7, 7) };
    Interpreter::new(Grid::new(8), Course { start: pos, heading, goal }, 10_000)
}

fn all_poses() -> impl Iterator<Item = (GridPosition, Heading)> {
    (0..8).flat_map(|col| {
        (0..8).flat_map(move |row| Heading::ALL.into_iter().map(move |h| (GridPosition::new(col, row), h)))
    })
}

#[test]
fn single_move_is_whole_step_or_nothing() {
    for (pos, heading) in all_poses() {
        let mut it = interpreter_at(pos, heading);
        it.load_instructions(vec![Instruction::Move]);
        it.run_to_end().unwrap();
        let after = it.state().position;
        let dist = after.col.abs_diff(pos.col) + after.row.abs_diff(pos.row);
        if Grid::new(8).is_path_clear(pos, heading) {
            assert_eq!(dist, 1, "{pos:?} {heading:?}");
            let (dx, dy) = heading.delta();
            assert_eq!(after.col as i64 - pos.col as i64, dx);
            assert_eq!(after.row as i64 - pos.row as i64, dy);
        } else if after != it.course().goal {
            assert_eq!(after, pos, "{pos:?} {heading:?}");
        }
        assert_eq!(it.state().heading, heading);
    }
}

#[test]
fn turn_pairs_and_full_rotation_restore_heading() {
    use Instruction::*;
    for (pos, heading) in all_poses() {
        for program in [
            vec![TurnLeft, TurnRight],
            vec![TurnRight, TurnLeft],
            vec![TurnRight, TurnRight, TurnRight, TurnRight],
        ] {
            let mut it = interpreter_at(pos, heading);
            it.load_instructions(program);
            it.run_to_end().unwrap();
            assert_eq!(it.state().heading, heading);
            assert_eq!(it.state().position, pos);
        }
    }
}

#[test]
fn repeat_n_matches_k_sequential_copies() {
    use Instruction::*;
    let body = vec![Move, TurnRight, Move, TurnLeft];
    for k in 0..4u32 {
        let mut repeated = interpreter_at(GridPosition::new(0, 0), Heading::Right);
        repeated.load_instructions(vec![Instruction::repeat(k, body.clone())]);
        repeated.run_to_end().unwrap();

        let mut unrolled = interpreter_at(GridPosition::new(0, 0), Heading::Right);
        unrolled.load_instructions(body.iter().cloned().cycle().take(body.len() * k as usize).collect());
        unrolled.run_to_end().unwrap();

        assert_eq!(repeated.state().position, unrolled.state().position);
        assert_eq!(repeated.state().heading, unrolled.state().heading);
        assert_eq!(repeated.state().position, GridPosition::new(k, k));
    }
}

#[test]
fn square_procedure_returns_home() {
    use Instruction::*;
    let mut it = interpreter_at(GridPosition::new(1, 1), Heading::Right);
    it.register_procedure("square", vec![Move, Move, Move, TurnRight]);
    it.load_instructions(vec![Instruction::repeat(4, vec![Instruction::call("square")])]);
    assert_eq!(it.run_to_end(), Ok(RunOutcome::OutOfMoves));
    assert_eq!(it.state().position, GridPosition::new(1, 1));
    assert_eq!(it.state().heading, Heading::Right);
}
