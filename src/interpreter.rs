//! Command-queue interpreter.
//!
//! The queue is consumed destructively, one instruction per [`Interpreter::step`].
//! Compound instructions never recurse: they splice their bodies back onto the
//! front of the queue, so the whole run is a flat loop that a host can pause
//! between any two steps.

use std::collections::{HashMap, VecDeque};

use serde::Serialize;

use crate::error::RunError;
use crate::grid::{Grid, GridPosition, Heading};
use crate::program::{Instruction, Program};

/// How a run ended. Distinguishable by hosts and tests alike.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RunOutcome {
    GoalReached,
    /// Queue exhausted without reaching the goal.
    OutOfMoves,
    /// Step cap hit, typically an unproductive `RepeatUntilGoal`.
    StepLimitReached,
}

/// Observable effect of one executed instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    Moved { from: GridPosition, to: GridPosition },
    /// A move into the outer boundary, absorbed without moving.
    Blocked { at: GridPosition },
    Turned { heading: Heading },
    Branched { taken: bool },
    LoopChecked { repeating: bool },
    Called { name: String },
    Expanded { count: u32 },
}

impl Effect {
    /// Effects that change what is drawn (and therefore get a pacing delay).
    pub fn is_visible(&self) -> bool {
        matches!(self, Effect::Moved { .. } | Effect::Blocked { .. } | Effect::Turned { .. })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    Applied(Effect),
    Finished(RunOutcome),
}

/// Mutable snapshot of one execution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunState {
    pub position: GridPosition,
    pub heading: Heading,
    pub queue: VecDeque<Instruction>,
    pub is_running: bool,
}

impl RunState {
    fn at_start(start: GridPosition, heading: Heading) -> Self {
        Self { position: start, heading, queue: VecDeque::new(), is_running: false }
    }
}

/// Start/goal geometry the interpreter needs from a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Course {
    pub start: GridPosition,
    pub heading: Heading,
    pub goal: GridPosition,
}

pub struct Interpreter {
    grid: Grid,
    course: Course,
    state: RunState,
    procedures: HashMap<String, Vec<Instruction>>,
    steps: u32,
    max_steps: u32,
    outcome: Option<RunOutcome>,
}

impl Interpreter {
    pub fn new(grid: Grid, course: Course, max_steps: u32) -> Self {
        Self {
            grid,
            course,
            state: RunState::at_start(course.start, course.heading),
            procedures: HashMap::new(),
            steps: 0,
            max_steps,
            outcome: None,
        }
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn course(&self) -> Course {
        self.course
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn outcome(&self) -> Option<RunOutcome> {
        self.outcome
    }

    pub fn at_goal(&self) -> bool {
        self.state.position == self.course.goal
    }

    pub fn is_path_clear(&self) -> bool {
        self.grid.is_path_clear(self.state.position, self.state.heading)
    }

    pub fn register_procedure(&mut self, name: impl Into<String>, body: Vec<Instruction>) {
        self.procedures.insert(name.into(), body);
    }

    /// Rewind to the course start, dropping the queue but keeping procedures.
    pub fn reset(&mut self) {
        self.state = RunState::at_start(self.course.start, self.course.heading);
        self.steps = 0;
        self.outcome = None;
    }

    /// Reset and queue a program. Its procedures replace any registered ones.
    pub fn load(&mut self, program: Program) {
        self.reset();
        self.procedures = program.procedures.into_iter().collect();
        self.state.queue = program.main.into();
        self.state.is_running = true;
    }

    /// Reset and queue bare instructions, keeping registered procedures.
    pub fn load_instructions(&mut self, instructions: Vec<Instruction>) {
        self.reset();
        self.state.queue = instructions.into();
        self.state.is_running = true;
    }

    /// Execute exactly one instruction.
    pub fn step(&mut self) -> Result<Step, RunError> {
        if !self.state.is_running {
            return self.outcome.map(Step::Finished).ok_or(RunError::NotRunning);
        }
        if self.steps >= self.max_steps {
            return Ok(self.finish(RunOutcome::StepLimitReached));
        }
        let Some(ins) = self.state.queue.pop_front() else {
            let outcome = if self.at_goal() { RunOutcome::GoalReached } else { RunOutcome::OutOfMoves };
            return Ok(self.finish(outcome));
        };
        self.steps += 1;

        let effect = match self.apply(ins) {
            Ok(effect) => effect,
            Err(e) => {
                self.state.queue.clear();
                self.state.is_running = false;
                return Err(e);
            }
        };
        if self.at_goal() {
            // Halt now; anything still queued never runs.
            self.outcome = Some(RunOutcome::GoalReached);
            self.state.queue.clear();
            self.state.is_running = false;
        }
        Ok(Step::Applied(effect))
    }

    /// Step until the run finishes.
    pub fn run_to_end(&mut self) -> Result<RunOutcome, RunError> {
        loop {
            if let Step::Finished(outcome) = self.step()? {
                return Ok(outcome);
            }
        }
    }

    fn finish(&mut self, outcome: RunOutcome) -> Step {
        self.state.queue.clear();
        self.state.is_running = false;
        self.outcome = Some(outcome);
        Step::Finished(outcome)
    }

    fn splice_front(&mut self, body: &[Instruction]) {
        for ins in body.iter().rev() {
            self.state.queue.push_front(ins.clone());
        }
    }

    fn apply(&mut self, ins: Instruction) -> Result<Effect, RunError> {
        let effect = match ins {
            Instruction::Move => {
                let from = self.state.position;
                match self.grid.forward(from, self.state.heading) {
                    Some(to) => {
                        self.state.position = to;
                        Effect::Moved { from, to }
                    }
                    None => Effect::Blocked { at: from },
                }
            }
            Instruction::TurnLeft => {
                self.state.heading = self.state.heading.turned_left();
                Effect::Turned { heading: self.state.heading }
            }
            Instruction::TurnRight => {
                self.state.heading = self.state.heading.turned_right();
                Effect::Turned { heading: self.state.heading }
            }
            Instruction::RepeatN { count, body } => {
                // Expanded one copy at a time so queue growth stays bounded by the step cap.
                if count > 1 {
                    let rest = Instruction::RepeatN { count: count - 1, body: body.clone() };
                    self.state.queue.push_front(rest);
                }
                if count > 0 {
                    self.splice_front(&body);
                }
                Effect::Expanded { count }
            }
            Instruction::IfPathClear { body } => {
                let taken = self.is_path_clear();
                if taken {
                    self.splice_front(&body);
                }
                Effect::Branched { taken }
            }
            Instruction::RepeatUntilGoal { body } => {
                let repeating = !self.at_goal();
                if repeating {
                    let again = Instruction::RepeatUntilGoal { body: body.clone() };
                    self.state.queue.push_front(again);
                    self.splice_front(&body);
                }
                Effect::LoopChecked { repeating }
            }
            Instruction::CallProcedure { name } => {
                let body = self
                    .procedures
                    .get(&name)
                    .cloned()
                    .ok_or_else(|| RunError::UnknownProcedure { name: name.clone() })?;
                self.splice_front(&body);
                Effect::Called { name }
            }
        };
        Ok(effect)
    }
}
