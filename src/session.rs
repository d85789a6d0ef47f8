//! Run/reset state machine driving the interpreter at a fixed pace.
//!
//! The session never sleeps itself. [`Session::run`] hands out a [`RunTicket`];
//! the host waits `delay_ms` after each [`Tick::Continue`] and calls
//! [`Session::tick`] again with the ticket it was given. `reset` and level
//! changes bump the generation, which turns every outstanding ticket stale, so a
//! late timer callback can never move the character after a reset.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::blocks::{TranslateOptions, translate_json};
use crate::config::GameConfig;
use crate::error::{ConfigError, GameError, LevelError, RunError};
use crate::grid::{Grid, GridPosition, Heading};
use crate::interpreter::{Interpreter, RunOutcome, Step};
use crate::maze::{Level, LevelManager};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "state", content = "outcome")]
pub enum Phase {
    Idle,
    Running,
    Finished(RunOutcome),
}

/// Proof that a scheduled resumption belongs to the current run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunTicket {
    generation: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    /// A visible step happened; resume after `delay_ms` with `ticket`.
    Continue { ticket: RunTicket, delay_ms: u32 },
    Finished(RunOutcome),
    /// The ticket predates a reset or the run already ended. Nothing changed.
    Stale,
}

pub struct Session {
    config: GameConfig,
    grid: Grid,
    levels: LevelManager,
    interpreter: Interpreter,
    phase: Phase,
    generation: u64,
}

impl Session {
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        Self::with_levels(config, LevelManager::default())
    }

    pub fn with_levels(config: GameConfig, levels: LevelManager) -> Result<Self, GameError> {
        config.validate()?;
        let grid = Grid::new(config.grid_size);
        if let Some(bad) = levels.levels().iter().find(|l| !l.fits(&grid)) {
            return Err(ConfigError::Invalid(format!(
                "level \"{}\" does not fit a {}x{} grid",
                bad.name, grid.size, grid.size
            ))
            .into());
        }
        let interpreter = Interpreter::new(grid, levels.current().course(), config.max_steps);
        Ok(Self { config, grid, levels, interpreter, phase: Phase::Idle, generation: 0 })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn level(&self) -> &Level {
        self.levels.current()
    }

    pub fn level_index(&self) -> usize {
        self.levels.current_index()
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    /// Reset, translate the editor's JSON program and start running it.
    pub fn run(&mut self, program_json: &str) -> Result<RunTicket, GameError> {
        self.reset();
        let level = self.levels.current();
        let opts = TranslateOptions {
            limits: self.config.limits(),
            toolbox: self.config.enforce_toolbox.then_some(level.required_blocks),
        };
        let program = translate_json(program_json, &opts).inspect_err(|e| {
            warn!(level_name = level.name, error = %e, "program rejected");
        })?;
        info!(
            level_name = level.name,
            instructions = program.main.len(),
            procedures = program.procedures.len(),
            "run started"
        );
        self.interpreter.load(program);
        self.phase = Phase::Running;
        Ok(self.ticket())
    }

    /// Advance until one visible effect has been applied or the run ends.
    pub fn tick(&mut self, ticket: RunTicket) -> Result<Tick, RunError> {
        if ticket.generation != self.generation || self.phase != Phase::Running {
            debug!(ticket = ticket.generation, current = self.generation, "stale tick ignored");
            return Ok(Tick::Stale);
        }
        loop {
            match self.interpreter.step() {
                Ok(Step::Applied(effect)) if effect.is_visible() => {
                    debug!(?effect, "step");
                    return Ok(Tick::Continue { ticket, delay_ms: self.config.step_delay_ms });
                }
                Ok(Step::Applied(effect)) => debug!(?effect, "control step"),
                Ok(Step::Finished(outcome)) => {
                    info!(?outcome, steps = self.interpreter.steps(), "run finished");
                    self.phase = Phase::Finished(outcome);
                    return Ok(Tick::Finished(outcome));
                }
                Err(e) => {
                    warn!(error = %e, "run aborted");
                    self.generation += 1;
                    self.phase = Phase::Idle;
                    return Err(e);
                }
            }
        }
    }

    /// Drive the current run to completion without pacing.
    pub fn run_headless(&mut self, program_json: &str) -> Result<RunOutcome, GameError> {
        let mut ticket = self.run(program_json)?;
        loop {
            match self.tick(ticket)? {
                Tick::Continue { ticket: next, .. } => ticket = next,
                Tick::Finished(outcome) => return Ok(outcome),
                Tick::Stale => return Err(RunError::NotRunning.into()),
            }
        }
    }

    /// Cancel any in-flight run and rewind to the level start.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.interpreter.reset();
        self.phase = Phase::Idle;
        debug!(generation = self.generation, "reset");
    }

    pub fn load_level(&mut self, index: usize) -> Result<&Level, LevelError> {
        self.levels.load(index)?;
        Ok(self.enter_current_level())
    }

    pub fn next_level(&mut self) -> Result<&Level, LevelError> {
        self.levels.advance()?;
        Ok(self.enter_current_level())
    }

    pub fn previous_level(&mut self) -> Result<&Level, LevelError> {
        self.levels.retreat()?;
        Ok(self.enter_current_level())
    }

    fn enter_current_level(&mut self) -> &Level {
        self.reset();
        let level = self.levels.current();
        self.interpreter = Interpreter::new(self.grid, level.course(), self.config.max_steps);
        info!(index = self.levels.current_index(), level_name = level.name, "level loaded");
        level
    }

    fn ticket(&self) -> RunTicket {
        RunTicket { generation: self.generation }
    }

    pub fn snapshot(&self) -> Snapshot {
        let level = self.levels.current();
        let state = self.interpreter.state();
        let cell = self.config.cell_size;
        let (px, py) = state.position.pixel_center(cell);
        let (gx, gy) = level.goal.pixel_center(cell);
        Snapshot {
            level_index: self.levels.current_index(),
            level_count: self.levels.len(),
            level_name: level.name,
            instruction: level.instruction,
            required_blocks: level.required_blocks.iter().map(|b| b.as_str()).collect(),
            grid_size: self.grid.size,
            cell_size: cell,
            position: state.position,
            pixel: [px, py],
            heading: state.heading,
            heading_index: state.heading.index(),
            goal: level.goal,
            goal_pixel: [gx, gy],
            phase: self.phase,
            steps: self.interpreter.steps(),
        }
    }
}

/// Everything a host needs to draw the board.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub level_index: usize,
    pub level_count: usize,
    pub level_name: &'static str,
    pub instruction: &'static str,
    pub required_blocks: Vec<&'static str>,
    pub grid_size: u32,
    pub cell_size: f64,
    pub position: GridPosition,
    pub pixel: [f64; 2],
    pub heading: Heading,
    pub heading_index: u8,
    pub goal: GridPosition,
    pub goal_pixel: [f64; 2],
    pub phase: Phase,
    pub steps: u32,
}
