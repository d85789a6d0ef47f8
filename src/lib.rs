//! Maze Blocks core crate.
//!
//! A block editor produces a program (JSON block tree), [`blocks`] translates it
//! into [`program::Instruction`]s, and the [`interpreter`] walks a character over
//! an 8x8 grid toward the level's goal, one queued instruction at a time.
//! [`session`] adds the run/reset state machine and pacing; [`web`] exposes it to
//! the page through `wasm-bindgen`. Everything except `web` is plain Rust and is
//! tested natively.

use wasm_bindgen::prelude::*;

pub mod blocks;
pub mod config;
pub mod error;
pub mod grid;
pub mod interpreter;
pub mod maze;
pub mod program;
pub mod session;
pub mod web;

pub use blocks::{BlockKind, BlockProgram, TranslateOptions, translate, translate_json};
pub use config::GameConfig;
pub use error::{ConfigError, GameError, LevelError, RunError, TranslationError};
pub use grid::{Grid, GridPosition, Heading};
pub use interpreter::{Course, Effect, Interpreter, RunOutcome, RunState, Step};
pub use maze::{Level, LevelManager, levels};
pub use program::{Instruction, Limits, Program};
pub use session::{Phase, RunTicket, Session, Snapshot, Tick};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Names of the shipped levels, in play order.
#[wasm_bindgen(js_name = levelNames)]
pub fn level_names() -> Vec<String> {
    levels().iter().map(|l| l.name.to_string()).collect()
}
