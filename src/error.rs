//! Error types. Every failure is local to one run; `Session::reset` recovers.
//!
//! Moving into the outer boundary is deliberately absent here: the interpreter
//! absorbs it as a no-op move.

use crate::blocks::BlockKind;

/// The visual program could not be turned into instructions. The run never starts.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TranslationError {
    #[error("malformed program: {0}")]
    Malformed(String),
    #[error("call to undefined procedure \"{name}\"")]
    UnknownProcedure { name: String },
    #[error("procedure \"{name}\" is defined more than once")]
    DuplicateProcedure { name: String },
    #[error("procedure definitions need a name")]
    EmptyProcedureName,
    #[error("block \"{}\" is not available on this level", block.as_str())]
    BlockNotAvailable { block: BlockKind },
    #[error("program expands to more than {limit} instructions")]
    TooManyInstructions { limit: usize },
    #[error("blocks are nested more than {limit} levels deep")]
    NestingTooDeep { limit: usize },
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RunError {
    #[error("unknown procedure \"{name}\"")]
    UnknownProcedure { name: String },
    #[error("no program is loaded")]
    NotRunning,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LevelError {
    #[error("level {index} does not exist ({len} levels)")]
    OutOfRange { index: usize, len: usize },
    #[error("already on the last level")]
    NoNextLevel,
    #[error("already on the first level")]
    NoPreviousLevel,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("could not parse config: {0}")]
    Parse(String),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error(transparent)]
    Translation(#[from] TranslationError),
    #[error(transparent)]
    Run(#[from] RunError),
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
