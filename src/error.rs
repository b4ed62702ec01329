//! Error types for engine construction and configuration

use thiserror::Error;

/// Errors raised while building or reconfiguring an [`Engine`](crate::automaton::Engine).
///
/// All of these are detected eagerly; a tick never fails once construction succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid grid dimensions {width}x{height}: width and height must not be negative")]
    InvalidDimension { width: i64, height: i64 },

    #[error("invalid tick interval {0}ms: must be at least 1ms")]
    InvalidInterval(i64),

    #[error("rule set index {index} out of range for catalog of {len} entries")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("cell ({x}, {y}) out of bounds for {width}x{height} grid")]
    OutOfBounds { x: usize, y: usize, width: usize, height: usize },

    #[error("row {row} has {len} cells, expected {expected}")]
    RaggedRows { row: usize, len: usize, expected: usize },

    #[error("catalog must contain at least one rule set")]
    EmptyCatalog,

    #[error("invalid lifetime {0}: must be between 2 and 255")]
    InvalidLifetime(u32),

    #[error("invalid seeding probability {0}%: must be at most 100")]
    InvalidProbability(u8),

    #[error("seeding block size must be at least 1")]
    InvalidBlockSize,

    #[error("invalid rule notation '{0}'")]
    InvalidNotation(String),
}
