//! Error types for the puzzle engine and its file adapters.
//!
//! Parsing and solving fail for different reasons and are kept as separate
//! enums so callers can match on the exact condition. An exhausted search is
//! not an error; the solver reports it as `Ok(None)`.

use thiserror::Error;

use crate::board::BlockKind;

/// Errors raised while reading a `.bff` puzzle file.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read puzzle file: {0}")]
    Io(#[from] std::io::Error),

    #[error("no grid section found between GRID START and GRID STOP")]
    MissingGrid,

    #[error("grid row {row} has {found} cells, expected {expected}")]
    NonRectangular {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("invalid grid symbol '{symbol}' at row {row}, column {col}")]
    InvalidSymbol {
        symbol: String,
        row: usize,
        col: usize,
    },

    #[error("invalid block count line: '{line}'")]
    InvalidCount { line: String },

    #[error("malformed laser line: '{line}' (expected L x y vx vy)")]
    MalformedLaser { line: String },

    #[error("malformed target line: '{line}' (expected P x y)")]
    MalformedTarget { line: String },

    #[error("no block counts found")]
    MissingBlocks,

    #[error("no target points found")]
    MissingTargets,

    #[error("no lasers found")]
    MissingLasers,
}

/// Errors raised by the search engine before any simulation runs.
#[derive(Debug, Error)]
pub enum SolveError {
    #[error(
        "inventory requests {requested} {kind} blocks but only {available} open cells remain"
    )]
    InventoryExceedsCapacity {
        kind: BlockKind,
        requested: usize,
        available: usize,
    },

    #[error("{what} coordinate ({x}, {y}) is outside the {cols}x{rows} simulation grid")]
    InvalidCoordinate {
        what: &'static str,
        x: i32,
        y: i32,
        rows: usize,
        cols: usize,
    },
}
