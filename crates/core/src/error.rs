//! Error types for fallible construction and state mutation.
//!
//! Search and AI queries never fail: an unreachable target is an empty result.
//! Errors exist only where callers hand the engine malformed input (a ragged
//! board, an illegal move commit, a broken scenario file).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::{Cell, UnitId};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("board matrix has no rows")]
    Empty,
    #[error("board matrix is not square: row {row} has {found} cells, expected {expected}")]
    NotSquare { row: usize, expected: usize, found: usize },
    #[error("board is {board} cells wide but the grid is configured for {grid}")]
    SizeMismatch { board: usize, grid: i32 },
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("unit {0:?} is not on the battlefield")]
    UnknownUnit(UnitId),
    #[error("cell {0} is not a known destination for this move")]
    UnknownDestination(Cell),
    #[error("footprint anchored at {0} leaves the board")]
    OffBoard(Cell),
    #[error("cell {0} is already occupied")]
    Occupied(Cell),
}

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unsupported scenario format {0:?}, expected .json or .toml")]
    UnsupportedFormat(String),
    #[error("invalid scenario JSON")]
    Json(#[from] serde_json::Error),
    #[error("invalid scenario TOML")]
    Toml(#[from] toml::de::Error),
    #[error("invalid scenario board")]
    Board(#[from] BoardError),
    #[error("cannot place unit {name:?}")]
    Placement {
        name: String,
        #[source]
        source: MoveError,
    },
}
