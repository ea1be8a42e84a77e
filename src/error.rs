//! Error types for tile generation
//!
//! `GeometryError` is the retryable kind: the orchestrator throws away the
//! attempt and draws again. Everything else surfaces to the caller.

use thiserror::Error;

use crate::geometry::{Direction, Point};

/// An attempt produced invalid topology and must be regenerated
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("filled cells form a 2x2 square with lower-left corner at {at}")]
    SquareInPath { at: Point },
    #[error("segment {from} -> {to} shares neither axis")]
    MisalignedSegment { from: Point, to: Point },
    #[error("no corridor through filled cells from {from} exit to {to} exit")]
    NoCorridor { from: Direction, to: Direction },
    #[error("no open exit to connect to from {from}")]
    NoOpenExit { from: Direction },
}

/// Malformed exit configuration supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("expected 4 or 6 exit configs, got {count}")]
    WrongCardinality { count: usize },
    #[error("exit direction {0} configured more than once")]
    DuplicateDirection(Direction),
    #[error("no exit configured for {0}")]
    MissingDirection(Direction),
    #[error("edge position {edge_position} for {direction} is outside 1..={max}")]
    EdgeOutOfRange { direction: Direction, edge_position: u32, max: u32 },
    #[error("{blocked} sides are blocked; at least two must stay open")]
    TooManyBlocked { blocked: usize },
}

#[derive(Debug, Error)]
pub enum TileError {
    #[error("invalid exit configuration: {0}")]
    InvalidInput(#[from] InputError),
    #[error("gave up after {attempts} attempts: {last}")]
    ExhaustedRetries {
        attempts: usize,
        #[source]
        last: GeometryError,
    },
    #[error("could not draw a side configuration in {attempts} attempts")]
    ExhaustedSideDraws { attempts: usize },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, TileError>;
