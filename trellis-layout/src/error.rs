//! Error types for the layout core.

use thiserror::Error;

/// Errors raised by layout operations.
#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    #[error("only managed layouts can need layout: {0}")]
    NotALayout(String),

    #[error("unknown element: {0}")]
    UnknownElement(String),

    #[error("layout is not attached")]
    NotAttached,

    #[error("layout is not a grid")]
    NotAGrid,

    #[error("cell ({column}, {row}) is already occupied")]
    CellOccupied { column: usize, row: usize },

    #[error("index {index} out of range (len {len})")]
    OutOfRange { index: usize, len: usize },

    #[error("invalid count: {0}")]
    InvalidCount(usize),

    #[error("ids must be unique, duplicate id: {0}")]
    DuplicateColumn(String),

    #[error("ids must exist, unknown id: {0}")]
    UnknownColumn(String),

    #[error(transparent)]
    State(#[from] trellis_api::StateError),

    #[error("aborting layout after {passes} passes, layout did not converge")]
    DidNotConverge { passes: usize },
}
