use thiserror::Error;

/// The observed grid does not describe a rectangle of cells.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedGridError {
    #[error("grid has no cells")]
    Empty,

    #[error("row {row} has {len} cells, expected {expected}")]
    Ragged {
        row: usize,
        len: usize,
        expected: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("malformed grid: {0}")]
    Malformed(#[from] MalformedGridError),

    /// Boundary ids are `u64`, so a reconstructed row can span at most 63 cells.
    #[error("grid is {len} cells across its narrow side, at most {max} are supported")]
    TooWide { len: usize, max: usize },

    #[error("unexpected {found:?} at line {line}, column {column}")]
    InvalidCell {
        line: usize,
        column: usize,
        found: char,
    },

    #[error("invalid json grid: {0}")]
    Json(String),
}
