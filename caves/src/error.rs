use thiserror::Error;

use crate::cave::CavernId;

/// Errors raised while building, parsing or generating a cave
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaveError {
    #[error("a cave needs at least one cavern")]
    EmptyCave,

    #[error("adjacency matrix for {caverns} caverns needs {expected} entries, found {found}")]
    MatrixSize {
        caverns: usize,
        expected: usize,
        found: usize,
    },

    #[error("cavern {0} does not exist")]
    UnknownCavern(CavernId),

    #[error("search endpoint {0} is not part of the map")]
    InvalidEndpoint(String),

    #[error("invalid token {token:?} at position {index}: {reason}")]
    Parse {
        index: usize,
        token: String,
        reason: String,
    },

    #[error("cannot generate cave: {0}")]
    Generate(String),
}

pub type Result<T> = std::result::Result<T, CaveError>;
