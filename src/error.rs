//! Error types for the bound-mass library.

use thiserror::Error;

use crate::analysis::params::Method;

/// Result alias used throughout the analysis code
pub type Result<T> = std::result::Result<T, BoundMassError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BoundMassError {
    /// Inputs rejected before any computation
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Two contributing particles sit at the same position
    #[error("particles {i} and {j} coincide; potential is singular")]
    NumericalSingularity { i: usize, j: usize },

    /// Iteration cap reached before a fixed point
    #[error("{method} did not converge within {iterations} iterations")]
    NonConvergence { method: Method, iterations: usize },
}

impl BoundMassError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

/// Failures at the snapshot loader boundary
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("could not read snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}, column {column}: cannot parse {token:?} as a number")]
    Parse { line: usize, column: usize, token: String },

    #[error("line {line}: found {found} columns, expected {expected}")]
    ColumnCount { line: usize, found: usize, expected: usize },

    #[error("line {line}: node list id {value} is not a non-negative integer")]
    BadListId { line: usize, value: f64 },

    #[error("snapshot contains no particles")]
    Empty,
}
