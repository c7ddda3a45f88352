//! Error types for the multiplication pipeline.

use std::fmt;
use std::io;

use thiserror::Error;

/// Which validation rule a `(N, M)` pair broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigReason {
    NonPositiveDimension,
    NonPositiveWorkers,
    DimensionTooLarge { max: usize },
    TooLargeToAllocate,
    TooManyWorkers,
    NotDivisible,
}

impl fmt::Display for ConfigReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigReason::NonPositiveDimension => write!(f, "N must be at least 1"),
            ConfigReason::NonPositiveWorkers => write!(f, "M must be at least 1"),
            ConfigReason::DimensionTooLarge { max } => write!(f, "N must not exceed {}", max),
            ConfigReason::TooLargeToAllocate => {
                write!(f, "N is too large to allocate three N x N matrices")
            }
            ConfigReason::TooManyWorkers => write!(f, "M must not exceed N"),
            ConfigReason::NotDivisible => write!(f, "N must be a multiple of M"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Usage(String),

    #[error("invalid input N={dimension}, M={workers}: {reason}")]
    InvalidConfiguration {
        dimension: i64,
        workers: i64,
        reason: ConfigReason,
    },

    #[error("matrix dimension mismatch: plan is {expected}x{expected}, A is {a}x{a}, B is {b}x{b}")]
    DimensionMismatch { expected: usize, a: usize, b: usize },

    #[error("matrix is not square: {rows} rows, row of length {cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("failed to spawn worker {worker}: {source}")]
    WorkerSpawn {
        worker: usize,
        #[source]
        source: io::Error,
    },

    #[error("worker {worker} panicked")]
    WorkerPanicked { worker: usize },

    #[error("output error: {0}")]
    Output(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
