//! Run limits.

use std::mem;

/// Largest accepted dimension unless overridden.
pub const DEFAULT_MAX_DIMENSION: usize = 10_000;

/// Above this estimate the CLI warns before allocating.
pub const LARGE_ALLOCATION_BYTES: usize = 1 << 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_dimension: usize,
}

impl Limits {
    pub fn new(max_dimension: usize) -> Self {
        Limits { max_dimension }
    }

    /// Approximate resident bytes for one run of dimension `n`.
    ///
    /// A and B each hold a row-major and a column-major copy. C is computed
    /// into a column-major buffer which becomes the result's column copy, plus
    /// its row-major copy: six `n * n` buffers of `i32` in total.
    pub fn estimated_bytes(n: usize) -> usize {
        Limits::allocation_bytes(n).unwrap_or(usize::MAX)
    }

    /// Exact resident bytes for dimension `n`, or `None` when a single
    /// allocation could not hold them.
    pub fn allocation_bytes(n: usize) -> Option<usize> {
        n.checked_mul(n)?
            .checked_mul(6)?
            .checked_mul(mem::size_of::<i32>())
            .filter(|&bytes| bytes <= isize::MAX as usize)
    }
}

impl Default for Limits {
    fn default() -> Self {
        Limits::new(DEFAULT_MAX_DIMENSION)
    }
}
