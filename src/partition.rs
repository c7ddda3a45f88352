//! Static column partitioning.

use std::ops::RangeInclusive;

use crate::config::Limits;
use crate::error::{ConfigReason, Error, Result};

/// Columns `start..=end` owned by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRange {
    pub worker: usize,
    pub start: usize,
    pub end: usize,
}

impl ColumnRange {
    pub fn width(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn columns(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }

    pub fn contains(&self, col: usize) -> bool {
        self.columns().contains(&col)
    }
}

/// Splits `dimension` columns into `workers` contiguous ranges of equal width.
///
/// Range `i` belongs to worker `i`. Fails when either value is non-positive,
/// when the dimension exceeds `max_dimension` or cannot be allocated, when
/// there are more workers than columns, or when the columns do not divide
/// evenly. Nothing is allocated before every check has passed.
pub fn partition(dimension: i64, workers: i64, max_dimension: usize) -> Result<Vec<ColumnRange>> {
    let reject = |reason| Error::InvalidConfiguration {
        dimension,
        workers,
        reason,
    };

    if dimension < 1 {
        return Err(reject(ConfigReason::NonPositiveDimension));
    }
    if workers < 1 {
        return Err(reject(ConfigReason::NonPositiveWorkers));
    }
    let n = usize::try_from(dimension)
        .ok()
        .filter(|&n| n <= max_dimension)
        .ok_or_else(|| reject(ConfigReason::DimensionTooLarge { max: max_dimension }))?;
    if Limits::allocation_bytes(n).is_none() {
        return Err(reject(ConfigReason::TooLargeToAllocate));
    }
    let m = usize::try_from(workers).unwrap_or(usize::MAX);
    if m > n {
        return Err(reject(ConfigReason::TooManyWorkers));
    }
    if n % m != 0 {
        return Err(reject(ConfigReason::NotDivisible));
    }

    let width = n / m;
    let mut ranges = Vec::new();
    ranges
        .try_reserve_exact(m)
        .map_err(|_| reject(ConfigReason::TooLargeToAllocate))?;
    ranges.extend((0..m).map(|worker| ColumnRange {
        worker,
        start: worker * width,
        end: (worker + 1) * width - 1,
    }));
    Ok(ranges)
}

/// A validated dimension together with its column ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    dimension: usize,
    ranges: Vec<ColumnRange>,
}

impl Plan {
    pub fn new(dimension: i64, workers: i64, limits: &Limits) -> Result<Self> {
        let ranges = partition(dimension, workers, limits.max_dimension)?;
        Ok(Plan {
            dimension: dimension as usize,
            ranges,
        })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn workers(&self) -> usize {
        self.ranges.len()
    }

    /// Columns per worker.
    pub fn width(&self) -> usize {
        self.dimension / self.ranges.len()
    }

    pub fn ranges(&self) -> &[ColumnRange] {
        &self.ranges
    }
}
