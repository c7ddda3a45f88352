//! Per-worker compute kernel.

use std::io::Write;
use std::thread;

use tracing::{debug, info_span};

use crate::error::Result;
use crate::matrix::{dot, Matrix};
use crate::output::{OutputLock, Progress};
use crate::partition::ColumnRange;

/// Everything one worker needs, handed over once and consumed by [`work`].
///
/// `columns` is this worker's slice of the result in column-major order:
/// `range.width()` columns of `size` cells each.
pub struct WorkItem<'a, W> {
    pub range: ColumnRange,
    pub size: usize,
    pub a: &'a Matrix,
    pub b: &'a Matrix,
    pub output: &'a OutputLock<W>,
    pub columns: &'a mut [i32],
}

/// Computes every cell of the item's column range.
///
/// Columns are visited in ascending order and rows ascending within each
/// column. One `Progress::Cell` record is emitted after each cell is stored.
pub fn compute_columns<W: Write>(item: WorkItem<'_, W>) -> Result<()> {
    let WorkItem {
        range,
        size,
        a,
        b,
        output,
        columns,
    } = item;
    debug_assert_eq!(columns.len(), range.width() * size);

    let thread = thread::current()
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("{:?}", thread::current().id()));

    for (col, dst) in range.columns().zip(columns.chunks_exact_mut(size)) {
        let b_col = b.col(col);
        for (row, cell) in dst.iter_mut().enumerate() {
            *cell = dot(a.row(row), b_col);
            output.emit(&Progress::Cell {
                thread: &thread,
                row,
                col,
                value: *cell,
            })?;
        }
    }
    Ok(())
}

/// Runs one worker: start record, kernel, completion record.
pub fn work<W: Write>(item: WorkItem<'_, W>) -> Result<()> {
    let range = item.range;
    let output = item.output;
    let _span = info_span!("worker", id = range.worker).entered();

    output.emit(&Progress::Started(range))?;
    debug!(start = range.start, end = range.end, "computing columns");
    compute_columns(item)?;
    output.emit(&Progress::Completed(range))?;
    debug!("columns complete");
    Ok(())
}
