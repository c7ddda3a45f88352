//! Serialized progress output shared by all workers.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use crate::partition::ColumnRange;

/// One line of worker progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress<'a> {
    Started(ColumnRange),
    Cell {
        thread: &'a str,
        row: usize,
        col: usize,
        value: i32,
    },
    Completed(ColumnRange),
}

impl fmt::Display for Progress<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Progress::Started(range) => write!(
                f,
                "Thread {}: Computing columns {} to {}",
                range.worker, range.start, range.end
            ),
            Progress::Cell {
                thread,
                row,
                col,
                value,
            } => write!(
                f,
                "Thread {} updates MC({},{}) set to be {}",
                thread, row, col, value
            ),
            Progress::Completed(range) => write!(
                f,
                "Thread {}: Completed columns {} to {}",
                range.worker, range.start, range.end
            ),
        }
    }
}

/// The only lock in a run. It guards the writer, never the matrices, and is
/// held for exactly one record at a time.
pub struct OutputLock<W> {
    inner: Mutex<W>,
    quiet: bool,
}

impl<W: Write> OutputLock<W> {
    pub fn new(writer: W) -> Self {
        OutputLock {
            inner: Mutex::new(writer),
            quiet: false,
        }
    }

    /// Drops every record instead of writing it.
    pub fn quiet(writer: W) -> Self {
        OutputLock {
            inner: Mutex::new(writer),
            quiet: true,
        }
    }

    pub fn emit(&self, record: &Progress<'_>) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        // A worker that panicked while holding the guard leaves the writer
        // usable; the panic itself is reported by the pool.
        let mut writer = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(writer, "{}", record)
    }

    pub fn into_inner(self) -> W {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}
