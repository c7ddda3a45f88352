//! Square integer matrix multiplication with statically partitioned worker
//! threads.
//!
//! The columns of the product are split into equal contiguous ranges, one per
//! worker. Each worker computes every cell of its columns and reports each
//! cell through a shared [`OutputLock`]; the lock guards only the console
//! writer, never the matrices, since no two workers share a column.
//!
//! ```
//! use tmm::{pool, Limits, Matrix, OutputLock, Plan};
//!
//! let plan = Plan::new(4, 2, &Limits::default()).unwrap();
//! let (a, b) = Matrix::sample_pair(4);
//! let output = OutputLock::quiet(std::io::sink());
//! let c = pool::run(&plan, &a, &b, &output).unwrap();
//! assert_eq!(c.row(0), &[4, 8, 12, 16]);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod host;
pub mod matrix;
pub mod output;
pub mod partition;
pub mod pool;
pub mod report;

pub use config::Limits;
pub use error::{ConfigReason, Error, Result};
pub use matrix::Matrix;
pub use output::{OutputLock, Progress};
pub use partition::{partition, ColumnRange, Plan};
