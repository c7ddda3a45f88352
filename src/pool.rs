//! Spawning and joining the column workers.

use std::io::Write;
use std::thread;
use std::time::Instant;

use tracing::{debug, info};

use crate::engine::{self, WorkItem};
use crate::error::{Error, Result};
use crate::matrix::Matrix;
use crate::output::OutputLock;
use crate::partition::Plan;

/// Multiplies `a` by `b` with one thread per range of `plan`.
///
/// Returns only after every worker has been joined; the product does not
/// exist before that. If any worker fails to spawn, panics or cannot write
/// its progress, the whole run fails and no partial product is returned.
pub fn run<W>(plan: &Plan, a: &Matrix, b: &Matrix, output: &OutputLock<W>) -> Result<Matrix>
where
    W: Write + Send,
{
    let size = plan.dimension();
    if a.size() != size || b.size() != size {
        return Err(Error::DimensionMismatch {
            expected: size,
            a: a.size(),
            b: b.size(),
        });
    }

    let started = Instant::now();
    let mut tdata = vec![0i32; size * size];
    let chunks = tdata.chunks_mut(plan.width() * size);

    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(plan.workers());
        let mut spawn_error = None;
        for (range, columns) in plan.ranges().iter().zip(chunks) {
            let item = WorkItem {
                range: *range,
                size,
                a,
                b,
                output,
                columns,
            };
            let spawned = thread::Builder::new()
                .name(format!("worker-{}", range.worker))
                .spawn_scoped(scope, move || engine::work(item));
            match spawned {
                Ok(handle) => {
                    debug!(worker = range.worker, "spawned");
                    handles.push((range.worker, handle));
                }
                Err(source) => {
                    spawn_error = Some(Error::WorkerSpawn {
                        worker: range.worker,
                        source,
                    });
                    break;
                }
            }
        }

        // Join everything before reporting the first failure.
        let results: Vec<Result<()>> = handles
            .into_iter()
            .map(|(worker, handle)| {
                handle
                    .join()
                    .unwrap_or_else(|_| Err(Error::WorkerPanicked { worker }))
            })
            .collect();
        match spawn_error {
            Some(err) => Err(err),
            None => results.into_iter().collect::<Result<()>>(),
        }
    })?;

    info!(
        size,
        workers = plan.workers(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "multiplication complete"
    );
    Ok(Matrix::from_columns(size, tdata))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Limits;

    fn plan(n: i64, m: i64) -> Plan {
        Plan::new(n, m, &Limits::default()).unwrap()
    }

    fn run_captured(plan: &Plan, a: &Matrix, b: &Matrix) -> (Matrix, String) {
        let output = OutputLock::new(Vec::new());
        let c = run(plan, a, b, &output).unwrap();
        (c, String::from_utf8(output.into_inner()).unwrap())
    }

    #[test]
    fn test_two_by_two() {
        let a = Matrix::from_rows(vec![vec![1, 1], vec![1, 1]]).unwrap();
        let b = Matrix::from_rows(vec![vec![1, 2], vec![1, 2]]).unwrap();
        let (c, _) = run_captured(&plan(2, 2), &a, &b);
        assert_eq!(c.to_rows(), vec![vec![2, 4], vec![2, 4]]);
    }

    #[test]
    fn test_sample_three() {
        let (a, b) = Matrix::sample_pair(3);
        for m in [1, 3] {
            let (c, _) = run_captured(&plan(3, m), &a, &b);
            for r in 0..3 {
                for col in 0..3 {
                    assert_eq!(c.get(r, col), 3 * (col as i32 + 1));
                }
            }
        }
    }

    #[test]
    fn test_end_to_end_four() {
        let (a, b) = Matrix::sample_pair(4);
        for m in [2, 4] {
            let (c, text) = run_captured(&plan(4, m), &a, &b);
            for r in 0..4 {
                for col in 0..4 {
                    assert_eq!(c.get(r, col), 4 * (col as i32 + 1));
                }
            }

            let starts = text.lines().filter(|l| l.contains(": Computing columns")).count();
            let completions = text.lines().filter(|l| l.contains(": Completed columns")).count();
            let cells = text.lines().filter(|l| l.contains(" updates MC(")).count();
            assert_eq!(starts, m as usize);
            assert_eq!(completions, m as usize);
            assert_eq!(cells, 16);
        }
    }

    #[test]
    fn test_same_product_for_every_worker_count() {
        let a = Matrix::rand_matrix(12);
        let b = Matrix::rand_matrix(12);
        let expected = Matrix::naive_mul(&a, &b);
        for m in [1, 2, 3, 4, 6, 12] {
            let output = OutputLock::quiet(std::io::sink());
            let c = run(&plan(12, m), &a, &b, &output).unwrap();
            assert_eq!(c, expected, "m = {}", m);
        }
    }

    #[test]
    fn test_records_are_whole_lines() {
        let (a, b) = Matrix::sample_pair(8);
        let (_, text) = run_captured(&plan(8, 8), &a, &b);
        assert_eq!(text.lines().count(), 8 + 64 + 8);
        assert!(text.lines().all(|line| line.starts_with("Thread ")));
    }

    #[test]
    fn test_cells_name_their_worker_thread() {
        let (a, b) = Matrix::sample_pair(4);
        let (_, text) = run_captured(&plan(4, 2), &a, &b);
        let worker_1_cols: Vec<&str> = text
            .lines()
            .filter(|l| l.starts_with("Thread worker-1 updates"))
            .collect();
        assert_eq!(worker_1_cols.len(), 8);
        assert!(worker_1_cols
            .iter()
            .all(|l| l.contains(",2)") || l.contains(",3)")));
    }

    #[test]
    fn test_wrapping_overflow() {
        let a = Matrix::from_fn(2, |_, _| i32::MAX);
        let b = Matrix::from_fn(2, |_, _| 2);
        let (c, _) = run_captured(&plan(2, 1), &a, &b);
        assert_eq!(c, Matrix::naive_mul(&a, &b));
    }

    #[test]
    fn test_dimension_mismatch() {
        let (a, b) = Matrix::sample_pair(3);
        let output = OutputLock::new(Vec::new());
        let err = run(&plan(4, 2), &a, &b, &output).unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch {
                expected: 4,
                a: 3,
                b: 3
            }
        ));
        assert!(output.into_inner().is_empty());
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_output_failure_fails_the_run() {
        let (a, b) = Matrix::sample_pair(4);
        let output = OutputLock::new(FailingWriter);
        let err = run(&plan(4, 2), &a, &b, &output).unwrap_err();
        assert!(matches!(err, Error::Output(_)));
    }

    struct PanicWriter;

    impl Write for PanicWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            panic!("console went away");
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_panicking_worker_fails_the_run() {
        let (a, b) = Matrix::sample_pair(4);
        let output = OutputLock::new(PanicWriter);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            run(&plan(4, 2), &a, &b, &output)
        }));
        let err = result.expect("worker panic escaped run").unwrap_err();
        assert!(matches!(err, Error::WorkerPanicked { .. }));
    }
}
