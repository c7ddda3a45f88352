use std::io::{self, IsTerminal, Write};
use std::num::IntErrorKind;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tmm::config::{DEFAULT_MAX_DIMENSION, LARGE_ALLOCATION_BYTES};
use tmm::host::HostReport;
use tmm::{pool, report, Error, Limits, Matrix, OutputLock, Plan};

#[derive(Parser)]
#[command(
    name = "tmm",
    about = "Multiply two N x N matrices with M threads, each owning N/M columns",
    version
)]
struct Cli {
    /// Matrix dimension
    #[arg(allow_negative_numbers = true, value_parser = parse_count)]
    n: i64,
    /// Number of worker threads; must divide N
    #[arg(allow_negative_numbers = true, value_parser = parse_count)]
    m: i64,
    /// Largest accepted N
    #[arg(long, env = "TMM_MAX_DIMENSION", default_value_t = DEFAULT_MAX_DIMENSION)]
    max_dimension: usize,
    /// Suppress per-worker progress lines
    #[arg(long)]
    quiet: bool,
    /// Do not print the result matrix
    #[arg(long)]
    no_matrix: bool,
    /// Print date, hostname, users, processes and directory listing afterwards
    #[arg(long)]
    host_report: bool,
    /// Only show `who` lines for this user in the host report
    #[arg(long)]
    who_user: Option<String>,
    /// Write the `who` listing to this file afterwards
    #[arg(long)]
    who_snapshot: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprint!("{}", Error::Usage(e.render().to_string()));
            return ExitCode::from(1);
        }
    };

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::from(1)
        }
    }
}

/// Parses an integer, saturating values outside `i64` so they fail the
/// dimension checks instead of the parser.
fn parse_count(s: &str) -> Result<i64, String> {
    match s.parse::<i64>() {
        Ok(v) => Ok(v),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Ok(i64::MAX),
            IntErrorKind::NegOverflow => Ok(i64::MIN),
            _ => Err(e.to_string()),
        },
    }
}

fn run(cli: &Cli) -> Result<(), Error> {
    let plan = Plan::new(cli.n, cli.m, &Limits::new(cli.max_dimension))?;

    let bytes = Limits::estimated_bytes(plan.dimension());
    if bytes > LARGE_ALLOCATION_BYTES {
        warn!(n = plan.dimension(), bytes, "large allocation");
    }
    info!(n = plan.dimension(), m = plan.workers(), bytes, "starting");

    let (a, b) = Matrix::sample_pair(plan.dimension());
    let output = if cli.quiet {
        OutputLock::quiet(io::stdout())
    } else {
        OutputLock::new(io::stdout())
    };
    let c = pool::run(&plan, &a, &b, &output)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if !cli.no_matrix {
        report::write_matrix(&mut out, &c)?;
    }
    out.flush()?;

    let host = HostReport {
        who_user: cli.who_user.clone(),
        who_snapshot: cli.who_snapshot.clone(),
        print: cli.host_report,
    };
    if !host.is_empty() {
        host.run(&mut out);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("12"), Ok(12));
        assert_eq!(parse_count("-3"), Ok(-3));
        assert_eq!(parse_count("99999999999999999999"), Ok(i64::MAX));
        assert_eq!(parse_count("-99999999999999999999"), Ok(i64::MIN));
        assert!(parse_count("four").is_err());
        assert!(parse_count("").is_err());
    }
}
