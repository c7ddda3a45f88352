//! Optional host inspection run after a multiplication.
//!
//! Nothing here feeds back into the computation: every failure is logged and
//! swallowed by [`HostReport::run`].

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
pub struct HostReport {
    /// Only keep `who` lines mentioning this user.
    pub who_user: Option<String>,
    /// Also write the `who` listing to this file.
    pub who_snapshot: Option<PathBuf>,
    /// Print the date, host, users, processes and working directory.
    pub print: bool,
}

impl HostReport {
    pub fn is_empty(&self) -> bool {
        !self.print && self.who_snapshot.is_none()
    }

    pub fn run<W: Write>(&self, out: &mut W) {
        if self.print {
            self.print_command(out, "date", &[]);
            self.print_command(out, "hostname", &[]);
            match capture("who", &[]) {
                Ok(text) => {
                    let text = filter_user(&text, self.who_user.as_deref());
                    if let Err(e) = out.write_all(text.as_bytes()) {
                        warn!(error = %e, "failed to print who output");
                    }
                }
                Err(e) => warn!(program = "who", error = %e, "host command failed"),
            }
            self.print_command(out, "ps", &["-eaf"]);
            self.print_command(out, "ls", &["-l"]);
        }

        if let Some(path) = &self.who_snapshot {
            if let Err(e) = write_who_snapshot(path) {
                warn!(path = %path.display(), error = %e, "failed to write who snapshot");
            }
        }
    }

    fn print_command<W: Write>(&self, out: &mut W, program: &str, args: &[&str]) {
        let result = capture(program, args).and_then(|text| out.write_all(text.as_bytes()));
        if let Err(e) = result {
            warn!(program, error = %e, "host command failed");
        }
    }
}

fn capture(program: &str, args: &[&str]) -> io::Result<String> {
    debug!(program, ?args, "running host command");
    let output = Command::new(program).args(args).output()?;
    if !output.status.success() {
        return Err(io::Error::new(
            io::ErrorKind::Other,
            format!("{} exited with {}", program, output.status),
        ));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn write_who_snapshot(path: &Path) -> io::Result<()> {
    let text = capture("who", &[])?;
    fs::write(path, text)
}

/// Keeps the lines of a `who` listing that mention `user`.
pub fn filter_user(text: &str, user: Option<&str>) -> String {
    match user {
        Some(user) => text
            .lines()
            .filter(|line| line.contains(user))
            .map(|line| format!("{}\n", line))
            .collect(),
        None => text.to_string(),
    }
}
