//! Opaque external process execution.
//!
//! The pipeline never parses tool-specific output: every external command
//! (engine probes, image pulls, containerized builds) goes through
//! [`ProcessRunner`] and only the exit code and captured streams come back.
//! Stages inject fake runners in tests.

use std::io;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;

/// A single external command invocation.
#[derive(Debug, Clone)]
pub struct ProcessSpec {
    /// Program to execute (resolved via PATH)
    pub program: String,
    /// Arguments, in order
    pub args: Vec<String>,
    /// Working directory; inherited when `None`
    pub cwd: Option<PathBuf>,
    /// Kill the process and fail with `TimedOut` after this long
    pub timeout: Option<Duration>,
}

impl ProcessSpec {
    /// Builds a spec for `program` with the given arguments.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            cwd: None,
            timeout: None,
        }
    }

    /// Sets the timeout for this invocation.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Human-readable command line for diagnostics.
    pub fn display(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Captured result of a finished process.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Exit code; -1 when the process was terminated by a signal
    pub exit_code: i32,
    /// Captured stdout, lossily decoded
    pub stdout: String,
    /// Captured stderr, lossily decoded
    pub stderr: String,
}

impl ProcessOutput {
    /// Whether the process exited zero.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Last `max_lines` lines of stderr, for failure diagnostics.
    ///
    /// Falls back to stdout when stderr is empty: some engines report pull
    /// and run failures on stdout.
    pub fn diagnostic_tail(&self, max_lines: usize) -> String {
        let source = if self.stderr.trim().is_empty() {
            &self.stdout
        } else {
            &self.stderr
        };
        let lines: Vec<&str> = source.lines().collect();
        let start = lines.len().saturating_sub(max_lines);
        lines[start..].join("\n")
    }
}

/// Capability to run external processes.
pub trait ProcessRunner {
    /// Runs the command to completion and captures its output.
    fn run(&self, spec: ProcessSpec) -> impl Future<Output = io::Result<ProcessOutput>> + Send;
}

/// Runs processes on the host via tokio.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostRunner;

impl ProcessRunner for HostRunner {
    async fn run(&self, spec: ProcessSpec) -> io::Result<ProcessOutput> {
        log::debug!("exec: {}", spec.display());

        let mut command = Command::new(&spec.program);
        command
            .args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Dropping the wait future on timeout must not leave the child running
            .kill_on_drop(true);

        if let Some(dir) = &spec.cwd {
            command.current_dir(dir);
        }

        let child = command.spawn()?;
        let wait = child.wait_with_output();

        let output = match spec.timeout {
            Some(limit) => timeout(limit, wait).await.map_err(|_| {
                io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!(
                        "'{}' timed out after {} seconds",
                        spec.display(),
                        limit.as_secs()
                    ),
                )
            })??,
            None => wait.await?,
        };

        Ok(ProcessOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_exit_code_and_stdout() {
        let output = HostRunner
            .run(ProcessSpec::new(
                "sh",
                vec!["-c".into(), "echo out; echo err >&2".into()],
            ))
            .await
            .expect("sh should run");

        assert!(output.success());
        assert_eq!(output.stdout.trim(), "out");
        assert_eq!(output.stderr.trim(), "err");
    }

    #[tokio::test]
    async fn missing_binary_is_not_found() {
        let err = HostRunner
            .run(ProcessSpec::new("apkforge-no-such-binary-x", vec![]))
            .await
            .expect_err("spawn must fail");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn timeout_kills_the_child() {
        let err = HostRunner
            .run(
                ProcessSpec::new("sleep", vec!["5".into()])
                    .with_timeout(Duration::from_millis(50)),
            )
            .await
            .expect_err("must time out");
        assert_eq!(err.kind(), io::ErrorKind::TimedOut);
    }

    #[test]
    fn diagnostic_tail_prefers_stderr() {
        let output = ProcessOutput {
            exit_code: 1,
            stdout: "a\nb".into(),
            stderr: "x\ny\nz".into(),
        };
        assert_eq!(output.diagnostic_tail(2), "y\nz");

        let quiet = ProcessOutput {
            exit_code: 1,
            stdout: "only stdout".into(),
            stderr: "  \n".into(),
        };
        assert_eq!(quiet.diagnostic_tail(5), "only stdout");
    }
}
