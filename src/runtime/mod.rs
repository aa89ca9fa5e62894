//! Container engine detection and selection.
//!
//! Candidates are probed in the fixed priority order of [`ENGINES`]: the
//! lightweight rootless engine first, then the heavier daemon-based one. The
//! first candidate that is both installed and answering its liveness query is
//! selected for the whole invocation; nothing is persisted between runs.

mod probe;

pub use probe::probe_engine;

use std::fmt;
use std::time::Duration;

use crate::error::{PipelineError, Result};
use crate::process::ProcessRunner;

/// Timeout for the daemon liveness query.
/// A responsive engine answers `info` well within this.
pub const DAEMON_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Static descriptor of a container engine candidate.
#[derive(Debug)]
pub struct Engine {
    /// Display name
    pub name: &'static str,
    /// Binary looked up on PATH
    pub binary: &'static str,
    /// How to start the engine's daemon when the binary is present but idle
    pub daemon_hint: &'static str,
}

/// Probe order encodes selection priority. Append new engines here; the
/// selection logic never names individual candidates.
pub const ENGINES: &[Engine] = &[
    Engine {
        name: "podman",
        binary: "podman",
        daemon_hint: "start the podman service: systemctl --user start podman.socket",
    },
    Engine {
        name: "docker",
        binary: "docker",
        daemon_hint: "start the docker daemon: sudo systemctl start docker",
    },
];

/// Outcome of probing one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Binary not found on PATH
    NotInstalled,
    /// Binary present but the liveness query failed or timed out
    DaemonNotRunning,
    /// Installed and answering
    Ready,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotInstalled => "not installed",
            Self::DaemonNotRunning => "installed, daemon not running",
            Self::Ready => "ready",
        };
        f.write_str(label)
    }
}

/// Probe result for one engine candidate.
#[derive(Debug, Clone, Copy)]
pub struct EngineStatus {
    /// The probed candidate
    pub engine: &'static Engine,
    /// What the probe found
    pub state: EngineState,
}

impl fmt::Display for EngineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.engine.name, self.state)?;
        if self.state == EngineState::DaemonNotRunning {
            write!(f, " ({})", self.engine.daemon_hint)?;
        }
        Ok(())
    }
}

/// The engine selected for this pipeline run.
#[derive(Debug, Clone, Copy)]
pub struct SelectedRuntime {
    /// Winning candidate
    pub engine: &'static Engine,
}

/// Renders the per-candidate probe outcomes for diagnostics.
pub fn render_attempts(attempts: &[EngineStatus]) -> String {
    attempts
        .iter()
        .map(|status| format!("  {status}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Picks the first ready candidate from probe results, in order.
///
/// Fails with [`PipelineError::NoRuntimeAvailable`] carrying every attempt so
/// the caller can distinguish "not installed" from "daemon not running" per
/// candidate.
pub fn select_from_statuses(attempts: Vec<EngineStatus>) -> Result<SelectedRuntime> {
    match attempts
        .iter()
        .find(|status| status.state == EngineState::Ready)
    {
        Some(status) => Ok(SelectedRuntime {
            engine: status.engine,
        }),
        None => Err(PipelineError::NoRuntimeAvailable { attempts }),
    }
}

/// Probes all candidates and selects the highest-priority ready one.
pub async fn select_runtime<R: ProcessRunner>(runner: &R) -> Result<SelectedRuntime> {
    let mut attempts = Vec::with_capacity(ENGINES.len());
    for engine in ENGINES {
        let status = probe_engine(runner, engine).await;
        log::debug!("probe {}: {}", engine.name, status.state);
        attempts.push(status);
    }
    select_from_statuses(attempts)
}

/// Probes all candidates without short-circuiting, for `setup` reporting.
pub async fn probe_all<R: ProcessRunner>(runner: &R) -> Vec<EngineStatus> {
    let mut attempts = Vec::with_capacity(ENGINES.len());
    for engine in ENGINES {
        attempts.push(probe_engine(runner, engine).await);
    }
    attempts
}
