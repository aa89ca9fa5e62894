//! Per-candidate availability probing.

use std::io;

use crate::process::{ProcessRunner, ProcessSpec};

use super::{DAEMON_PROBE_TIMEOUT, Engine, EngineState, EngineStatus};

/// Probes one candidate: binary presence on PATH, then daemon liveness.
///
/// Liveness is a `<engine> info` query with a short timeout; exit 0 means the
/// daemon (or, for rootless engines, the service socket) is answering. The
/// probe never fails: every outcome maps to an [`EngineState`].
pub async fn probe_engine<R: ProcessRunner>(runner: &R, engine: &'static Engine) -> EngineStatus {
    if which::which(engine.binary).is_err() {
        return EngineStatus {
            engine,
            state: EngineState::NotInstalled,
        };
    }

    let spec = ProcessSpec::new(engine.binary, vec!["info".into()])
        .with_timeout(DAEMON_PROBE_TIMEOUT);

    let state = match runner.run(spec).await {
        Ok(output) if output.success() => EngineState::Ready,
        // Binary answered with a non-zero code: installed, daemon unreachable
        Ok(_) => EngineState::DaemonNotRunning,
        // Binary vanished between the PATH check and the spawn
        Err(e) if e.kind() == io::ErrorKind::NotFound => EngineState::NotInstalled,
        // Spawn failure or probe timeout both read as an unresponsive daemon
        Err(_) => EngineState::DaemonNotRunning,
    };

    EngineStatus { engine, state }
}
