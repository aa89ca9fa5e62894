//! Error types for the build pipeline.
//!
//! Every stage failure maps to one variant of [`PipelineError`], carrying the
//! underlying tool's diagnostic output. Failures are terminal for the current
//! invocation; there is no retry path, so each variant also exposes a
//! remediation hint the CLI prints alongside the error.

use std::path::PathBuf;
use thiserror::Error;

use crate::runtime::{EngineStatus, render_attempts};

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Main error type for all pipeline stages
#[derive(Error, Debug)]
pub enum PipelineError {
    /// No container engine passed both the install and daemon probes
    #[error("no container runtime available\n{}", render_attempts(.attempts))]
    NoRuntimeAvailable {
        /// Probe outcome for every candidate, in priority order
        attempts: Vec<EngineStatus>,
    },

    /// Image pull returned a non-zero exit code
    #[error("failed to pull image '{image}' with {engine}: {detail}")]
    ImagePullFailed {
        /// Engine that ran the pull
        engine: &'static str,
        /// Image reference that failed to pull
        image: String,
        /// Trailing diagnostic output from the pull command
        detail: String,
    },

    /// The containerized build command returned a non-zero exit code
    #[error("containerized build failed (exit code {exit_code})\n{detail}")]
    BuildCommandFailed {
        /// Exit code reported by the container
        exit_code: i32,
        /// Trailing diagnostic output from the build
        detail: String,
    },

    /// The build exited zero but nothing appeared at the output path
    #[error("build reported success but no artifact was produced at {}", .expected.display())]
    ArtifactNotProduced {
        /// Conventional output path that was checked
        expected: PathBuf,
    },

    /// An artifact was required but is not on disk
    #[error("artifact not found at {}", .path.display())]
    ArtifactMissing {
        /// Path that was checked
        path: PathBuf,
    },

    /// The artifact exists but cannot be opened as an archive
    #[error("artifact at {} is not a valid archive: {detail}", .path.display())]
    ArtifactCorrupt {
        /// Path of the rejected artifact
        path: PathBuf,
        /// Parser diagnostic
        detail: String,
    },

    /// Extracting archive entries into the scratch directory failed
    #[error("failed to extract archive contents: {detail}")]
    ExtractionFailed {
        /// Underlying extraction diagnostic
        detail: String,
    },

    /// Re-archiving the scratch tree failed
    #[error("failed to repack archive: {detail}")]
    RepackFailed {
        /// Underlying archiving diagnostic
        detail: String,
    },

    /// apkforge.toml exists but could not be parsed
    #[error("invalid project configuration: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Actionable remediation hint for this failure kind.
    ///
    /// Returns `None` for ambient errors that carry their own context.
    pub fn remediation(&self) -> Option<&'static str> {
        match self {
            Self::NoRuntimeAvailable { .. } => {
                Some("install podman or docker, or start the engine's daemon, then re-run")
            }
            Self::ImagePullFailed { .. } => {
                Some("check network connectivity and that the image reference is reachable from this host")
            }
            Self::BuildCommandFailed { .. } => {
                Some("inspect the build output above; the toolchain inside the container failed")
            }
            Self::ArtifactNotProduced { .. } => {
                Some("the build toolchain exited cleanly without writing its output; check the project's build configuration")
            }
            Self::ArtifactMissing { .. } => Some("run 'apkforge build-artifact' first"),
            Self::ArtifactCorrupt { .. } => {
                Some("rebuild the artifact; the file at the output path is not a ZIP archive")
            }
            Self::ExtractionFailed { .. } | Self::RepackFailed { .. } => {
                Some("check free disk space and permissions on the output directory, then rebuild the artifact")
            }
            Self::Config(_) => Some("fix the syntax errors in apkforge.toml"),
            Self::Io(_) => None,
        }
    }
}
