//! Build execution: pull the image, run the containerized build, validate
//! the artifact.

mod paths;

pub use paths::{ARTIFACT_KIND, BUNDLE_KIND, ProjectLayout};

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crate::artifact::BuildArtifact;
use crate::config::ProjectConfig;
use crate::container::ContainerRunner;
use crate::error::{PipelineError, Result};
use crate::process::ProcessRunner;
use crate::runtime::SelectedRuntime;

/// One build invocation. Immutable once created.
#[derive(Debug, Clone)]
pub struct BuildRequest {
    /// Project root mounted into the container
    pub source_root: PathBuf,
    /// Build image reference
    pub image: String,
    /// Conventional artifact output path
    pub output_path: PathBuf,
    /// Containerized build timeout
    pub build_timeout: Duration,
    /// Image pull timeout
    pub pull_timeout: Duration,
}

impl BuildRequest {
    /// Builds the request for a configured project layout.
    pub fn new(layout: &ProjectLayout, config: &ProjectConfig) -> Self {
        Self {
            source_root: layout.root().to_path_buf(),
            image: config.image().to_string(),
            output_path: layout.artifact_path(),
            build_timeout: config.build_timeout(),
            pull_timeout: config.pull_timeout(),
        }
    }
}

/// Runs the containerized build for a selected runtime.
///
/// Each step is a hard gate with no retries: pull, ensure the output
/// directory, run the build, check the artifact. The build tool's exit code
/// is not fully trusted; only the artifact's presence proves success.
pub struct BuildExecutor<'r, R> {
    runner: ContainerRunner<'r, R>,
}

impl<'r, R: ProcessRunner> BuildExecutor<'r, R> {
    /// Creates an executor bound to the selected engine.
    pub fn new(runtime: SelectedRuntime, runner: &'r R) -> Self {
        Self {
            runner: ContainerRunner::new(runtime, runner),
        }
    }

    /// Access to the underlying engine commands, for setup and clean.
    pub fn container(&self) -> &ContainerRunner<'r, R> {
        &self.runner
    }

    /// Executes the build pipeline through the artifact presence gate.
    pub async fn build(&self, request: &BuildRequest) -> Result<BuildArtifact> {
        self.runner
            .pull_image(&request.image, request.pull_timeout)
            .await?;
        log::info!("stage: {}", crate::pipeline::Stage::ImagePulled);

        if let Some(dir) = request.output_path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }

        let output = match self
            .runner
            .run_build(&request.source_root, &request.image, request.build_timeout)
            .await
        {
            Ok(output) => output,
            // A hung build that the timeout killed is a build failure, not an
            // ambient IO error
            Err(PipelineError::Io(e)) if e.kind() == io::ErrorKind::TimedOut => {
                return Err(PipelineError::BuildCommandFailed {
                    exit_code: -1,
                    detail: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        };

        if !output.success() {
            return Err(PipelineError::BuildCommandFailed {
                exit_code: output.exit_code,
                detail: output.diagnostic_tail(20),
            });
        }
        log::info!("stage: {}", crate::pipeline::Stage::Built);

        if !request.output_path.exists() {
            return Err(PipelineError::ArtifactNotProduced {
                expected: request.output_path.clone(),
            });
        }

        BuildArtifact::from_path(&request.output_path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{ProcessOutput, ProcessSpec};
    use crate::runtime::ENGINES;
    use std::path::Path;

    /// Scripted engine: pull can fail, `run` can optionally drop an artifact.
    struct FakeEngine {
        pull_exit: i32,
        run_exit: i32,
        artifact_to_write: Option<PathBuf>,
    }

    impl ProcessRunner for FakeEngine {
        async fn run(&self, spec: ProcessSpec) -> io::Result<ProcessOutput> {
            let exit_code = match spec.args.first().map(String::as_str) {
                Some("pull") => self.pull_exit,
                Some("run") => {
                    if let Some(path) = &self.artifact_to_write {
                        std::fs::write(path, b"artifact-bytes")?;
                    }
                    self.run_exit
                }
                _ => 0,
            };
            Ok(ProcessOutput {
                exit_code,
                stdout: String::new(),
                stderr: if exit_code == 0 {
                    String::new()
                } else {
                    "tool diagnostics".into()
                },
            })
        }
    }

    fn request(dir: &Path) -> BuildRequest {
        BuildRequest {
            source_root: dir.to_path_buf(),
            image: "apkforge/android-builder:latest".into(),
            output_path: dir.join("build/release/apk/app-release.apk"),
            build_timeout: Duration::from_secs(5),
            pull_timeout: Duration::from_secs(5),
        }
    }

    fn runtime() -> SelectedRuntime {
        SelectedRuntime {
            engine: &ENGINES[1],
        }
    }

    #[tokio::test]
    async fn pull_failure_aborts_before_the_build() {
        let dir = tempfile::tempdir().expect("tempdir");
        let engine = FakeEngine {
            pull_exit: 1,
            run_exit: 0,
            artifact_to_write: None,
        };
        let executor = BuildExecutor::new(runtime(), &engine);

        let err = executor
            .build(&request(dir.path()))
            .await
            .expect_err("pull must fail");
        assert!(matches!(err, PipelineError::ImagePullFailed { .. }));
    }

    #[tokio::test]
    async fn build_failure_carries_the_exit_code() {
        let dir = tempfile::tempdir().expect("tempdir");
        let engine = FakeEngine {
            pull_exit: 0,
            run_exit: 42,
            artifact_to_write: None,
        };
        let executor = BuildExecutor::new(runtime(), &engine);

        let err = executor
            .build(&request(dir.path()))
            .await
            .expect_err("build must fail");
        match err {
            PipelineError::BuildCommandFailed { exit_code, detail } => {
                assert_eq!(exit_code, 42);
                assert!(detail.contains("tool diagnostics"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn clean_exit_without_artifact_is_not_success() {
        let dir = tempfile::tempdir().expect("tempdir");
        let engine = FakeEngine {
            pull_exit: 0,
            run_exit: 0,
            artifact_to_write: None,
        };
        let executor = BuildExecutor::new(runtime(), &engine);

        let err = executor
            .build(&request(dir.path()))
            .await
            .expect_err("missing artifact must fail");
        assert!(matches!(err, PipelineError::ArtifactNotProduced { .. }));
    }

    #[tokio::test]
    async fn produced_artifact_is_reported_with_size_and_checksum() {
        let dir = tempfile::tempdir().expect("tempdir");
        let request = request(dir.path());
        std::fs::create_dir_all(request.output_path.parent().expect("parent"))
            .expect("mkdir");

        let engine = FakeEngine {
            pull_exit: 0,
            run_exit: 0,
            artifact_to_write: Some(request.output_path.clone()),
        };
        let executor = BuildExecutor::new(runtime(), &engine);

        let artifact = executor.build(&request).await.expect("build succeeds");
        assert_eq!(artifact.path, request.output_path);
        assert_eq!(artifact.size, "artifact-bytes".len() as u64);
        assert_eq!(artifact.sha256.len(), 64);
    }
}
