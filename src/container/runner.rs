//! Engine invocation: image pull, containerized build run, image removal.

use std::path::Path;
use std::time::Duration;

use uuid::Uuid;

use crate::error::{PipelineError, Result};
use crate::process::{ProcessOutput, ProcessRunner, ProcessSpec};
use crate::runtime::SelectedRuntime;

use super::{BUILD_COMMAND, CONTAINER_WORKDIR};

/// Lines of tool output carried into failure diagnostics.
const DIAGNOSTIC_LINES: usize = 20;

/// Executes engine commands for the selected runtime.
pub struct ContainerRunner<'r, R> {
    runtime: SelectedRuntime,
    runner: &'r R,
}

impl<'r, R: ProcessRunner> ContainerRunner<'r, R> {
    /// Creates a runner bound to the selected engine.
    pub fn new(runtime: SelectedRuntime, runner: &'r R) -> Self {
        Self { runtime, runner }
    }

    /// Pulls the build image. Non-zero exit is a hard gate; there are no
    /// retries.
    pub async fn pull_image(&self, image: &str, timeout: Duration) -> Result<()> {
        let spec = ProcessSpec::new(
            self.runtime.engine.binary,
            vec!["pull".into(), image.into()],
        )
        .with_timeout(timeout);

        let detail = match self.run_spec(spec).await {
            Ok(output) if output.success() => return Ok(()),
            Ok(output) => output.diagnostic_tail(DIAGNOSTIC_LINES),
            // A pull the timeout killed is still a pull failure
            Err(PipelineError::Io(e)) if e.kind() == std::io::ErrorKind::TimedOut => {
                e.to_string()
            }
            Err(e) => return Err(e),
        };

        Err(PipelineError::ImagePullFailed {
            engine: self.runtime.engine.name,
            image: image.to_string(),
            detail,
        })
    }

    /// Runs the fixed build command in a container with the source root
    /// bind-mounted read-write. Blocks until the container exits or the
    /// timeout kills it. Returns the raw output; the caller decides what a
    /// non-zero exit means.
    pub async fn run_build(
        &self,
        source_root: &Path,
        image: &str,
        timeout: Duration,
    ) -> Result<ProcessOutput> {
        let args = build_run_args(source_root, image);
        let spec =
            ProcessSpec::new(self.runtime.engine.binary, args).with_timeout(timeout);
        self.run_spec(spec).await
    }

    /// Removes the build image. Used by `clean --remove-image` only; a
    /// missing image is not an error.
    pub async fn remove_image(&self, image: &str) -> Result<ProcessOutput> {
        let spec = ProcessSpec::new(
            self.runtime.engine.binary,
            vec!["rmi".into(), image.into()],
        );
        self.run_spec(spec).await
    }

    async fn run_spec(&self, spec: ProcessSpec) -> Result<ProcessOutput> {
        let display = spec.display();
        self.runner.run(spec).await.map_err(|e| {
            PipelineError::Io(std::io::Error::new(
                e.kind(),
                format!("'{display}' failed: {e}"),
            ))
        })
    }
}

/// Builds the `run` argument vector: ephemeral container, no privilege
/// escalation, source mounted read-write at the fixed workdir, build outputs
/// owned by the invoking user on Unix.
pub fn build_run_args(source_root: &Path, image: &str) -> Vec<String> {
    let container_name = format!("apkforge-build-{}", Uuid::new_v4());
    let source_mount = format!("{}:{}:rw", source_root.display(), CONTAINER_WORKDIR);

    let mut args = vec![
        "run".to_string(),
        "--rm".to_string(),
        "--name".to_string(),
        container_name,
        "--security-opt".to_string(),
        "no-new-privileges".to_string(),
        "-v".to_string(),
        source_mount,
        "-w".to_string(),
        CONTAINER_WORKDIR.to_string(),
    ];

    #[cfg(unix)]
    {
        let uid = users::get_current_uid();
        let gid = users::get_current_gid();
        args.push("--user".to_string());
        args.push(format!("{uid}:{gid}"));
    }

    args.push(image.to_string());
    args.extend(BUILD_COMMAND.iter().map(|part| part.to_string()));

    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn run_args_mount_source_at_workdir() {
        let source = PathBuf::from("/home/dev/app");
        let args = build_run_args(&source, "apkforge/android-builder:latest");

        let mount_index = args.iter().position(|a| a == "-v").expect("has mount flag");
        assert_eq!(args[mount_index + 1], "/home/dev/app:/project:rw");

        let workdir_index = args.iter().position(|a| a == "-w").expect("has workdir");
        assert_eq!(args[workdir_index + 1], CONTAINER_WORKDIR);
    }

    #[test]
    fn run_args_end_with_image_then_build_command() {
        let args = build_run_args(Path::new("/src"), "img:tag");
        let image_index = args.iter().position(|a| a == "img:tag").expect("has image");
        assert_eq!(&args[image_index + 1..], BUILD_COMMAND);
    }

    #[test]
    fn containers_are_ephemeral_and_uniquely_named() {
        let first = build_run_args(Path::new("/src"), "img");
        let second = build_run_args(Path::new("/src"), "img");
        assert!(first.contains(&"--rm".to_string()));

        let name = |args: &[String]| {
            let i = args.iter().position(|a| a == "--name").expect("named");
            args[i + 1].clone()
        };
        assert_ne!(name(&first), name(&second));
    }
}
