//! Container engine command vocabulary.
//!
//! The pipeline drives the selected engine through a small fixed set of
//! commands: `info` (liveness, see [`crate::runtime`]), `pull`, `run` with a
//! bind mount, and `rmi` for cleanup. Argument vectors are built here and
//! executed through the opaque [`crate::process::ProcessRunner`] seam.

mod runner;

pub use runner::ContainerRunner;

/// Mount point of the project source tree inside the build container.
pub const CONTAINER_WORKDIR: &str = "/project";

/// The fixed build command run inside the container. The builder image's
/// Gradle setup writes the release APK to the conventional output path under
/// the mounted project root; apkforge only checks its exit code and the
/// artifact's presence afterward.
pub const BUILD_COMMAND: &[&str] = &["./gradlew", "--no-daemon", "assembleRelease"];
