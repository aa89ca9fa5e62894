//! Command line argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Containerized Android APK build pipeline
#[derive(Parser, Debug)]
#[command(
    name = "apkforge",
    version,
    about = "Containerized Android APK build pipeline",
    long_about = "Builds release APKs inside a container (podman or docker), repairs their
packaging metadata, and repackages them into a store-submission bundle.

The project root is mounted read-write into the build container; the artifact
lands at <project>/build/release/apk/<app>.apk and the bundle at
<project>/build/release/aab/<app>.aab. Configure the app name, image, and
timeouts in apkforge.toml at the project root.

Exit code 0 means the requested stage completed; 1 means any stage failed."
)]
pub struct Args {
    /// Project root directory
    #[arg(long, global = true, default_value = ".", value_name = "DIR")]
    pub project: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

/// One subcommand per pipeline stage, plus the composite bundle build.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Verify prerequisites: engine present, output directories, build image
    Setup,

    /// Detect a runtime and run the containerized build
    BuildArtifact,

    /// Strip and regenerate the artifact's packaging metadata
    FixArtifact {
        /// Artifact to fix instead of the conventional path
        #[arg(long, value_name = "PATH")]
        artifact: Option<PathBuf>,
    },

    /// Build the artifact, then repackage it as a store bundle
    BuildBundle,

    /// Remove build outputs and scratch state
    Clean {
        /// Also remove the pulled build image
        #[arg(long)]
        remove_image: bool,
    },
}
