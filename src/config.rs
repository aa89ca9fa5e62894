//! Project configuration from `apkforge.toml`.
//!
//! The file is optional: a project without one builds with the defaults
//! below. A present-but-invalid file is an error, not a silent fallback.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{PipelineError, Result};

/// Configuration file name, looked up at the project root.
pub const CONFIG_FILE: &str = "apkforge.toml";

/// Fixed build image reference, overridable per project.
pub const DEFAULT_IMAGE: &str = "apkforge/android-builder:latest";

/// Default artifact/bundle file stem.
pub const DEFAULT_APP_NAME: &str = "app-release";

/// Default build output directory under the project root.
pub const DEFAULT_OUTPUT_DIR: &str = "build";

/// Containerized builds pull the whole Gradle dependency tree on a cold
/// cache; half an hour before declaring the build hung.
pub const DEFAULT_BUILD_TIMEOUT_SECS: u64 = 1800;

/// Image pulls are network-bound but bounded.
pub const DEFAULT_PULL_TIMEOUT_SECS: u64 = 600;

/// Parsed `apkforge.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    #[serde(default)]
    project: ProjectSection,
    #[serde(default)]
    build: BuildSection,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProjectSection {
    /// Artifact file stem (`<name>.apk`, `<name>.aab`)
    #[serde(default = "default_app_name")]
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BuildSection {
    /// Build image reference
    #[serde(default = "default_image")]
    image: String,
    /// Output directory under the project root
    #[serde(default = "default_output_dir")]
    output_dir: String,
    /// Containerized build timeout
    #[serde(default = "default_build_timeout")]
    timeout_secs: u64,
    /// Image pull timeout
    #[serde(default = "default_pull_timeout")]
    pull_timeout_secs: u64,
}

fn default_app_name() -> String {
    DEFAULT_APP_NAME.to_string()
}

fn default_image() -> String {
    DEFAULT_IMAGE.to_string()
}

fn default_output_dir() -> String {
    DEFAULT_OUTPUT_DIR.to_string()
}

fn default_build_timeout() -> u64 {
    DEFAULT_BUILD_TIMEOUT_SECS
}

fn default_pull_timeout() -> u64 {
    DEFAULT_PULL_TIMEOUT_SECS
}

impl Default for ProjectSection {
    fn default() -> Self {
        Self {
            name: default_app_name(),
        }
    }
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            image: default_image(),
            output_dir: default_output_dir(),
            timeout_secs: default_build_timeout(),
            pull_timeout_secs: default_pull_timeout(),
        }
    }
}

impl ProjectConfig {
    /// Loads configuration for the project at `root`.
    ///
    /// A missing file yields the defaults; an unreadable or unparsable file
    /// is a [`PipelineError::Config`].
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(&path).map_err(|e| {
            PipelineError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        toml::from_str(&raw)
            .map_err(|e| PipelineError::Config(format!("{}: {e}", path.display())))
    }

    /// Artifact/bundle file stem.
    pub fn app_name(&self) -> &str {
        &self.project.name
    }

    /// Build image reference.
    pub fn image(&self) -> &str {
        &self.build.image
    }

    /// Output directory name under the project root.
    pub fn output_dir(&self) -> &str {
        &self.build.output_dir
    }

    /// Containerized build timeout.
    pub fn build_timeout(&self) -> Duration {
        Duration::from_secs(self.build.timeout_secs)
    }

    /// Image pull timeout.
    pub fn pull_timeout(&self) -> Duration {
        Duration::from_secs(self.build.pull_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = ProjectConfig::load(dir.path()).expect("defaults");
        assert_eq!(config.app_name(), DEFAULT_APP_NAME);
        assert_eq!(config.image(), DEFAULT_IMAGE);
        assert_eq!(config.output_dir(), DEFAULT_OUTPUT_DIR);
        assert_eq!(
            config.build_timeout(),
            Duration::from_secs(DEFAULT_BUILD_TIMEOUT_SECS)
        );
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[project]\nname = \"nightly\"\n\n[build]\ntimeout_secs = 60\n",
        )
        .expect("write config");

        let config = ProjectConfig::load(dir.path()).expect("parses");
        assert_eq!(config.app_name(), "nightly");
        assert_eq!(config.build_timeout(), Duration::from_secs(60));
        assert_eq!(config.image(), DEFAULT_IMAGE);
    }

    #[test]
    fn invalid_file_is_a_config_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(CONFIG_FILE), "[build\n").expect("write config");

        let err = ProjectConfig::load(dir.path()).expect_err("must fail");
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(CONFIG_FILE), "[build]\nimmage = \"x\"\n")
            .expect("write config");
        assert!(ProjectConfig::load(dir.path()).is_err());
    }
}
