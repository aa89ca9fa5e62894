//! Conventional output layout under the project root.
//!
//! The layout is load-bearing for compatibility: the artifact always lands at
//! `<project>/<output>/release/apk/<app>.apk` and the bundle at
//! `<project>/<output>/release/aab/<app>.aab`. Scratch directories live under
//! the output root and carry a uuid so concurrent stages of one invocation
//! never collide. The canonical paths themselves are not locked; a single
//! invoker per project is assumed.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::config::ProjectConfig;

/// Artifact kind directory and extension for the installable artifact.
pub const ARTIFACT_KIND: &str = "apk";

/// Artifact kind directory and extension for the store bundle.
pub const BUNDLE_KIND: &str = "aab";

/// Resolved filesystem layout for one project.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    root: PathBuf,
    output_dir: String,
    app_name: String,
}

impl ProjectLayout {
    /// Builds the layout for `root` from its configuration.
    pub fn new(root: &Path, config: &ProjectConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            output_dir: config.output_dir().to_string(),
            app_name: config.app_name().to_string(),
        }
    }

    /// Project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Output root, `<project>/<output>`.
    pub fn output_root(&self) -> PathBuf {
        self.root.join(&self.output_dir)
    }

    /// Directory holding the installable artifact.
    pub fn artifact_dir(&self) -> PathBuf {
        self.output_root().join("release").join(ARTIFACT_KIND)
    }

    /// Conventional artifact path, `<output>/release/apk/<app>.apk`.
    pub fn artifact_path(&self) -> PathBuf {
        self.artifact_dir()
            .join(format!("{}.{}", self.app_name, ARTIFACT_KIND))
    }

    /// Directory holding the store bundle.
    pub fn bundle_dir(&self) -> PathBuf {
        self.output_root().join("release").join(BUNDLE_KIND)
    }

    /// Conventional bundle path, `<output>/release/aab/<app>.aab`.
    pub fn bundle_path(&self) -> PathBuf {
        self.bundle_dir()
            .join(format!("{}.{}", self.app_name, BUNDLE_KIND))
    }

    /// A fresh scratch directory path under the output root. Not created
    /// here; the owning stage creates it and must remove it before
    /// returning.
    pub fn scratch_dir(&self) -> PathBuf {
        self.output_root()
            .join(format!("scratch-{}", Uuid::new_v4()))
    }

    /// Sibling temp path for atomically replacing `target`. Same directory,
    /// so the final `rename` never crosses filesystems.
    pub fn replacement_path(target: &Path) -> PathBuf {
        let file_name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "artifact".to_string());
        target.with_file_name(format!(".{}.tmp-{}", file_name, Uuid::new_v4()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectConfig;

    fn layout() -> ProjectLayout {
        ProjectLayout::new(Path::new("/work/app"), &ProjectConfig::default())
    }

    #[test]
    fn conventional_paths() {
        let layout = layout();
        assert_eq!(
            layout.artifact_path(),
            Path::new("/work/app/build/release/apk/app-release.apk")
        );
        assert_eq!(
            layout.bundle_path(),
            Path::new("/work/app/build/release/aab/app-release.aab")
        );
    }

    #[test]
    fn scratch_dirs_are_unique_and_under_output_root() {
        let layout = layout();
        let first = layout.scratch_dir();
        let second = layout.scratch_dir();
        assert_ne!(first, second);
        assert!(first.starts_with(layout.output_root()));
    }

    #[test]
    fn replacement_path_stays_in_the_same_directory() {
        let target = Path::new("/out/release/apk/app-release.apk");
        let temp = ProjectLayout::replacement_path(target);
        assert_eq!(temp.parent(), target.parent());
        assert_ne!(temp, target);
    }
}
