//! `fix-artifact`: strip and regenerate the artifact's packaging metadata.

use std::path::{Path, PathBuf};

use crate::artifact;
use crate::build::ProjectLayout;
use crate::cli::OutputManager;
use crate::config::ProjectConfig;
use crate::error::Result;
use crate::pipeline::Stage;

use super::resolve_project;

pub async fn run(
    project: &Path,
    artifact_override: Option<PathBuf>,
    out: &OutputManager,
) -> Result<i32> {
    let project = resolve_project(project)?;
    let config = ProjectConfig::load(&project)?;
    let layout = ProjectLayout::new(&project, &config);

    let artifact_path = artifact_override.unwrap_or_else(|| layout.artifact_path());

    out.progress(&format!(
        "regenerating packaging metadata in {}",
        artifact_path.display()
    ));
    let fixed = artifact::fix_artifact(&artifact_path, &layout).await?;

    out.stage(Stage::Postprocessed);
    out.success(&format!(
        "fixed artifact: {} ({} bytes, sha256 {})",
        fixed.path.display(),
        fixed.size,
        fixed.sha256
    ));
    out.indent("manifest digests are placeholders; re-sign before distribution");

    Ok(0)
}
