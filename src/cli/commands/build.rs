//! `build-artifact`: runtime detection plus the containerized build.

use std::path::Path;

use crate::artifact::BuildArtifact;
use crate::build::{BuildExecutor, BuildRequest, ProjectLayout};
use crate::cli::OutputManager;
use crate::config::ProjectConfig;
use crate::error::Result;
use crate::pipeline::Stage;
use crate::process::HostRunner;
use crate::runtime;

use super::resolve_project;

pub async fn run(project: &Path, out: &OutputManager) -> Result<i32> {
    let artifact = build_artifact(project, out).await?;
    // Final line is the bare artifact path, for scripting
    println!("{}", artifact.path.display());
    Ok(0)
}

/// Shared by `build-artifact` and `build-bundle`: select a runtime, build,
/// and validate the artifact.
pub async fn build_artifact(project: &Path, out: &OutputManager) -> Result<BuildArtifact> {
    let project = resolve_project(project)?;
    let config = ProjectConfig::load(&project)?;
    let layout = ProjectLayout::new(&project, &config);
    let runner = HostRunner;

    let selected = runtime::select_runtime(&runner).await?;
    out.stage(Stage::RuntimeSelected);
    out.indent(selected.engine.name);

    let executor = BuildExecutor::new(selected, &runner);
    let request = BuildRequest::new(&layout, &config);

    out.progress(&format!(
        "building {} in {} (this can take a while on a cold cache)",
        request.image,
        selected.engine.name
    ));
    let artifact = executor.build(&request).await?;

    out.stage(Stage::Validated);
    out.success(&format!(
        "artifact: {} ({} bytes, sha256 {})",
        artifact.path.display(),
        artifact.size,
        artifact.sha256
    ));

    Ok(artifact)
}
