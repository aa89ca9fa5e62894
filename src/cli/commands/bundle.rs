//! `build-bundle`: build the artifact, then repackage it as a store bundle.

use std::path::Path;

use crate::build::ProjectLayout;
use crate::bundle;
use crate::cli::OutputManager;
use crate::config::ProjectConfig;
use crate::error::Result;
use crate::pipeline::Stage;

use super::{build, resolve_project};

pub async fn run(project: &Path, out: &OutputManager) -> Result<i32> {
    let artifact = build::build_artifact(project, out).await?;

    let project = resolve_project(project)?;
    let config = ProjectConfig::load(&project)?;
    let layout = ProjectLayout::new(&project, &config);

    out.progress("assembling store bundle");
    let assembled = bundle::assemble(&artifact.path, &layout).await?;

    out.stage(Stage::Bundled);
    out.success(&format!("bundle: {}", assembled.path.display()));
    println!("{}", assembled.path.display());

    Ok(0)
}
