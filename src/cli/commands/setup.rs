//! `setup`: verify prerequisites and pull the build image once.

use std::path::Path;

use crate::build::{BuildExecutor, ProjectLayout};
use crate::cli::OutputManager;
use crate::config::ProjectConfig;
use crate::error::Result;
use crate::process::HostRunner;
use crate::runtime;

use super::resolve_project;

pub async fn run(project: &Path, out: &OutputManager) -> Result<i32> {
    let project = resolve_project(project)?;
    let config = ProjectConfig::load(&project)?;
    let layout = ProjectLayout::new(&project, &config);
    let runner = HostRunner;

    // Report every candidate, then select; setup is the diagnostic surface
    out.progress("probing container engines");
    let attempts = runtime::probe_all(&runner).await;
    for status in &attempts {
        out.indent(&status.to_string());
    }
    let selected = runtime::select_from_statuses(attempts)?;
    out.success(&format!("using {}", selected.engine.name));

    tokio::fs::create_dir_all(layout.artifact_dir()).await?;
    tokio::fs::create_dir_all(layout.bundle_dir()).await?;
    out.success(&format!(
        "output directories ready under {}",
        layout.output_root().display()
    ));

    out.progress(&format!("pulling {}", config.image()));
    let executor = BuildExecutor::new(selected, &runner);
    executor
        .container()
        .pull_image(config.image(), config.pull_timeout())
        .await?;
    out.success("build image available");

    Ok(0)
}
