//! `clean`: delete build outputs and, optionally, the pulled image.

use std::io;
use std::path::Path;

use crate::build::{BuildExecutor, ProjectLayout};
use crate::cli::OutputManager;
use crate::config::ProjectConfig;
use crate::error::Result;
use crate::process::HostRunner;
use crate::runtime;

use super::resolve_project;

pub async fn run(project: &Path, remove_image: bool, out: &OutputManager) -> Result<i32> {
    let project = resolve_project(project)?;
    let config = ProjectConfig::load(&project)?;
    let layout = ProjectLayout::new(&project, &config);

    let output_root = layout.output_root();
    match tokio::fs::remove_dir_all(&output_root).await {
        Ok(()) => out.success(&format!("removed {}", output_root.display())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            out.indent(&format!("{} already absent", output_root.display()));
        }
        Err(e) => return Err(e.into()),
    }

    if remove_image {
        let runner = HostRunner;
        match runtime::select_runtime(&runner).await {
            Ok(selected) => {
                let executor = BuildExecutor::new(selected, &runner);
                let output = executor.container().remove_image(config.image()).await?;
                if output.success() {
                    out.success(&format!("removed image {}", config.image()));
                } else {
                    // A missing image is the common case here, not a failure
                    out.indent(&format!("image {} not present", config.image()));
                }
            }
            Err(e) => {
                out.warn(&format!("cannot remove image: {e}"));
            }
        }
    }

    Ok(0)
}
