//! Command handlers, one per subcommand.

pub mod build;
pub mod bundle;
pub mod clean;
pub mod fix;
pub mod setup;

use std::io;
use std::path::{Path, PathBuf};

use crate::error::{PipelineError, Result};

/// Resolves and validates the project root.
pub fn resolve_project(project: &Path) -> Result<PathBuf> {
    let resolved = project.canonicalize().map_err(|e| {
        PipelineError::Io(io::Error::new(
            e.kind(),
            format!("cannot resolve project root '{}': {e}", project.display()),
        ))
    })?;

    if !resolved.is_dir() {
        return Err(PipelineError::Io(io::Error::new(
            io::ErrorKind::NotADirectory,
            format!("project root is not a directory: {}", resolved.display()),
        )));
    }

    Ok(resolved)
}
