//! Bundle assembly: repackage an installable artifact into the
//! store-submission layout.
//!
//! The bundle is a superset repackaging, not a transformation: the artifact's
//! entries are extracted as-is under the base module root and re-archived.
//! The four module subdirectories are created up front but entries are not
//! routed into them by type; they ship empty alongside the flat extraction.

use std::path::{Path, PathBuf};

use crate::archive;
use crate::build::ProjectLayout;
use crate::error::{PipelineError, Result};

/// Module root directory inside the bundle archive.
pub const MODULE_ROOT: &str = "base";

/// Fixed subdirectories of the base module.
pub const MODULE_DIRS: &[&str] = &["manifest", "dex", "lib", "assets"];

/// An assembled store bundle.
#[derive(Debug, Clone)]
pub struct Bundle {
    /// Bundle archive path
    pub path: PathBuf,
}

/// Repackages the artifact at `artifact_path` into a bundle at the layout's
/// conventional bundle path.
///
/// The scratch tree is removed unconditionally before returning, whether
/// re-archiving succeeded or not.
pub async fn assemble(artifact_path: &Path, layout: &ProjectLayout) -> Result<Bundle> {
    if !artifact_path.exists() {
        return Err(PipelineError::ArtifactMissing {
            path: artifact_path.to_path_buf(),
        });
    }

    let artifact = artifact_path.to_path_buf();
    let bundle_path = layout.bundle_path();
    let scratch = layout.scratch_dir();

    let bundle_path = tokio::task::spawn_blocking(move || {
        let result = assemble_in_scratch(&artifact, &bundle_path, &scratch);
        // No scratch state survives a run, success or failure
        let _ = std::fs::remove_dir_all(&scratch);
        result.map(|()| bundle_path)
    })
    .await
    .map_err(|e| PipelineError::RepackFailed {
        detail: format!("bundle task panicked: {e}"),
    })??;

    Ok(Bundle { path: bundle_path })
}

fn assemble_in_scratch(artifact: &Path, bundle_path: &Path, scratch: &Path) -> Result<()> {
    let module_root = scratch.join(MODULE_ROOT);
    for dir in MODULE_DIRS {
        std::fs::create_dir_all(module_root.join(dir))?;
    }

    // Flat extraction under the module root; entries keep their archive paths.
    // An unreadable artifact surfaces as an extraction failure here: corrupt
    // input is the post-processor's diagnosis, not the assembler's.
    let mut archive = archive::open_archive(artifact).map_err(|e| match e {
        PipelineError::ArtifactCorrupt { detail, .. } => {
            PipelineError::ExtractionFailed { detail }
        }
        other => other,
    })?;
    archive::extract_archive(&mut archive, &module_root)?;
    drop(archive);

    if let Some(parent) = bundle_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Archive to a sibling temp file, then atomically replace the bundle
    let replacement = ProjectLayout::replacement_path(bundle_path);
    match archive::write_archive(scratch, &replacement) {
        Ok(()) => std::fs::rename(&replacement, bundle_path).map_err(|e| {
            let _ = std::fs::remove_file(&replacement);
            PipelineError::RepackFailed {
                detail: format!("replacing {}: {e}", bundle_path.display()),
            }
        }),
        Err(e) => {
            let _ = std::fs::remove_file(&replacement);
            Err(e)
        }
    }
}
