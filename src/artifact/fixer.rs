//! Artifact post-processing: strip stale signing metadata and regenerate the
//! package manifest.
//!
//! The canonical artifact path is mutated exactly once, by the final rename.
//! Everything before that works on a scratch copy, so a failed run leaves the
//! original artifact byte-for-byte intact. The scratch directory is removed
//! on every path before the stage returns.

use std::path::{Path, PathBuf};

use crate::archive;
use crate::artifact::{BuildArtifact, MANIFEST_PATH, is_signature_entry, render_manifest};
use crate::build::ProjectLayout;
use crate::error::{PipelineError, Result};

/// Validates the artifact as a ZIP, rebuilds its packaging metadata, and
/// atomically replaces it. Idempotent on a well-formed artifact: a second
/// run reproduces the same entry set and the same placeholder digests.
pub async fn fix_artifact(artifact_path: &Path, layout: &ProjectLayout) -> Result<BuildArtifact> {
    if !artifact_path.exists() {
        return Err(PipelineError::ArtifactMissing {
            path: artifact_path.to_path_buf(),
        });
    }

    let path = artifact_path.to_path_buf();
    let scratch = layout.scratch_dir();

    tokio::task::spawn_blocking(move || {
        let result = fix_in_scratch(&path, &scratch);
        // Scratch never survives the stage, whatever happened above
        let _ = std::fs::remove_dir_all(&scratch);
        result
    })
    .await
    .map_err(|e| PipelineError::RepackFailed {
        detail: format!("post-processing task panicked: {e}"),
    })??;

    BuildArtifact::from_path(artifact_path).await
}

fn fix_in_scratch(artifact_path: &Path, scratch: &Path) -> Result<()> {
    // Validate before creating any state; a corrupt artifact mutates nothing
    let mut archive = archive::open_archive(artifact_path)?;

    archive::extract_archive(&mut archive, scratch)?;
    drop(archive);

    strip_signature_entries(scratch)?;

    let entries = remaining_entries(scratch)?;
    let manifest_path = scratch.join(MANIFEST_PATH);
    if let Some(parent) = manifest_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&manifest_path, render_manifest(&entries))?;

    // Repack beside the artifact, then the single point of mutation
    let replacement = ProjectLayout::replacement_path(artifact_path);
    match archive::write_archive(scratch, &replacement) {
        Ok(()) => std::fs::rename(&replacement, artifact_path).map_err(|e| {
            let _ = std::fs::remove_file(&replacement);
            PipelineError::RepackFailed {
                detail: format!("replacing {}: {e}", artifact_path.display()),
            }
        }),
        Err(e) => {
            let _ = std::fs::remove_file(&replacement);
            Err(e)
        }
    }
}

/// Deletes the manifest and any signature files/blocks from the extracted
/// tree. The prior metadata is discarded wholesale; nothing is merged.
fn strip_signature_entries(scratch: &Path) -> Result<()> {
    let meta_inf = scratch.join("META-INF");
    if !meta_inf.is_dir() {
        return Ok(());
    }

    for entry in std::fs::read_dir(&meta_inf)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let rel = path
            .strip_prefix(scratch)
            .map(archive::entry_name)
            .unwrap_or_default();
        if is_signature_entry(&rel) {
            std::fs::remove_file(&path)?;
        }
    }
    Ok(())
}

/// Files left in the scratch tree, as sorted archive entry names.
fn remaining_entries(scratch: &Path) -> Result<Vec<String>> {
    let mut entries: Vec<PathBuf> = walkdir::WalkDir::new(scratch)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().to_path_buf())
        .collect();
    entries.sort();

    Ok(entries
        .iter()
        .filter_map(|p| p.strip_prefix(scratch).ok())
        .map(archive::entry_name)
        .collect())
}
