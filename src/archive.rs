//! Synchronous ZIP helpers shared by the post-processor and the bundle
//! assembler.
//!
//! All functions here block; stages call them inside `spawn_blocking`.
//! Archives are written deterministically: entries in sorted traversal
//! order, fixed timestamps, fixed permissions, Deflate throughout, so
//! archiving the same tree twice yields identical bytes.

use std::fs::File;
use std::io;
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{PipelineError, Result};

fn write_options() -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default())
        .unix_permissions(0o644)
}

/// Opens `path` as a ZIP archive, failing with `ArtifactCorrupt` otherwise.
/// Read-only; the file is never touched on failure.
pub fn open_archive(path: &Path) -> Result<ZipArchive<File>> {
    let file = File::open(path).map_err(|e| PipelineError::ArtifactCorrupt {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    ZipArchive::new(file).map_err(|e| PipelineError::ArtifactCorrupt {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}

/// Entry names of the archive at `path`, in stored order.
pub fn list_entries(path: &Path) -> Result<Vec<String>> {
    let archive = open_archive(path)?;
    Ok(archive.file_names().map(String::from).collect())
}

/// Extracts every entry of an already-opened archive into `dest`.
///
/// Entry names are sanitized by the extractor, so hostile archives cannot
/// escape `dest`.
pub fn extract_archive(archive: &mut ZipArchive<File>, dest: &Path) -> Result<()> {
    std::fs::create_dir_all(dest)?;
    archive
        .extract(dest)
        .map_err(|e| PipelineError::ExtractionFailed {
            detail: e.to_string(),
        })
}

/// Archives the contents of `src_dir` (not the directory itself) into the
/// ZIP file at `dest`. Empty directories are preserved as directory entries.
pub fn write_archive(src_dir: &Path, dest: &Path) -> Result<()> {
    let file = File::create(dest).map_err(|e| PipelineError::RepackFailed {
        detail: format!("cannot create {}: {e}", dest.display()),
    })?;
    let mut writer = ZipWriter::new(file);
    let options = write_options();

    let walker = walkdir::WalkDir::new(src_dir)
        .sort_by_file_name()
        .into_iter();
    for entry in walker {
        let entry = entry.map_err(|e| PipelineError::RepackFailed {
            detail: e.to_string(),
        })?;
        let rel = entry
            .path()
            .strip_prefix(src_dir)
            .map_err(|e| PipelineError::RepackFailed {
                detail: e.to_string(),
            })?;
        if rel.as_os_str().is_empty() {
            continue;
        }
        let name = entry_name(rel);

        if entry.file_type().is_dir() {
            writer
                .add_directory(name.clone(), options)
                .map_err(|e| repack_error(&name, e))?;
        } else {
            writer
                .start_file(name.clone(), options)
                .map_err(|e| repack_error(&name, e))?;
            let mut source = File::open(entry.path()).map_err(|e| PipelineError::RepackFailed {
                detail: format!("cannot read {}: {e}", entry.path().display()),
            })?;
            io::copy(&mut source, &mut writer).map_err(|e| PipelineError::RepackFailed {
                detail: format!("copying {}: {e}", entry.path().display()),
            })?;
        }
    }

    writer.finish().map_err(|e| PipelineError::RepackFailed {
        detail: e.to_string(),
    })?;
    Ok(())
}

/// Archive entry name for a relative path, `/`-separated on every host.
pub fn entry_name(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn repack_error(name: &str, e: zip::result::ZipError) -> PipelineError {
    PipelineError::RepackFailed {
        detail: format!("entry '{name}': {e}"),
    }
}
