//! Build artifact representation and checksum reporting.

mod fixer;
mod manifest;

pub use fixer::fix_artifact;
pub use manifest::{MANIFEST_PATH, PLACEHOLDER_DIGEST, is_signature_entry, render_manifest};

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tokio::io::AsyncReadExt;

use crate::error::Result;

/// A produced installable artifact. Created once per successful build;
/// downstream stages replace the file at `path` atomically rather than
/// mutating it.
#[derive(Debug, Clone)]
pub struct BuildArtifact {
    /// Canonical artifact path
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Hex-encoded SHA-256 of the file, reporting metadata only
    pub sha256: String,
}

impl BuildArtifact {
    /// Describes the artifact at `path`, reading its size and checksum.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let metadata = tokio::fs::metadata(path).await?;
        let sha256 = sha256_file(path).await?;
        Ok(Self {
            path: path.to_path_buf(),
            size: metadata.len(),
            sha256,
        })
    }
}

/// Streams the file through SHA-256 in 8KB chunks.
async fn sha256_file(path: &Path) -> Result<String> {
    let mut file = tokio::fs::File::open(path).await?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 8192];

    loop {
        let n = file.read(&mut buffer).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}
