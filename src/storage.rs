//! Storage of uploaded document files on disk.
//!
//! Files live flat in the uploads directory under a generated name
//! `{unix_millis}-{random}-{sanitized original}` and are addressed by their
//! public path `/uploads/{name}`.

use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;

/// URL prefix under which stored files are served.
pub const PUBLIC_PREFIX: &str = "/uploads/";

/// Length of the random component in stored filenames.
const RANDOM_LEN: usize = 9;

/// Errors from reading or writing stored files.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not a stored file path: {0}")]
    InvalidPath(String),
}

/// A file written to the uploads directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Public path, e.g. `/uploads/1718000000000-ab12cd34e-KH_12.pdf`.
    pub file_path: String,
    /// Location on disk.
    pub full_path: PathBuf,
    /// Bytes written.
    pub file_size: i64,
}

/// Replace every character outside `[A-Za-z0-9.-]` with `_`.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Build the stored filename for an upload.
pub fn stored_filename(original: &str, unix_millis: i64, random: &str) -> String {
    format!("{}-{}-{}", unix_millis, random, sanitize_filename(original))
}

/// Short lowercase alphanumeric token for stored filenames.
fn random_token() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..RANDOM_LEN].to_string()
}

/// Flat directory of uploaded files.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The uploads directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `content` under a fresh stored name derived from `original_name`.
    pub async fn save(
        &self,
        original_name: &str,
        content: &[u8],
    ) -> Result<StoredFile, StorageError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let name = stored_filename(original_name, Utc::now().timestamp_millis(), &random_token());
        let full_path = self.dir.join(&name);
        tokio::fs::write(&full_path, content).await?;

        tracing::debug!(path = %full_path.display(), bytes = content.len(), "Stored upload");

        Ok(StoredFile {
            file_path: format!("{}{}", PUBLIC_PREFIX, name),
            full_path,
            file_size: content.len() as i64,
        })
    }

    /// Map a public path (or bare stored name) to its location on disk.
    ///
    /// Anything that could leave the uploads directory is rejected.
    pub fn resolve(&self, public_path: &str) -> Result<PathBuf, StorageError> {
        let name = public_path
            .strip_prefix(PUBLIC_PREFIX)
            .unwrap_or(public_path);

        // A single plain component; dots inside a name are fine.
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(StorageError::InvalidPath(public_path.to_string()));
        }

        Ok(self.dir.join(name))
    }

    /// Delete a stored file. A file that is already gone is not an error.
    ///
    /// Returns whether a file was removed.
    pub async fn remove(&self, public_path: &str) -> Result<bool, StorageError> {
        let path = self.resolve(public_path)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
