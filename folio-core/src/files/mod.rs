//! File-system collaborators for uploads: stream-wrapper URIs, staging of
//! inbound transfers, destination naming and MIME type guessing.

mod local;
mod mime;
mod transfer;

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

pub use local::LocalFileSystem;
pub use mime::{ExtensionMimeTypeGuesser, MimeTypeGuesser, DEFAULT_MIME_TYPE};
pub use transfer::{TransferStatus, TransientHandle, UploadRequest};

#[derive(Debug, Error)]
pub enum FileSystemError {
    #[error("{0} is not a staged upload")]
    NotAnUpload(PathBuf),
    #[error("unsupported or unsafe uri: {0}")]
    InvalidUri(String),
    #[error("destination already exists: {0}")]
    DestinationExists(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// What to do when a destination is already taken.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExistsBehavior {
    /// Append `_0`, `_1`, ... before the extension until the name is free.
    Rename,
    Error,
}

#[async_trait]
pub trait FileSystem: Send + Sync {
    /// True only for handles this file system staged itself.
    fn is_uploaded_file(&self, handle: &TransientHandle) -> bool;

    /// Final destination for `desired_uri`, or `None` when `behavior` is
    /// `Error` and the uri is taken.
    ///
    /// The returned uri is reserved: later calls will not hand it out again
    /// until it is moved into or [`FileSystem::release`]d.
    async fn resolve_destination(
        &self,
        desired_uri: &str,
        behavior: ExistsBehavior,
    ) -> Result<Option<String>, FileSystemError>;

    fn release(&self, uri: &str);

    /// Never overwrites: an occupied destination is `DestinationExists`.
    async fn move_uploaded_file(
        &self,
        handle: &TransientHandle,
        destination_uri: &str,
    ) -> Result<(), FileSystemError>;

    /// Drops a staged upload that will not be moved. Handles this file
    /// system did not stage are left alone.
    async fn discard(&self, handle: &TransientHandle) -> Result<(), FileSystemError>;

    async fn chmod(&self, uri: &str) -> Result<(), FileSystemError>;

    fn realpath(&self, uri: &str) -> Option<PathBuf>;
}

/// Human readable byte size using 1024-based units, e.g. `2 MB`, `1.5 KB`.
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        return if bytes == 1 {
            "1 byte".to_string()
        } else {
            format!("{} bytes", bytes)
        };
    }

    const UNITS: [&str; 8] = ["KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];
    let mut size = bytes as f64 / 1024.0;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{:.2}", size);
    let rounded = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", rounded, UNITS[unit])
}

/// Last path segment of a client supplied name, safe to use in a uri.
pub fn sanitize_basename(name: &str) -> String {
    let basename = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>();
    let basename = basename.trim().trim_start_matches('.');

    if basename.is_empty() {
        "upload".to_string()
    } else {
        basename.to_string()
    }
}
