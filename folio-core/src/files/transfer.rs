use std::path::{Path, PathBuf};

/// Outcome the transport layer reported for one inbound file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferStatus {
    Ok,
    /// Larger than the server-wide upload limit.
    SizeExceeded,
    /// Larger than the limit the submitting form declared.
    FormSizeExceeded,
    Partial,
    NoFile,
    Unknown(i32),
}

/// Location of a staged upload. Only [`super::FileSystem::is_uploaded_file`]
/// can tell whether it really came from a transfer.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TransientHandle(PathBuf);

impl TransientHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

/// One inbound file transfer, alive for a single resolver invocation.
#[derive(Clone, Debug)]
pub struct UploadRequest {
    pub original_filename: String,
    pub size_bytes: u64,
    pub transfer_status: TransferStatus,
    pub temporary_location: TransientHandle,
}

impl UploadRequest {
    pub fn new(
        original_filename: impl Into<String>,
        size_bytes: u64,
        transfer_status: TransferStatus,
        temporary_location: TransientHandle,
    ) -> Self {
        Self {
            original_filename: original_filename.into(),
            size_bytes,
            transfer_status,
            temporary_location,
        }
    }
}
