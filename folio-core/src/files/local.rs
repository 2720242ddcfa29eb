use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use dashmap::DashSet;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, warn};

use super::{ExistsBehavior, FileSystem, FileSystemError};
use super::{TransferStatus, TransientHandle, UploadRequest};
use crate::config::FolioConfig;

const PUBLIC_SCHEME: &str = "public://";

/// Local disk implementation of [`FileSystem`].
///
/// `public://` uris resolve below `public_dir`. Inbound transfers are staged
/// in `upload_tmp_dir` and remembered until they are moved or discarded,
/// which is what makes [`FileSystem::is_uploaded_file`] trustworthy.
/// Destinations handed out but not yet written are held in `reserved`.
pub struct LocalFileSystem {
    public_dir: PathBuf,
    upload_tmp_dir: PathBuf,
    file_mode: u32,
    max_upload_size: u64,
    staged: DashSet<PathBuf>,
    reserved: DashSet<String>,
}

impl LocalFileSystem {
    pub fn new(config: &FolioConfig) -> Self {
        Self {
            public_dir: config.public_dir.clone(),
            upload_tmp_dir: config.upload_tmp_dir.clone(),
            file_mode: config.file_mode,
            max_upload_size: config.max_upload_size,
            staged: DashSet::new(),
            reserved: DashSet::new(),
        }
    }

    /// Stages an inbound transfer and describes it as an [`UploadRequest`].
    ///
    /// Transfers over the size limit are discarded and reported as
    /// `SizeExceeded`; empty transfers as `NoFile`.
    pub async fn receive_upload<R>(
        &self,
        original_filename: &str,
        reader: R,
    ) -> Result<UploadRequest, FileSystemError>
    where
        R: AsyncRead + Unpin,
    {
        tokio::fs::create_dir_all(&self.upload_tmp_dir).await?;
        let path = self
            .upload_tmp_dir
            .join(format!("upload-{}", uuid::Uuid::new_v4()));

        let mut staged = tokio::fs::File::create(&path).await?;
        let mut limited = reader.take(self.max_upload_size + 1);
        let copied = tokio::io::copy(&mut limited, &mut staged).await?;
        drop(staged);

        let handle = TransientHandle::new(path.clone());
        let status = if copied > self.max_upload_size {
            TransferStatus::SizeExceeded
        } else if copied == 0 {
            TransferStatus::NoFile
        } else {
            TransferStatus::Ok
        };

        if status == TransferStatus::Ok {
            self.staged.insert(path);
        } else {
            debug!(
                "Discarding transfer of {} ({:?}, {} bytes)",
                original_filename, status, copied
            );
            if let Err(err) = tokio::fs::remove_file(&path).await {
                warn!("Failed to remove rejected transfer {:?}: {}", path, err);
            }
        }

        Ok(UploadRequest::new(original_filename, copied, status, handle))
    }

    fn uri_exists(&self, uri: &str) -> Result<bool, FileSystemError> {
        let path = self
            .realpath(uri)
            .ok_or_else(|| FileSystemError::InvalidUri(uri.to_string()))?;
        Ok(path.exists())
    }

    /// Claims `uri` if it is neither on disk nor already reserved.
    fn reserve(&self, uri: &str) -> Result<bool, FileSystemError> {
        if self.uri_exists(uri)? {
            return Ok(false);
        }
        Ok(self.reserved.insert(uri.to_string()))
    }
}

/// Splits `name.ext` so a counter can go between the two parts.
fn split_extension(basename: &str) -> (&str, &str) {
    match basename.rfind('.') {
        Some(index) if index > 0 => basename.split_at(index),
        _ => (basename, ""),
    }
}

fn is_safe_relative(path: &Path) -> bool {
    path.components()
        .all(|component| matches!(component, Component::Normal(_)))
}

#[async_trait]
impl FileSystem for LocalFileSystem {
    fn is_uploaded_file(&self, handle: &TransientHandle) -> bool {
        self.staged.contains(handle.path()) && handle.path().is_file()
    }

    async fn resolve_destination(
        &self,
        desired_uri: &str,
        behavior: ExistsBehavior,
    ) -> Result<Option<String>, FileSystemError> {
        if self.reserve(desired_uri)? {
            return Ok(Some(desired_uri.to_string()));
        }

        match behavior {
            ExistsBehavior::Error => Ok(None),
            ExistsBehavior::Rename => {
                let (directory, basename) = match desired_uri.rfind('/') {
                    Some(index) => desired_uri.split_at(index + 1),
                    None => ("", desired_uri),
                };
                let (stem, extension) = split_extension(basename);

                let mut counter: u32 = 0;
                loop {
                    let candidate = format!("{}{}_{}{}", directory, stem, counter, extension);
                    if self.reserve(&candidate)? {
                        return Ok(Some(candidate));
                    }
                    counter += 1;
                }
            }
        }
    }

    async fn move_uploaded_file(
        &self,
        handle: &TransientHandle,
        destination_uri: &str,
    ) -> Result<(), FileSystemError> {
        if !self.is_uploaded_file(handle) {
            return Err(FileSystemError::NotAnUpload(handle.path().to_path_buf()));
        }

        let destination = self
            .realpath(destination_uri)
            .ok_or_else(|| FileSystemError::InvalidUri(destination_uri.to_string()))?;
        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Claim the destination first so a concurrent writer cannot be replaced
        match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&destination)
            .await
        {
            Ok(placeholder) => drop(placeholder),
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(FileSystemError::DestinationExists(
                    destination_uri.to_string(),
                ));
            }
            Err(err) => return Err(err.into()),
        }

        if tokio::fs::rename(handle.path(), &destination).await.is_err() {
            // Staging and public directories may sit on different devices
            if let Err(err) = tokio::fs::copy(handle.path(), &destination).await {
                if let Err(cleanup) = tokio::fs::remove_file(&destination).await {
                    warn!("Failed to remove partial copy {:?}: {}", destination, cleanup);
                }
                return Err(err.into());
            }
            tokio::fs::remove_file(handle.path()).await?;
        }

        self.staged.remove(handle.path());
        self.reserved.remove(destination_uri);
        debug!("Moved upload {:?} to {}", handle.path(), destination_uri);
        Ok(())
    }

    fn release(&self, uri: &str) {
        self.reserved.remove(uri);
    }

    async fn discard(&self, handle: &TransientHandle) -> Result<(), FileSystemError> {
        if self.staged.remove(handle.path()).is_none() {
            return Ok(());
        }

        match tokio::fs::remove_file(handle.path()).await {
            Ok(()) => {
                debug!("Discarded staged upload {:?}", handle.path());
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    async fn chmod(&self, uri: &str) -> Result<(), FileSystemError> {
        let path = self
            .realpath(uri)
            .ok_or_else(|| FileSystemError::InvalidUri(uri.to_string()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&path, std::fs::Permissions::from_mode(self.file_mode))
                .await?;
        }
        #[cfg(not(unix))]
        {
            let _ = (path, self.file_mode);
        }

        Ok(())
    }

    fn realpath(&self, uri: &str) -> Option<PathBuf> {
        let relative = Path::new(uri.strip_prefix(PUBLIC_SCHEME)?);
        if relative.as_os_str().is_empty() || !is_safe_relative(relative) {
            return None;
        }
        Some(self.public_dir.join(relative))
    }
}
