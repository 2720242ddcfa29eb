use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};

use crate::auth::{Actor, Operation};
use crate::content::{FieldMap, FileEntity};
use crate::errors::CoreResult;
use crate::files::{
    format_size, sanitize_basename, ExistsBehavior, FileSystem, MimeTypeGuesser, TransferStatus,
    UploadRequest,
};
use crate::outcome::CrudOutcome;
use crate::store::{EntityStore, SaveStatus};
use crate::validation::validate_name_length;

/// Turns one staged upload into a saved, temporary file entity.
///
/// Checks run in a fixed order: transfer status, create access, entity
/// validation, filename length, move into `public://`, save. The first
/// failing check decides the outcome and nothing after it runs. A rejected
/// upload's staged bytes and destination reservation are dropped.
pub struct FileUploadResolver {
    store: Arc<dyn EntityStore<FileEntity>>,
    file_system: Arc<dyn FileSystem>,
    mime_guesser: Arc<dyn MimeTypeGuesser>,
    max_upload_size: u64,
    max_filename_length: usize,
}

impl FileUploadResolver {
    pub fn new(
        store: Arc<dyn EntityStore<FileEntity>>,
        file_system: Arc<dyn FileSystem>,
        mime_guesser: Arc<dyn MimeTypeGuesser>,
        max_upload_size: u64,
        max_filename_length: usize,
    ) -> Self {
        Self {
            store,
            file_system,
            mime_guesser,
            max_upload_size,
            max_filename_length,
        }
    }

    pub async fn upload(
        &self,
        actor: &Actor,
        upload: UploadRequest,
    ) -> CoreResult<CrudOutcome<FileEntity>> {
        let name = upload.original_filename.as_str();

        if let Some(rejection) = self.check_transfer(&upload) {
            warn!("Rejected upload of {}: {:?}", name, upload.transfer_status);
            self.discard(&upload).await;
            return Ok(rejection);
        }

        let desired_uri = format!("public://{}", sanitize_basename(name));
        let destination = match self
            .file_system
            .resolve_destination(&desired_uri, ExistsBehavior::Rename)
            .await
        {
            Ok(Some(uri)) => uri,
            Ok(None) | Err(_) => {
                warn!("No destination available for {}", desired_uri);
                self.discard(&upload).await;
                return Ok(CrudOutcome::error(format!(
                    "The file {} could not be saved. An unknown error has occurred.",
                    name
                )));
            }
        };

        let result = self.store_upload(actor, &upload, &destination).await;
        if !matches!(&result, Ok(outcome) if outcome.is_success()) {
            // Both are no-ops once the move went through
            self.discard(&upload).await;
            self.file_system.release(&destination);
        }
        result
    }

    /// Everything after the destination is known: entity, access,
    /// validation, move and save.
    async fn store_upload(
        &self,
        actor: &Actor,
        upload: &UploadRequest,
        destination: &str,
    ) -> CoreResult<CrudOutcome<FileEntity>> {
        let name = upload.original_filename.as_str();
        let mime = self.mime_guesser.guess(name);
        debug!("Upload {} will be stored at {} ({})", name, destination, mime);

        let mut fields = FieldMap::new();
        fields.insert("uid".to_string(), json!(actor.user_id));
        fields.insert("status".to_string(), json!(0));
        fields.insert("filename".to_string(), json!(name));
        fields.insert("uri".to_string(), json!(destination));
        fields.insert("filesize".to_string(), json!(upload.size_bytes));
        fields.insert("filemime".to_string(), json!(mime));
        let mut file = self.store.create("file", fields, actor)?;

        if !self.store.check_access(&file, Operation::Create, actor) {
            warn!("File upload denied for user {:?}", actor.user_id);
            return Ok(CrudOutcome::error(
                "You do not have the necessary permissions to create entities of this type.",
            ));
        }

        let violations = self.store.validate(&file).await?;
        if !violations.is_empty() {
            return Ok(CrudOutcome::violations(violations));
        }

        let name_errors = validate_name_length(&file, self.max_filename_length);
        if !name_errors.is_empty() {
            debug!("Filename check failed for {}: {:?}", name, name_errors);
            return Ok(CrudOutcome::error(format!(
                "The specified file {} could not be uploaded.",
                name
            )));
        }

        if let Err(err) = self
            .file_system
            .move_uploaded_file(&upload.temporary_location, &file.uri)
            .await
        {
            warn!("Could not move upload {} to {}: {}", name, file.uri, err);
            return Ok(CrudOutcome::error(format!(
                "Could not move uploaded file {}.",
                name
            )));
        }

        if let Err(err) = self.file_system.chmod(&file.uri).await {
            warn!("Could not set permissions on {}: {}", file.uri, err);
        }

        match self.store.save(&mut file).await? {
            SaveStatus::Created => {
                info!("Stored upload {} as file {:?}", name, file.id);
                Ok(CrudOutcome::success(file))
            }
            status => {
                warn!("Saving upload {} reported {:?}", name, status);
                Ok(CrudOutcome::error(format!(
                    "The file {} could not be saved.",
                    name
                )))
            }
        }
    }

    async fn discard(&self, upload: &UploadRequest) {
        if let Err(err) = self.file_system.discard(&upload.temporary_location).await {
            warn!(
                "Failed to discard staged upload {}: {}",
                upload.original_filename, err
            );
        }
    }

    fn check_transfer(&self, upload: &UploadRequest) -> Option<CrudOutcome<FileEntity>> {
        let name = &upload.original_filename;
        match upload.transfer_status {
            TransferStatus::SizeExceeded | TransferStatus::FormSizeExceeded => {
                Some(CrudOutcome::error(format!(
                    "The file {} could not be saved because it exceeds {}, the maximum allowed size for uploads.",
                    name,
                    format_size(self.max_upload_size)
                )))
            }
            TransferStatus::Partial | TransferStatus::NoFile => Some(CrudOutcome::error(format!(
                "The file {} could not be saved because the upload did not complete.",
                name
            ))),
            TransferStatus::Ok if self.file_system.is_uploaded_file(&upload.temporary_location) => {
                None
            }
            TransferStatus::Ok | TransferStatus::Unknown(_) => Some(CrudOutcome::error(format!(
                "The file {} could not be saved. An unknown error has occurred.",
                name
            ))),
        }
    }
}
