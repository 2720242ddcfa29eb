//! Upload state machine against the sea-orm store and a temp directory

use std::sync::Arc;

use async_trait::async_trait;
use folio::auth::{Actor, Operation, PermissionAccessPolicy, CREATE_FILES};
use folio::content::{FieldMap, FileEntity, FileStatus};
use folio::database::test_utils::setup_test_db;
use folio::errors::CoreResult;
use folio::files::{
    ExtensionMimeTypeGuesser, FileSystem, LocalFileSystem, TransferStatus, TransientHandle,
    UploadRequest,
};
use folio::mutations::FileUploadResolver;
use folio::outcome::Violation;
use folio::store::{EntityStore, SaveStatus, SeaOrmEntityStore};
use folio::FolioConfig;
use serde_json::json;
use tempfile::TempDir;

struct Harness {
    _root: TempDir,
    config: FolioConfig,
    store: Arc<SeaOrmEntityStore>,
    file_system: Arc<LocalFileSystem>,
    resolver: FileUploadResolver,
}

async fn harness(max_upload_size: u64) -> Harness {
    let root = TempDir::new().unwrap();
    let config = FolioConfig {
        public_dir: root.path().join("public"),
        upload_tmp_dir: root.path().join("tmp"),
        max_upload_size,
        ..FolioConfig::default()
    };
    let store = Arc::new(SeaOrmEntityStore::new(
        setup_test_db().await,
        Arc::new(PermissionAccessPolicy),
    ));
    let file_system = Arc::new(LocalFileSystem::new(&config));
    let resolver = FileUploadResolver::new(
        store.clone(),
        file_system.clone(),
        Arc::new(ExtensionMimeTypeGuesser),
        config.max_upload_size,
        config.max_filename_length,
    );

    Harness {
        _root: root,
        config,
        store,
        file_system,
        resolver,
    }
}

fn uploader() -> Actor {
    Actor::user(9).with_permissions(["access content", CREATE_FILES])
}

/// Files still waiting in the staging directory.
fn staged_files(h: &Harness) -> usize {
    std::fs::read_dir(&h.config.upload_tmp_dir)
        .map(|entries| entries.count())
        .unwrap_or(0)
}

fn public_path(h: &Harness, uri: &str) -> std::path::PathBuf {
    h.config
        .public_dir
        .join(uri.strip_prefix("public://").unwrap())
}

#[tokio::test]
async fn successful_upload_round_trips() {
    let h = harness(1024).await;
    let request = h
        .file_system
        .receive_upload("notes.txt", &b"hello world"[..])
        .await
        .unwrap();

    let outcome = h.resolver.upload(&uploader(), request).await.unwrap();

    assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
    assert!(outcome.violations.is_empty());
    let file = outcome.entity.unwrap();
    assert_eq!(file.filename, "notes.txt");
    assert_eq!(file.uri, "public://notes.txt");
    assert_eq!(file.mime_type, "text/plain");
    assert_eq!(file.size_bytes, 11);
    assert_eq!(file.owner_id, Some(9));
    assert_eq!(file.status, FileStatus::Temporary);

    let stored = EntityStore::<FileEntity>::load(h.store.as_ref(), file.id.unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.filename, file.filename);
    assert_eq!(stored.uri, file.uri);
    assert_eq!(stored.size_bytes, file.size_bytes);
    assert_eq!(stored.mime_type, file.mime_type);

    let on_disk = h.config.public_dir.join("notes.txt");
    assert_eq!(std::fs::read(on_disk).unwrap(), b"hello world");
}

#[tokio::test]
async fn colliding_names_are_renamed() {
    let h = harness(1024).await;
    let actor = uploader();

    for expected in ["public://a.txt", "public://a_0.txt", "public://a_1.txt"] {
        let request = h.file_system.receive_upload("a.txt", &b"x"[..]).await.unwrap();
        let file = h.resolver.upload(&actor, request).await.unwrap().entity.unwrap();
        assert_eq!(file.uri, expected);
        assert_eq!(file.filename, "a.txt");
    }
}

#[tokio::test]
async fn oversized_upload_names_file_and_limit() {
    let h = harness(2 * 1024 * 1024).await;
    let request = UploadRequest::new(
        "huge.iso",
        10 * 1024 * 1024,
        TransferStatus::SizeExceeded,
        TransientHandle::new("/nonexistent"),
    );

    let outcome = h.resolver.upload(&uploader(), request).await.unwrap();

    assert!(outcome.entity.is_none());
    assert_eq!(
        outcome.errors,
        vec!["The file huge.iso could not be saved because it exceeds 2 MB, the maximum allowed size for uploads."]
    );
}

#[tokio::test]
async fn transport_failures_map_to_messages() {
    let h = harness(1024).await;
    let cases = [
        (TransferStatus::FormSizeExceeded, "exceeds 1 KB"),
        (TransferStatus::Partial, "the upload did not complete"),
        (TransferStatus::NoFile, "the upload did not complete"),
        (TransferStatus::Unknown(7), "An unknown error has occurred"),
    ];

    for (status, expected) in cases {
        let request = UploadRequest::new("f.txt", 1, status, TransientHandle::new("/tmp/f.txt"));
        let outcome = h.resolver.upload(&uploader(), request).await.unwrap();
        assert!(outcome.entity.is_none());
        assert_eq!(outcome.errors.len(), 1);
        assert!(
            outcome.errors[0].contains(expected),
            "{:?} produced {}",
            status,
            outcome.errors[0]
        );
    }
}

#[tokio::test]
async fn forged_temporary_location_is_unknown_error() {
    let h = harness(1024).await;
    let forged = h.config.upload_tmp_dir.join("forged");
    std::fs::create_dir_all(&h.config.upload_tmp_dir).unwrap();
    std::fs::write(&forged, b"sneaky").unwrap();

    let request = UploadRequest::new("sneaky.txt", 6, TransferStatus::Ok, TransientHandle::new(forged.clone()));
    let outcome = h.resolver.upload(&uploader(), request).await.unwrap();

    assert_eq!(
        outcome.errors,
        vec!["The file sneaky.txt could not be saved. An unknown error has occurred."]
    );
    // Not ours to remove
    assert!(forged.exists());
}

#[tokio::test]
async fn access_is_checked_before_validation() {
    let h = harness(1024).await;
    // The name is too long, but the caller may not create files at all
    let long_name = format!("{}.txt", "n".repeat(300));
    let request = h
        .file_system
        .receive_upload(&long_name, &b"data"[..])
        .await
        .unwrap();
    let staged = request.temporary_location.clone();

    let outcome = h
        .resolver
        .upload(&Actor::user(3).with_permission("access content"), request)
        .await
        .unwrap();

    assert_eq!(
        outcome.errors,
        vec!["You do not have the necessary permissions to create entities of this type."]
    );
    assert!(!h.file_system.is_uploaded_file(&staged));
    assert!(!staged.path().exists());
    assert_eq!(staged_files(&h), 0);
}

#[tokio::test]
async fn long_filenames_are_reported_as_errors() {
    let h = harness(1024).await;
    let long_name = format!("{}.txt", "n".repeat(240));
    let request = h
        .file_system
        .receive_upload(&long_name, &b"data"[..])
        .await
        .unwrap();

    let outcome = h.resolver.upload(&uploader(), request).await.unwrap();

    assert!(outcome.entity.is_none());
    assert!(outcome.violations.is_empty());
    assert_eq!(
        outcome.errors,
        vec![format!("The specified file {} could not be uploaded.", long_name)]
    );
    assert_eq!(staged_files(&h), 0);
}

#[tokio::test]
async fn uri_taken_in_storage_is_a_violation() {
    let h = harness(1024).await;
    let mut fields = FieldMap::new();
    fields.insert("uid".to_string(), json!(9));
    fields.insert("filename".to_string(), json!("dup.txt"));
    fields.insert("uri".to_string(), json!("public://dup.txt"));
    fields.insert("filesize".to_string(), json!(1));
    fields.insert("filemime".to_string(), json!("text/plain"));
    let mut existing =
        EntityStore::<FileEntity>::create(h.store.as_ref(), "file", fields, &uploader()).unwrap();
    EntityStore::<FileEntity>::save(h.store.as_ref(), &mut existing)
        .await
        .unwrap();

    // The row exists but nothing is on disk, so the destination is not renamed
    let request = h.file_system.receive_upload("dup.txt", &b"data"[..]).await.unwrap();
    let outcome = h.resolver.upload(&uploader(), request).await.unwrap();

    assert!(outcome.entity.is_none());
    assert!(outcome.errors.is_empty());
    assert_eq!(outcome.violations.len(), 1);
    assert_eq!(outcome.violations[0].path, "uri");
    assert_eq!(outcome.violations[0].code.as_deref(), Some("NOT_UNIQUE"));
    assert_eq!(staged_files(&h), 0);
    assert!(!public_path(&h, "public://dup.txt").exists());
}

#[tokio::test]
async fn failed_move_is_reported() {
    let h = harness(1024).await;
    // A regular file where the public directory should be
    std::fs::write(&h.config.public_dir, b"not a directory").unwrap();
    let request = h.file_system.receive_upload("a.txt", &b"x"[..]).await.unwrap();

    let outcome = h.resolver.upload(&uploader(), request).await.unwrap();

    assert!(outcome.entity.is_none());
    assert_eq!(outcome.errors, vec!["Could not move uploaded file a.txt."]);
    assert_eq!(staged_files(&h), 0);
}

#[tokio::test]
async fn concurrent_uploads_with_one_name_keep_both_files() {
    let h = harness(1024).await;
    let actor = uploader();
    let first = h.file_system.receive_upload("same.txt", &b"first"[..]).await.unwrap();
    let second = h.file_system.receive_upload("same.txt", &b"second"[..]).await.unwrap();

    let (a, b) = tokio::join!(
        h.resolver.upload(&actor, first),
        h.resolver.upload(&actor, second)
    );

    let a = a.unwrap().entity.expect("first upload stored");
    let b = b.unwrap().entity.expect("second upload stored");
    let mut uris = vec![a.uri.clone(), b.uri.clone()];
    uris.sort();
    assert_eq!(uris, vec!["public://same.txt", "public://same_0.txt"]);
    assert_eq!(std::fs::read(public_path(&h, &a.uri)).unwrap(), b"first");
    assert_eq!(std::fs::read(public_path(&h, &b.uri)).unwrap(), b"second");
}

/// Delegates to the real store but reports every save as unchanged.
struct NeverCreatedStore(Arc<SeaOrmEntityStore>);

#[async_trait]
impl EntityStore<FileEntity> for NeverCreatedStore {
    async fn load(&self, id: i32) -> CoreResult<Option<FileEntity>> {
        EntityStore::<FileEntity>::load(self.0.as_ref(), id).await
    }

    fn create(&self, bundle: &str, fields: FieldMap, actor: &Actor) -> CoreResult<FileEntity> {
        EntityStore::<FileEntity>::create(self.0.as_ref(), bundle, fields, actor)
    }

    async fn save(&self, _file: &mut FileEntity) -> CoreResult<SaveStatus> {
        Ok(SaveStatus::Unchanged)
    }

    async fn delete(&self, file: &FileEntity) -> CoreResult<()> {
        EntityStore::<FileEntity>::delete(self.0.as_ref(), file).await
    }

    fn check_access(&self, file: &FileEntity, operation: Operation, actor: &Actor) -> bool {
        self.0.check_access(file, operation, actor)
    }

    async fn validate(&self, file: &FileEntity) -> CoreResult<Vec<Violation>> {
        self.0.validate(file).await
    }
}

#[tokio::test]
async fn save_that_creates_nothing_is_an_error() {
    let h = harness(1024).await;
    let resolver = FileUploadResolver::new(
        Arc::new(NeverCreatedStore(h.store.clone())),
        h.file_system.clone(),
        Arc::new(ExtensionMimeTypeGuesser),
        h.config.max_upload_size,
        h.config.max_filename_length,
    );
    let request = h.file_system.receive_upload("a.txt", &b"x"[..]).await.unwrap();

    let outcome = resolver.upload(&uploader(), request).await.unwrap();

    assert!(outcome.entity.is_none());
    assert_eq!(outcome.errors, vec!["The file a.txt could not be saved."]);
}
