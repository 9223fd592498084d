//! Object storage tests: local bucket layout and staged uploads.

use payreq_core::{
    config::StorageConfig,
    error::GenError,
    storage::{LocalObjectStorage, MemoryObjectStorage, ObjectStorage, ObjectUploader},
};
use std::fs;

fn local(root: &std::path::Path, folder: Option<&str>) -> LocalObjectStorage {
    LocalObjectStorage::from_config(&StorageConfig {
        root_dir: root.join("bucket"),
        upload_folder: folder.map(str::to_string),
        base_url: "file://bucket/".into(),
    })
    .unwrap()
}

#[test]
fn local_upload_lands_under_the_folder() {
    let dir = tempfile::tempdir().unwrap();
    let storage = local(dir.path(), Some("exports"));

    let uploader = ObjectUploader::new(
        &storage,
        Some(dir.path()),
        "REQ-1-Payment_CS_20261101to20261130.csv",
        b"9,1,0\n",
        "text/csv",
    )
    .unwrap();
    assert_eq!(
        uploader.formatted_object_name(),
        "exports/REQ-1-Payment_CS_20261101to20261130.csv"
    );
    assert_eq!(
        uploader.download_url(),
        "file://bucket/exports/REQ-1-Payment_CS_20261101to20261130.csv"
    );
    uploader.upload().unwrap();
    uploader.close().unwrap();

    let stored = dir
        .path()
        .join("bucket/exports/REQ-1-Payment_CS_20261101to20261130.csv");
    assert_eq!(fs::read(stored).unwrap(), b"9,1,0\n");
    assert!(storage
        .object_exists("exports/REQ-1-Payment_CS_20261101to20261130.csv")
        .unwrap());
}

#[test]
fn local_download_copies_the_object() {
    let dir = tempfile::tempdir().unwrap();
    let storage = local(dir.path(), None);
    let uploader = ObjectUploader::new(&storage, None, "a.txt", b"payload", "text/plain").unwrap();
    uploader.upload().unwrap();
    uploader.close().unwrap();

    let dest = dir.path().join("copy.txt");
    storage.download_file("a.txt", &dest).unwrap();
    assert_eq!(fs::read_to_string(dest).unwrap(), "payload");

    let missing = storage.download_file("b.txt", &dir.path().join("b.txt"));
    assert!(matches!(missing, Err(GenError::Storage(_))));
}

#[test]
fn local_rejects_escaping_object_names() {
    let dir = tempfile::tempdir().unwrap();
    let storage = local(dir.path(), None);
    assert!(storage.object_exists("../outside.csv").is_err());
    assert!(storage.object_exists("a//b.csv").is_err());
    assert!(!storage.object_exists("absent.csv").unwrap());
}

#[test]
fn temp_file_is_removed_on_close_even_after_failed_upload() {
    let storage = MemoryObjectStorage::new("https://storage.test");
    storage.set_fail_uploads(true);

    let uploader = ObjectUploader::new(&storage, None, "a.csv", b"x", "text/csv").unwrap();
    let temp = uploader.temp_path().unwrap().to_path_buf();
    assert!(temp.exists());

    assert!(uploader.upload().is_err());
    uploader.close().unwrap();
    assert!(!temp.exists());
    assert!(storage.object_names().is_empty());
}

#[test]
fn memory_download_writes_stored_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let storage = MemoryObjectStorage::new("https://storage.test");
    let uploader = ObjectUploader::new(&storage, None, "a.csv", b"abc", "text/csv").unwrap();
    uploader.upload().unwrap();
    uploader.close().unwrap();

    let dest = dir.path().join("a.csv");
    storage.download_file("a.csv", &dest).unwrap();
    assert_eq!(fs::read(dest).unwrap(), b"abc");
    assert_eq!(storage.download_url("a.csv"), "https://storage.test/a.csv");
}
