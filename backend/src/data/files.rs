//! Course files: bytes in object storage, metadata in the `files` collection.
//!
//! Neither direction is transactional. An upload whose record write fails
//! leaves an orphaned blob; a delete whose blob removal fails still removes
//! the record.

use super::{new_id, require_text, ServiceError};
use crate::storage::{course_file_path, storage_path_from_ref, ObjectStorage};
use crate::store::{self, DocumentStore};
use chrono::Utc;
use common::model::file::{AccessLevel, File, FileDeletion};
use log::warn;

pub struct FileUpload {
    pub course_id: String,
    pub professor_id: String,
    pub file_name: String,
    /// Content type sent by the client, if any.
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
    pub access_level: AccessLevel,
}

pub fn upload_file(
    store: &dyn DocumentStore,
    storage: &dyn ObjectStorage,
    upload: FileUpload,
) -> Result<File, ServiceError> {
    let file_name = require_text(&upload.file_name, "fileName")?;
    let now = Utc::now();
    let path = course_file_path(&upload.course_id, now.timestamp_millis(), &file_name);

    storage.put(&path, &upload.bytes)?;

    let file_type = upload
        .content_type
        .filter(|ct| !ct.is_empty() && ct != "application/octet-stream")
        .unwrap_or_else(|| {
            mime_guess::from_path(&file_name)
                .first_or_octet_stream()
                .to_string()
        });

    let mut md5_hasher = md5::Context::new();
    md5_hasher.consume(&upload.bytes);

    let record = File {
        id: new_id(),
        course_id: upload.course_id,
        professor_id: upload.professor_id,
        file_name,
        file_type,
        upload_date: now,
        storage_ref: storage.download_url(&path),
        size_kb: size_in_kb(upload.bytes.len()),
        access_level: upload.access_level,
        md5: format!("{:x}", md5_hasher.finalize()),
    };
    store::save(store, &record)?;
    Ok(record)
}

/// Rounded up, so any non-empty file is at least 1 KB.
pub fn size_in_kb(len: usize) -> u64 {
    (len as u64).div_ceil(1024)
}

pub fn get_file(store: &dyn DocumentStore, id: &str) -> Result<Option<File>, ServiceError> {
    Ok(store::fetch::<File>(store, id)?)
}

pub fn require_file(store: &dyn DocumentStore, id: &str) -> Result<File, ServiceError> {
    get_file(store, id)?.ok_or_else(|| ServiceError::NotFound("file".to_string()))
}

pub fn files_for_course(
    store: &dyn DocumentStore,
    course_id: &str,
) -> Result<Vec<File>, ServiceError> {
    let query = store::select::<File>().eq("courseId", course_id);
    Ok(store::fetch_where::<File>(store, &query)?)
}

/// The blob behind an already-loaded record.
pub fn read_file(storage: &dyn ObjectStorage, file: &File) -> Result<Vec<u8>, ServiceError> {
    Ok(storage.get(&storage_path_from_ref(&file.storage_ref))?)
}

/// Deletes the blob, then the record. A failed blob delete is logged and
/// reported through `blob_removed`; the record is removed regardless.
pub fn delete_file(
    store: &dyn DocumentStore,
    storage: &dyn ObjectStorage,
    id: &str,
) -> Result<FileDeletion, ServiceError> {
    let file = require_file(store, id)?;
    let path = storage_path_from_ref(&file.storage_ref);

    let blob_removed = match storage.delete(&path) {
        Ok(()) => true,
        Err(e) => {
            warn!("could not delete blob {} for file {}: {}", path, id, e);
            false
        }
    };

    store::remove::<File>(store, id)?;
    Ok(FileDeletion {
        file_id: file.id,
        blob_removed,
    })
}
