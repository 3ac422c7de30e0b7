//! # Object Storage
//!
//! Course files are split in two: the bytes go to an object storage bucket,
//! the metadata goes to the `files` collection. This module covers the bucket
//! side plus the path conventions both halves agree on:
//!
//! - blobs live under `courses/{courseId}/files/{millis}_{sanitizedName}`;
//! - a `File` record references its blob either by that path or by the
//!   download URL the bucket hands out (`{base}/o/{encoded path}?alt=media`).
//!   [`storage_path_from_ref`] turns either form back into a path.

mod local;

pub use local::LocalObjectStorage;

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static UNSAFE_NAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9._-]").expect("file name pattern compiles"));

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid storage path '{0}'")]
    InvalidPath(String),

    #[error("object '{0}' not found")]
    NotFound(String),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub trait ObjectStorage: Send + Sync {
    fn put(&self, path: &str, bytes: &[u8]) -> Result<(), StorageError>;

    fn get(&self, path: &str) -> Result<Vec<u8>, StorageError>;

    fn delete(&self, path: &str) -> Result<(), StorageError>;

    /// The locator recorded as a file's `storageRef`. Nothing is served at
    /// this URL by the backend itself; clients fetch bytes through
    /// `GET /api/files/{id}/download`, which applies the access level.
    fn download_url(&self, path: &str) -> String;
}

/// Replaces anything outside `[A-Za-z0-9._-]` with `_` and drops leading dots.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned = UNSAFE_NAME_CHARS.replace_all(name.trim(), "_");
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned.to_string()
    }
}

pub fn course_file_path(course_id: &str, millis: i64, file_name: &str) -> String {
    format!(
        "courses/{}/files/{}_{}",
        course_id,
        millis,
        sanitize_file_name(file_name)
    )
}

/// Resolves a stored reference (bucket path or download URL) to a bucket path.
pub fn storage_path_from_ref(storage_ref: &str) -> String {
    let is_url = storage_ref.starts_with("http://") || storage_ref.starts_with("https://");
    if is_url {
        if let Some(start) = storage_ref.rfind("/o/") {
            let encoded = &storage_ref[start + 3..];
            let encoded = encoded.split(['?', '#']).next().unwrap_or_default();
            return percent_decode(encoded);
        }
    }
    storage_ref.trim_start_matches('/').to_string()
}

pub(crate) fn percent_encode(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for byte in path.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}

fn percent_decode(encoded: &str) -> String {
    let bytes = encoded.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let Ok(decoded) = hex::decode(&bytes[i + 1..i + 3]) {
                out.extend_from_slice(&decoded);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
