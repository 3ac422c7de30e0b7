//! # Course Data Service
//!
//! One stateless function per use case, each wrapping a single filtered query
//! or a single write against the document store and reshaping the result into
//! `common::model` records. Nothing here caches, retries or locks: store and
//! storage failures propagate to the caller unchanged, and check-then-write
//! sequences (duplicate enrollment, grade upsert) are not atomic.

pub mod announcements;
pub mod assignments;
pub mod batching;
pub mod courses;
pub mod dashboard;
pub mod enrollments;
pub mod files;
pub mod grades;
pub mod seed;
pub mod users;

use crate::auth::AuthError;
use crate::storage::StorageError;
use crate::store::StoreError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Invalid(String),
}

pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub(crate) fn require_text(value: &str, field: &str) -> Result<String, ServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ServiceError::Invalid(format!("{} is required", field)))
    } else {
        Ok(trimmed.to_string())
    }
}
