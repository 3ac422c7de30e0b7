use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Who may download a course file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    /// Any signed-in user.
    Public,
    /// The course owner, admins and actively enrolled students.
    #[default]
    Course,
    /// The course owner and admins.
    Restricted,
}

impl FromStr for AccessLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" => Ok(AccessLevel::Public),
            "course" => Ok(AccessLevel::Course),
            "restricted" => Ok(AccessLevel::Restricted),
            other => Err(format!("unknown access level '{}'", other)),
        }
    }
}

/// Metadata for a blob kept in object storage. The bytes themselves live
/// under `storage_ref`, which is either a bucket path or a download URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct File {
    pub id: String,
    pub course_id: String,
    pub professor_id: String,
    pub file_name: String,
    pub file_type: String,
    pub upload_date: DateTime<Utc>,
    pub storage_ref: String,
    #[serde(rename = "sizeKB")]
    pub size_kb: u64,
    pub access_level: AccessLevel,
    #[serde(default)]
    pub md5: String,
}

/// Outcome of deleting a file. The record is always removed once found;
/// `blob_removed` is false when object storage refused the delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDeletion {
    pub file_id: String,
    pub blob_removed: bool,
}
