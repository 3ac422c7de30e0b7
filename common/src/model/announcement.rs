use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: String,
    pub course_id: String,
    pub title: String,
    pub content: String,
    pub posted_date: DateTime<Utc>,
    pub professor_id: String,
}
