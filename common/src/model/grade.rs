use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One score per (student, assignment) pair. `course_id` is copied from the
/// assignment when the grade is written and never re-checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    pub id: String,
    pub student_id: String,
    pub assignment_id: String,
    pub course_id: String,
    pub score: f64,
    pub graded_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    pub grader_id: String,
}
