//! Per-role dashboard payloads served by `GET /api/dashboard`.

use crate::model::announcement::Announcement;
use crate::model::assignment::Assignment;
use crate::model::course::{Course, CourseStatus};
use crate::model::grade::Grade;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Dashboard {
    Student(StudentDashboard),
    Professor(ProfessorDashboard),
    Admin(AdminDashboard),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDashboard {
    pub courses: Vec<Course>,
    pub upcoming_assignments: Vec<Assignment>,
    pub recent_grades: Vec<Grade>,
    pub recent_announcements: Vec<Announcement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    pub course: Course,
    pub active_students: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfessorDashboard {
    pub courses: Vec<CourseSummary>,
    pub total_students: usize,
    pub recent_announcements: Vec<Announcement>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    pub students: usize,
    pub professors: usize,
    pub admins: usize,
    pub active_courses: usize,
    pub archived_courses: usize,
    pub draft_courses: usize,
}

impl AdminDashboard {
    pub fn count_course(&mut self, status: CourseStatus) {
        match status {
            CourseStatus::Active => self.active_courses += 1,
            CourseStatus::Archived => self.archived_courses += 1,
            CourseStatus::Draft => self.draft_courses += 1,
        }
    }
}
