//! What each role sees on its landing page, assembled from the other data
//! functions. Dispatch is a single match on [`Role`].

use super::announcements::announcements_for_courses;
use super::assignments::assignments_for_courses;
use super::courses::{all_courses, courses_for_professor};
use super::enrollments::{courses_for_student, enrollments_for_course};
use super::grades::grades_for_student;
use super::users::list_users;
use super::ServiceError;
use crate::store::DocumentStore;
use chrono::{DateTime, Utc};
use common::model::announcement::Announcement;
use common::model::dashboard::{
    AdminDashboard, CourseSummary, Dashboard, ProfessorDashboard, StudentDashboard,
};
use common::model::enrollment::EnrollmentStatus;
use common::model::user::{Role, User};
use std::collections::HashSet;

pub const RECENT_LIMIT: usize = 10;

pub fn dashboard_for(store: &dyn DocumentStore, user: &User) -> Result<Dashboard, ServiceError> {
    dashboard_at(store, user, Utc::now())
}

pub fn dashboard_at(
    store: &dyn DocumentStore,
    user: &User,
    now: DateTime<Utc>,
) -> Result<Dashboard, ServiceError> {
    match user.role {
        Role::Student => student_dashboard(store, &user.id, now).map(Dashboard::Student),
        Role::Professor => professor_dashboard(store, &user.id).map(Dashboard::Professor),
        Role::Admin => admin_dashboard(store).map(Dashboard::Admin),
    }
}

fn student_dashboard(
    store: &dyn DocumentStore,
    student_id: &str,
    now: DateTime<Utc>,
) -> Result<StudentDashboard, ServiceError> {
    let courses = courses_for_student(store, student_id)?;
    let course_ids: Vec<String> = courses.iter().map(|c| c.id.clone()).collect();

    let mut upcoming_assignments: Vec<_> = assignments_for_courses(store, &course_ids)?
        .into_iter()
        .filter(|a| a.due_date >= now)
        .collect();
    upcoming_assignments.sort_by_key(|a| a.due_date);
    upcoming_assignments.truncate(RECENT_LIMIT);

    let mut recent_grades = grades_for_student(store, student_id, None)?;
    recent_grades.sort_by(|a, b| b.graded_date.cmp(&a.graded_date));
    recent_grades.truncate(RECENT_LIMIT);

    Ok(StudentDashboard {
        courses,
        upcoming_assignments,
        recent_grades,
        recent_announcements: newest_announcements(store, &course_ids)?,
    })
}

fn professor_dashboard(
    store: &dyn DocumentStore,
    professor_id: &str,
) -> Result<ProfessorDashboard, ServiceError> {
    let mut students = HashSet::new();
    let mut summaries = Vec::new();

    for course in courses_for_professor(store, professor_id)? {
        let enrolled = enrollments_for_course(store, &course.id, Some(EnrollmentStatus::Active))?;
        students.extend(enrolled.iter().map(|e| e.student_id.clone()));
        summaries.push(CourseSummary {
            course,
            active_students: enrolled.len(),
        });
    }

    let course_ids: Vec<String> = summaries.iter().map(|s| s.course.id.clone()).collect();
    Ok(ProfessorDashboard {
        courses: summaries,
        total_students: students.len(),
        recent_announcements: newest_announcements(store, &course_ids)?,
    })
}

fn admin_dashboard(store: &dyn DocumentStore) -> Result<AdminDashboard, ServiceError> {
    let mut dashboard = AdminDashboard::default();
    for user in list_users(store)? {
        match user.role {
            Role::Student => dashboard.students += 1,
            Role::Professor => dashboard.professors += 1,
            Role::Admin => dashboard.admins += 1,
        }
    }
    for course in all_courses(store)? {
        dashboard.count_course(course.status);
    }
    Ok(dashboard)
}

fn newest_announcements(
    store: &dyn DocumentStore,
    course_ids: &[String],
) -> Result<Vec<Announcement>, ServiceError> {
    let mut announcements = announcements_for_courses(store, course_ids)?;
    announcements.sort_by(|a, b| b.posted_date.cmp(&a.posted_date));
    announcements.truncate(RECENT_LIMIT);
    Ok(announcements)
}
