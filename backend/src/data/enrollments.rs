use super::courses::get_courses_by_ids;
use super::users::get_users_by_ids;
use super::{new_id, require_text, ServiceError};
use crate::store::{self, DocumentStore};
use chrono::Utc;
use common::model::course::Course;
use common::model::enrollment::{Enrollment, EnrollmentStatus};
use common::model::user::User;
use serde_json::json;

fn active_enrollment(
    store: &dyn DocumentStore,
    student_id: &str,
    course_id: &str,
) -> Result<Option<Enrollment>, ServiceError> {
    let query = store::select::<Enrollment>()
        .eq("studentId", student_id)
        .eq("courseId", course_id)
        .eq("status", EnrollmentStatus::Active.as_str())
        .limit(1);
    Ok(store::fetch_where::<Enrollment>(store, &query)?
        .into_iter()
        .next())
}

/// Creates an active enrollment unless the pair already has one.
///
/// The duplicate check and the write are two separate store calls, so two
/// concurrent requests for the same pair can both succeed.
pub fn enroll_student(
    store: &dyn DocumentStore,
    student_id: &str,
    course_id: &str,
) -> Result<Enrollment, ServiceError> {
    let student_id = require_text(student_id, "studentId")?;
    let course_id = require_text(course_id, "courseId")?;

    if active_enrollment(store, &student_id, &course_id)?.is_some() {
        return Err(ServiceError::Conflict(
            "student is already enrolled in this course".to_string(),
        ));
    }

    let enrollment = Enrollment {
        id: new_id(),
        student_id,
        course_id,
        enrolled_date: Utc::now(),
        status: EnrollmentStatus::Active,
    };
    store::save(store, &enrollment)?;
    Ok(enrollment)
}

/// Marks the pair's active enrollment as dropped.
pub fn drop_enrollment(
    store: &dyn DocumentStore,
    student_id: &str,
    course_id: &str,
) -> Result<Enrollment, ServiceError> {
    let mut enrollment = active_enrollment(store, student_id, course_id)?
        .ok_or_else(|| ServiceError::NotFound("enrollment".to_string()))?;
    store::patch::<Enrollment>(
        store,
        &enrollment.id,
        json!({ "status": EnrollmentStatus::Dropped }),
    )?;
    enrollment.status = EnrollmentStatus::Dropped;
    Ok(enrollment)
}

pub fn is_enrolled(
    store: &dyn DocumentStore,
    student_id: &str,
    course_id: &str,
) -> Result<bool, ServiceError> {
    Ok(active_enrollment(store, student_id, course_id)?.is_some())
}

pub fn active_enrollments_for_student(
    store: &dyn DocumentStore,
    student_id: &str,
) -> Result<Vec<Enrollment>, ServiceError> {
    let query = store::select::<Enrollment>()
        .eq("studentId", student_id)
        .eq("status", EnrollmentStatus::Active.as_str());
    Ok(store::fetch_where::<Enrollment>(store, &query)?)
}

/// All enrollments of a course, or only those with `status`.
pub fn enrollments_for_course(
    store: &dyn DocumentStore,
    course_id: &str,
    status: Option<EnrollmentStatus>,
) -> Result<Vec<Enrollment>, ServiceError> {
    let mut query = store::select::<Enrollment>().eq("courseId", course_id);
    if let Some(status) = status {
        query = query.eq("status", status.as_str());
    }
    Ok(store::fetch_where::<Enrollment>(store, &query)?)
}

/// Courses the student is actively enrolled in.
pub fn courses_for_student(
    store: &dyn DocumentStore,
    student_id: &str,
) -> Result<Vec<Course>, ServiceError> {
    let course_ids: Vec<String> = active_enrollments_for_student(store, student_id)?
        .into_iter()
        .map(|e| e.course_id)
        .collect();
    get_courses_by_ids(store, &course_ids)
}

/// Students actively enrolled in the course.
pub fn students_for_course(
    store: &dyn DocumentStore,
    course_id: &str,
) -> Result<Vec<User>, ServiceError> {
    let student_ids: Vec<String> =
        enrollments_for_course(store, course_id, Some(EnrollmentStatus::Active))?
            .into_iter()
            .map(|e| e.student_id)
            .collect();
    get_users_by_ids(store, &student_ids)
}
