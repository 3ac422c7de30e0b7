use crate::data::grades::{self, GradeSubmission};
use crate::data::{assignments, enrollments};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::managed_course;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::SubmitGradeRequest;
use log::info;

/// `POST /api/professor/grades`
///
/// Grades are keyed by (student, assignment): a second submission replaces
/// the score and feedback of the first. The course comes from the
/// assignment, and the grader is always the caller.
pub async fn submit(
    state: web::Data<AppState>,
    user: AuthUser,
    payload: web::Json<SubmitGradeRequest>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();
    if payload.assignment_id.trim().is_empty() || payload.student_id.trim().is_empty() {
        return Err(ApiError::bad_request("studentId and assignmentId are required"));
    }

    let assignment = assignments::require_assignment(state.store(), &payload.assignment_id)?;
    let course = managed_course(&state, &user, &assignment.course_id)?;
    if !enrollments::is_enrolled(state.store(), &payload.student_id, &course.id)? {
        return Err(ApiError::bad_request("student is not enrolled in this course"));
    }

    let grade = grades::submit_grade(
        state.store(),
        GradeSubmission {
            student_id: payload.student_id,
            assignment_id: assignment.id,
            course_id: course.id,
            score: payload.score,
            feedback: payload.feedback,
            grader_id: user.id,
        },
    )?;
    info!("graded {} for {}", grade.assignment_id, grade.student_id);
    Ok(HttpResponse::Ok().json(grade))
}

/// `GET /api/professor/assignments/{assignment_id}/grades`
pub async fn for_assignment(
    state: web::Data<AppState>,
    user: AuthUser,
    assignment_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let assignment = assignments::require_assignment(state.store(), &assignment_id)?;
    managed_course(&state, &user, &assignment.course_id)?;
    let grades = grades::grades_for_assignment(state.store(), &assignment.id)?;
    Ok(HttpResponse::Ok().json(grades))
}

/// `GET /api/professor/courses/{course_id}/grades`
pub async fn for_course(
    state: web::Data<AppState>,
    user: AuthUser,
    course_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let course = managed_course(&state, &user, &course_id)?;
    let grades = grades::grades_for_course(state.store(), &course.id)?;
    Ok(HttpResponse::Ok().json(grades))
}
