use crate::data::{courses, enrollments};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::course::CourseStatus;
use common::model::user::Role;
use common::requests::EnrollRequest;
use log::info;

/// `GET /api/student/courses`: courses with an active enrollment.
pub async fn list(
    state: web::Data<AppState>,
    user: AuthUser,
) -> Result<HttpResponse, ApiError> {
    user.require(&[Role::Student])?;
    let courses = enrollments::courses_for_student(state.store(), &user.id)?;
    Ok(HttpResponse::Ok().json(courses))
}

/// `POST /api/student/courses`
///
/// Only active courses accept enrollments; drafts and archived courses look
/// the same as unknown ones. A second active enrollment is a `409`.
pub async fn enroll(
    state: web::Data<AppState>,
    user: AuthUser,
    payload: web::Json<EnrollRequest>,
) -> Result<HttpResponse, ApiError> {
    user.require(&[Role::Student])?;
    if payload.course_id.trim().is_empty() {
        return Err(ApiError::bad_request("courseId is required"));
    }

    match courses::get_course(state.store(), &payload.course_id)? {
        Some(course) if course.status == CourseStatus::Active => {}
        _ => return Err(ApiError::NotFound("course not found".to_string())),
    }

    let enrollment = enrollments::enroll_student(state.store(), &user.id, &payload.course_id)?;
    info!("{} enrolled in {}", user.id, enrollment.course_id);
    Ok(HttpResponse::Created().json(enrollment))
}

/// `DELETE /api/student/courses/{course_id}`: marks the enrollment dropped.
pub async fn leave(
    state: web::Data<AppState>,
    user: AuthUser,
    course_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    user.require(&[Role::Student])?;
    let enrollment = enrollments::drop_enrollment(state.store(), &user.id, &course_id)?;
    info!("{} dropped {}", user.id, enrollment.course_id);
    Ok(HttpResponse::Ok().json(enrollment))
}
