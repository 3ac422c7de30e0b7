use crate::data::{announcements, assignments, courses, files};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::files::can_access;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::course::{Course, CourseStatus};

/// Active courses are visible to everyone; drafts and archived courses only
/// to their professor and admins.
fn visible_course(state: &AppState, user: &AuthUser, course_id: &str) -> Result<Course, ApiError> {
    let course = courses::require_course(state.store(), course_id)?;
    if course.status == CourseStatus::Active || user.is_admin() || course.professor_id == user.id {
        Ok(course)
    } else {
        Err(ApiError::NotFound("course not found".to_string()))
    }
}

/// `GET /api/courses`: every active course.
pub async fn list(state: web::Data<AppState>, _user: AuthUser) -> Result<HttpResponse, ApiError> {
    let courses = courses::active_courses(state.store())?;
    Ok(HttpResponse::Ok().json(courses))
}

pub async fn detail(
    state: web::Data<AppState>,
    user: AuthUser,
    course_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let course = visible_course(&state, &user, &course_id)?;
    Ok(HttpResponse::Ok().json(course))
}

pub async fn assignments(
    state: web::Data<AppState>,
    user: AuthUser,
    course_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let course = visible_course(&state, &user, &course_id)?;
    let assignments = assignments::assignments_for_course(state.store(), &course.id)?;
    Ok(HttpResponse::Ok().json(assignments))
}

pub async fn announcements(
    state: web::Data<AppState>,
    user: AuthUser,
    course_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let course = visible_course(&state, &user, &course_id)?;
    let announcements = announcements::announcements_for_course(state.store(), &course.id)?;
    Ok(HttpResponse::Ok().json(announcements))
}

/// Only the files the caller may download are listed.
pub async fn files(
    state: web::Data<AppState>,
    user: AuthUser,
    course_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let course = visible_course(&state, &user, &course_id)?;
    let mut visible = Vec::new();
    for file in files::files_for_course(state.store(), &course.id)? {
        if can_access(&state, &user, &course, &file)? {
            visible.push(file);
        }
    }
    Ok(HttpResponse::Ok().json(visible))
}
