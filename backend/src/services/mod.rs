//! HTTP routes. Each sub-module owns one path prefix and exposes a
//! `configure_routes()` scope, mirroring the API surface:
//!
//! - `auth`: `/api/auth` sign-up, login and the current profile;
//! - `user`: `/api/user` profile, password and account deletion;
//! - `student`: `/api/student` enrollments and the student's own data;
//! - `professor`: `/api/professor` course management, grading, files;
//! - `courses`: `/api/courses` the catalogue any signed-in user can browse;
//! - `files`: `/api/files` downloads, gated by each file's access level;
//! - `admin`: `/api/admin` user roles and the full course list;
//! - `dashboard`: `/api/dashboard` the role-specific landing data.
//!
//! Handlers return `Result<HttpResponse, ApiError>`; identity comes from the
//! [`AuthUser`] extractor, which only the access gate can satisfy.

pub mod admin;
pub mod auth;
pub mod courses;
pub mod dashboard;
pub mod files;
pub mod professor;
pub mod student;
pub mod user;

use crate::data;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;
use actix_web::web;
use common::model::course::Course;
use common::model::user::Role;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::configure_routes())
        .service(user::configure_routes())
        .service(student::configure_routes())
        .service(professor::configure_routes())
        .service(courses::configure_routes())
        .service(files::configure_routes())
        .service(admin::configure_routes())
        .service(dashboard::configure_routes());
}

/// Loads a course the caller may manage: its own professor, or any admin.
pub(crate) fn managed_course(
    state: &AppState,
    user: &AuthUser,
    course_id: &str,
) -> Result<Course, ApiError> {
    user.require(&[Role::Professor, Role::Admin])?;
    let course = data::courses::require_course(state.store(), course_id)?;
    if user.is_admin() || course.professor_id == user.id {
        Ok(course)
    } else {
        Err(ApiError::forbidden("you do not manage this course"))
    }
}
