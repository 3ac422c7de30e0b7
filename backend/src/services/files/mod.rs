//! File downloads under `/api/files`, plus the access rule shared with the
//! course catalogue's file listing.

mod download;

use crate::data::enrollments;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;
use actix_web::web::{get, scope};
use actix_web::Scope;
use common::model::course::Course;
use common::model::file::{AccessLevel, File};
use common::model::user::Role;

const API_PATH: &str = "/api/files";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("/{file_id}/download", get().to(download::process))
}

/// Whether `user` may see `file` of `course`.
///
/// The course's professor and admins see everything. Otherwise `public`
/// files are open to any signed-in user, `course` files to actively
/// enrolled students, and `restricted` files to nobody else.
pub(crate) fn can_access(
    state: &AppState,
    user: &AuthUser,
    course: &Course,
    file: &File,
) -> Result<bool, ApiError> {
    if user.is_admin() || course.professor_id == user.id {
        return Ok(true);
    }
    Ok(match file.access_level {
        AccessLevel::Public => true,
        AccessLevel::Course => {
            user.role == Role::Student
                && enrollments::is_enrolled(state.store(), &user.id, &course.id)?
        }
        AccessLevel::Restricted => false,
    })
}
