use super::can_access;
use crate::data::{courses, files};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse};
use log::debug;

/// `GET /api/files/{file_id}/download`
///
/// Streams the stored bytes back with the recorded content type. A file the
/// caller may not see answers `403`.
pub async fn process(
    state: web::Data<AppState>,
    user: AuthUser,
    file_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let file = files::require_file(state.store(), &file_id)?;
    let course = courses::require_course(state.store(), &file.course_id)?;
    if !can_access(&state, &user, &course, &file)? {
        return Err(ApiError::forbidden("you do not have access to this file"));
    }

    let bytes = files::read_file(state.storage(), &file)?;
    debug!("{} downloaded {}", user.id, file.id);

    Ok(HttpResponse::Ok()
        .content_type(file.file_type.as_str())
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(file.file_name.clone())],
        })
        .body(bytes))
}
