use crate::data::files::{self, FileUpload};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::managed_course;
use crate::state::AppState;
use actix_multipart::{Field, Multipart};
use actix_web::{web, HttpResponse};
use common::model::file::AccessLevel;
use futures_util::StreamExt;
use log::info;

/// `POST /api/professor/courses/{course_id}/files`
///
/// Multipart body with a `file` part and an optional `accessLevel` text part
/// (`public`, `course` or `restricted`; defaults to `course`). Bodies over the
/// configured upload limit are rejected while streaming.
pub async fn upload(
    state: web::Data<AppState>,
    user: AuthUser,
    course_id: web::Path<String>,
    mut payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let course = managed_course(&state, &user, &course_id)?;
    let limit = state.config.max_upload_bytes;

    let mut upload: Option<(String, Option<String>, Vec<u8>)> = None;
    let mut access_level = AccessLevel::default();

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| ApiError::bad_request(format!("malformed upload: {}", e)))?;
        let part = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        match part.as_deref() {
            Some("file") => {
                let file_name = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
                    .unwrap_or_default();
                let content_type = field.content_type().map(|m| m.to_string());
                let bytes = read_field(&mut field, limit).await?;
                upload = Some((file_name, content_type, bytes));
            }
            Some("accessLevel") => {
                let bytes = read_field(&mut field, 64).await?;
                let text = String::from_utf8_lossy(&bytes);
                access_level = text.parse().map_err(ApiError::bad_request)?;
            }
            _ => {}
        }
    }

    let (file_name, content_type, bytes) =
        upload.ok_or_else(|| ApiError::bad_request("missing file"))?;
    if file_name.trim().is_empty() {
        return Err(ApiError::bad_request("the uploaded file has no name"));
    }

    let file = files::upload_file(
        state.store(),
        state.storage(),
        FileUpload {
            course_id: course.id,
            professor_id: user.id,
            file_name,
            content_type,
            bytes,
            access_level,
        },
    )?;
    info!("stored {} ({} KB) for {}", file.file_name, file.size_kb, file.course_id);
    Ok(HttpResponse::Created().json(file))
}

async fn read_field(field: &mut Field, limit: usize) -> Result<Vec<u8>, ApiError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| ApiError::bad_request(format!("malformed upload: {}", e)))?;
        if bytes.len() + chunk.len() > limit {
            return Err(ApiError::bad_request(format!(
                "upload exceeds the {} byte limit",
                limit
            )));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

/// `DELETE /api/professor/files/{file_id}`
///
/// The metadata record is removed even when the blob cannot be; the response
/// says which happened.
pub async fn remove(
    state: web::Data<AppState>,
    user: AuthUser,
    file_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let file = files::require_file(state.store(), &file_id)?;
    managed_course(&state, &user, &file.course_id)?;
    let deletion = files::delete_file(state.store(), state.storage(), &file.id)?;
    Ok(HttpResponse::Ok().json(deletion))
}
