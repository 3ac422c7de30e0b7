use crate::data::announcements;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::managed_course;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::{CreateAnnouncementRequest, MessageResponse};
use log::info;

/// `POST /api/professor/courses/{course_id}/announcements`
pub async fn post(
    state: web::Data<AppState>,
    user: AuthUser,
    course_id: web::Path<String>,
    payload: web::Json<CreateAnnouncementRequest>,
) -> Result<HttpResponse, ApiError> {
    let course = managed_course(&state, &user, &course_id)?;
    let announcement = announcements::post_announcement(
        state.store(),
        &course.id,
        &user.id,
        &payload.title,
        &payload.content,
    )?;
    info!("announcement {} posted to {}", announcement.id, course.id);
    Ok(HttpResponse::Created().json(announcement))
}

/// `DELETE /api/professor/announcements/{announcement_id}`
pub async fn remove(
    state: web::Data<AppState>,
    user: AuthUser,
    announcement_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let announcement = announcements::get_announcement(state.store(), &announcement_id)?
        .ok_or_else(|| ApiError::NotFound("announcement not found".to_string()))?;
    managed_course(&state, &user, &announcement.course_id)?;
    announcements::delete_announcement(state.store(), &announcement.id)?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("announcement deleted")))
}
