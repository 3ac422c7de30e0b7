use crate::auth::MIN_PASSWORD_LEN;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::{ChangePasswordRequest, MessageResponse};
use log::info;

/// `PUT /api/user/password`
///
/// The current password is re-verified first; a mismatch answers `403`.
pub async fn process(
    state: web::Data<AppState>,
    user: AuthUser,
    payload: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse, ApiError> {
    if payload.current_password.is_empty() || payload.new_password.is_empty() {
        return Err(ApiError::bad_request(
            "currentPassword and newPassword are required",
        ));
    }
    if payload.new_password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::bad_request(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    state
        .auth
        .change_password(&user.id, &payload.current_password, &payload.new_password)?;
    info!("password changed for {}", user.id);
    Ok(HttpResponse::Ok().json(MessageResponse::new("password updated")))
}
