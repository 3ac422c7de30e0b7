use crate::data::users;
use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::{AuthResponse, LoginRequest};
use log::debug;

/// `POST /api/auth/login`
///
/// Verifies the credentials, stamps `lastLogin` and returns `{token, user}`.
/// Wrong email and wrong password both answer `401` with the same message.
pub async fn process(
    state: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(ApiError::bad_request("email and password are required"));
    }

    let uid = state.auth.authenticate(&payload.email, &payload.password)?;
    let user = users::record_login(state.store(), &uid)?;
    let token = state.auth.issue_token(&user.id, user.role)?;
    debug!("login for {}", user.id);
    Ok(HttpResponse::Ok().json(AuthResponse { token, user }))
}
