use super::looks_like_email;
use crate::auth::{normalize_email, MIN_PASSWORD_LEN};
use crate::data::users;
use crate::error::ApiError;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::user::Role;
use common::requests::{AuthResponse, SignupRequest};
use log::{info, warn};

/// `POST /api/auth/signup`
///
/// - `201 Created` with `{token, user}`.
/// - `400` for a missing name, malformed email or short password.
/// - `403` when asking for an admin account.
/// - `409` when the email is already registered.
pub async fn process(
    state: web::Data<AppState>,
    payload: web::Json<SignupRequest>,
) -> Result<HttpResponse, ApiError> {
    let name = payload.name.trim();
    let email = normalize_email(&payload.email);
    if name.is_empty() {
        return Err(ApiError::bad_request("name is required"));
    }
    if !looks_like_email(&email) {
        return Err(ApiError::bad_request("a valid email is required"));
    }
    if payload.password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::bad_request(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    let role = match payload.role.unwrap_or_default() {
        Role::Admin => return Err(ApiError::forbidden("admin accounts cannot be self-registered")),
        role => role,
    };

    let uid = state.auth.register(&email, &payload.password)?;
    let user = match users::create_user(state.store(), &uid, name, &email, role) {
        Ok(user) => user,
        Err(e) => {
            if let Err(cleanup) = state.auth.remove(&uid) {
                warn!("orphaned credentials {} after failed signup: {}", uid, cleanup);
            }
            return Err(e.into());
        }
    };

    let token = state.auth.issue_token(&user.id, user.role)?;
    info!("registered {} account {}", user.role, user.id);
    Ok(HttpResponse::Created().json(AuthResponse { token, user }))
}
