use crate::data::users;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

/// `GET /api/auth/me`: the caller's profile.
pub async fn process(
    state: web::Data<AppState>,
    user: AuthUser,
) -> Result<HttpResponse, ApiError> {
    let profile = users::require_user(state.store(), &user.id)?;
    Ok(HttpResponse::Ok().json(profile))
}
