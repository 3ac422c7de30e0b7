use crate::data::{dashboard, users};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;
use actix_web::{web, HttpResponse};

/// `GET /api/dashboard`
///
/// The shape depends on the stored role, not the role in the token, so a
/// freshly promoted user sees the new dashboard straight away.
pub async fn process(
    state: web::Data<AppState>,
    user: AuthUser,
) -> Result<HttpResponse, ApiError> {
    let profile = users::require_user(state.store(), &user.id)?;
    let dashboard = dashboard::dashboard_for(state.store(), &profile)?;
    Ok(HttpResponse::Ok().json(dashboard))
}
