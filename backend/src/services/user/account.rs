use crate::data::users;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::MessageResponse;
use log::info;

/// `DELETE /api/user/account`
///
/// Credentials go first so a half-finished deletion can never leave a
/// login that points at a missing profile.
pub async fn process(
    state: web::Data<AppState>,
    user: AuthUser,
) -> Result<HttpResponse, ApiError> {
    state.auth.remove(&user.id)?;
    users::delete_user(state.store(), &user.id)?;
    info!("deleted account {}", user.id);
    Ok(HttpResponse::Ok().json(MessageResponse::new("account deleted")))
}
