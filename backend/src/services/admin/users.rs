use crate::data::users;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::user::Role;
use common::requests::UpdateRoleRequest;
use log::info;

/// `GET /api/admin/users`: every profile, sorted by name.
pub async fn list(state: web::Data<AppState>, user: AuthUser) -> Result<HttpResponse, ApiError> {
    user.require(&[Role::Admin])?;
    let users = users::list_users(state.store())?;
    Ok(HttpResponse::Ok().json(users))
}

/// `PUT /api/admin/users/{user_id}/role`
///
/// Tokens already issued keep the old role until they expire.
pub async fn set_role(
    state: web::Data<AppState>,
    user: AuthUser,
    user_id: web::Path<String>,
    payload: web::Json<UpdateRoleRequest>,
) -> Result<HttpResponse, ApiError> {
    user.require(&[Role::Admin])?;
    if *user_id == user.id && payload.role != Role::Admin {
        return Err(ApiError::bad_request("admins cannot demote themselves"));
    }
    let updated = users::set_role(state.store(), &user_id, payload.role)?;
    info!("{} set role of {} to {}", user.id, updated.id, updated.role);
    Ok(HttpResponse::Ok().json(updated))
}
