use crate::data::users;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::UpdateProfileRequest;

/// `PUT /api/user/profile`: renames the caller and returns the profile.
pub async fn process(
    state: web::Data<AppState>,
    user: AuthUser,
    payload: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, ApiError> {
    let profile = users::update_profile(state.store(), &user.id, &payload.name)?;
    Ok(HttpResponse::Ok().json(profile))
}
