use crate::data::courses;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::user::Role;

/// `GET /api/admin/courses`: every course in any status.
pub async fn process(state: web::Data<AppState>, user: AuthUser) -> Result<HttpResponse, ApiError> {
    user.require(&[Role::Admin])?;
    let courses = courses::all_courses(state.store())?;
    Ok(HttpResponse::Ok().json(courses))
}
