use crate::data::assignments;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::managed_course;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::CreateAssignmentRequest;
use log::info;

/// `POST /api/professor/courses/{course_id}/assignments`
pub async fn create(
    state: web::Data<AppState>,
    user: AuthUser,
    course_id: web::Path<String>,
    payload: web::Json<CreateAssignmentRequest>,
) -> Result<HttpResponse, ApiError> {
    let course = managed_course(&state, &user, &course_id)?;
    let assignment = assignments::create_assignment(state.store(), &course.id, &payload)?;
    info!("assignment {} added to {}", assignment.id, course.id);
    Ok(HttpResponse::Created().json(assignment))
}
