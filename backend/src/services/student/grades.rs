use crate::data::grades;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::user::Role;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeFilter {
    pub course_id: Option<String>,
}

/// `GET /api/student/grades[?courseId=...]`
pub async fn process(
    state: web::Data<AppState>,
    user: AuthUser,
    filter: web::Query<GradeFilter>,
) -> Result<HttpResponse, ApiError> {
    user.require(&[Role::Student])?;
    let course_id = filter.course_id.as_deref().filter(|id| !id.is_empty());
    let grades = grades::grades_for_student(state.store(), &user.id, course_id)?;
    Ok(HttpResponse::Ok().json(grades))
}
