use crate::data::{assignments, enrollments};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::user::Role;

/// `GET /api/student/assignments`: every assignment across the student's
/// active courses, soonest due first.
pub async fn process(
    state: web::Data<AppState>,
    user: AuthUser,
) -> Result<HttpResponse, ApiError> {
    user.require(&[Role::Student])?;
    let course_ids: Vec<String> = enrollments::active_enrollments_for_student(state.store(), &user.id)?
        .into_iter()
        .map(|e| e.course_id)
        .collect();
    let mut assignments = assignments::assignments_for_courses(state.store(), &course_ids)?;
    assignments.sort_by_key(|a| a.due_date);
    Ok(HttpResponse::Ok().json(assignments))
}
