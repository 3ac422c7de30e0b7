use crate::data::{announcements, enrollments};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::user::Role;

/// `GET /api/student/announcements`: newest first across enrolled courses.
pub async fn process(
    state: web::Data<AppState>,
    user: AuthUser,
) -> Result<HttpResponse, ApiError> {
    user.require(&[Role::Student])?;
    let course_ids: Vec<String> = enrollments::active_enrollments_for_student(state.store(), &user.id)?
        .into_iter()
        .map(|e| e.course_id)
        .collect();
    let mut announcements = announcements::announcements_for_courses(state.store(), &course_ids)?;
    announcements.sort_by(|a, b| b.posted_date.cmp(&a.posted_date));
    Ok(HttpResponse::Ok().json(announcements))
}
