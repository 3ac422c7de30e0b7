use crate::data::courses::{self, NewCourse};
use crate::data::{enrollments, users};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::managed_course;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::user::Role;
use common::requests::{CreateCourseRequest, UpdateCourseRequest};
use log::info;

/// `GET /api/professor/courses`
///
/// A professor sees their own non-archived courses; an admin sees all.
pub async fn list(
    state: web::Data<AppState>,
    user: AuthUser,
) -> Result<HttpResponse, ApiError> {
    user.require(&[Role::Professor, Role::Admin])?;
    let courses = if user.is_admin() {
        courses::all_courses(state.store())?
    } else {
        courses::courses_for_professor(state.store(), &user.id)?
    };
    Ok(HttpResponse::Ok().json(courses))
}

/// `POST /api/professor/courses`
///
/// The caller owns the new course unless an admin names another professor in
/// `professorId`. Status defaults to active.
pub async fn create(
    state: web::Data<AppState>,
    user: AuthUser,
    payload: web::Json<CreateCourseRequest>,
) -> Result<HttpResponse, ApiError> {
    user.require(&[Role::Professor, Role::Admin])?;
    let payload = payload.into_inner();

    let professor_id = match payload.professor_id.filter(|id| !id.is_empty()) {
        Some(id) if id != user.id => {
            if !user.is_admin() {
                return Err(ApiError::forbidden(
                    "only admins may create courses for another professor",
                ));
            }
            let owner = users::get_user(state.store(), &id)?
                .ok_or_else(|| ApiError::bad_request("professorId does not name a user"))?;
            if !owner.role.can_teach() {
                return Err(ApiError::bad_request(
                    "professorId must name a professor or admin",
                ));
            }
            id
        }
        _ => user.id.clone(),
    };

    let course = courses::create_course(
        state.store(),
        NewCourse {
            title: payload.title,
            description: payload.description,
            professor_id,
            status: payload.status.unwrap_or_default(),
        },
    )?;
    info!("{} created course {}", user.id, course.id);
    Ok(HttpResponse::Created().json(course))
}

/// `PUT /api/professor/courses/{course_id}`: partial update.
pub async fn update(
    state: web::Data<AppState>,
    user: AuthUser,
    course_id: web::Path<String>,
    payload: web::Json<UpdateCourseRequest>,
) -> Result<HttpResponse, ApiError> {
    let course = managed_course(&state, &user, &course_id)?;
    let course = courses::update_course(state.store(), &course.id, &payload)?;
    Ok(HttpResponse::Ok().json(course))
}

/// `DELETE /api/professor/courses/{course_id}`
///
/// Courses are archived, never removed; enrollments and grades stay intact.
pub async fn archive(
    state: web::Data<AppState>,
    user: AuthUser,
    course_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let course = managed_course(&state, &user, &course_id)?;
    let course = courses::archive_course(state.store(), &course.id)?;
    info!("{} archived course {}", user.id, course.id);
    Ok(HttpResponse::Ok().json(course))
}

/// `GET /api/professor/courses/{course_id}/students`: actively enrolled students.
pub async fn students(
    state: web::Data<AppState>,
    user: AuthUser,
    course_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let course = managed_course(&state, &user, &course_id)?;
    let students = enrollments::students_for_course(state.store(), &course.id)?;
    Ok(HttpResponse::Ok().json(students))
}
