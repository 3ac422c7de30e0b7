//! Administration under `/api/admin`; every route requires the admin role.

mod courses;
mod users;

use actix_web::web::{get, put, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/admin";

/// # Registered Routes:
///
/// *   **`GET /users`**: every user profile.
/// *   **`PUT /users/{user_id}/role`**: changes a role. Admins cannot demote themselves.
/// *   **`GET /courses`**: every course, archived included.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/users", get().to(users::list))
        .route("/users/{user_id}/role", put().to(users::set_role))
        .route("/courses", get().to(courses::process))
}
