//! The read-only course catalogue under `/api/courses`, open to any
//! signed-in user.

mod catalogue;

use actix_web::web::{get, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/courses";

/// # Registered Routes:
///
/// *   **`GET /`**: active courses.
/// *   **`GET /{course_id}`**: one course. Drafts and archived courses are `404` unless the
///     caller owns them or is an admin.
/// *   **`GET /{course_id}/assignments`**, **`/announcements`**, **`/files`**: the course's
///     lists; files are filtered by `files::can_access`.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(catalogue::list))
        .route("/{course_id}", get().to(catalogue::detail))
        .route("/{course_id}/assignments", get().to(catalogue::assignments))
        .route("/{course_id}/announcements", get().to(catalogue::announcements))
        .route("/{course_id}/files", get().to(catalogue::files))
}
