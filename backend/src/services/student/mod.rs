//! A student's own view of the system under `/api/student`. Every route
//! here answers `403` for professors and admins.

mod announcements;
mod assignments;
mod courses;
mod grades;

use actix_web::web::{delete, get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/student";

/// Configures the student routes under `/api/student`.
///
/// # Registered Routes:
///
/// *   **`GET /courses`**:
///     - **Handler**: `courses::list`
///     - **Description**: Courses the caller is actively enrolled in.
///
/// *   **`POST /courses`**:
///     - **Handler**: `courses::enroll`
///     - **Description**: Enrolls the caller in `{courseId}`. Unknown or non-active courses are
///       `404`; an existing active enrollment is `409`.
///
/// *   **`DELETE /courses/{course_id}`**:
///     - **Handler**: `courses::leave`
///     - **Description**: Marks the caller's active enrollment as dropped.
///
/// *   **`GET /assignments`**, **`GET /grades`**, **`GET /announcements`**:
///     - **Handlers**: `assignments::process`, `grades::process`, `announcements::process`
///     - **Description**: Work, grades and news across the caller's enrolled courses. Grades
///       accept an optional `courseId` query filter.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/courses", get().to(courses::list))
        .route("/courses", post().to(courses::enroll))
        .route("/courses/{course_id}", delete().to(courses::leave))
        .route("/assignments", get().to(assignments::process))
        .route("/grades", get().to(grades::process))
        .route("/announcements", get().to(announcements::process))
}
