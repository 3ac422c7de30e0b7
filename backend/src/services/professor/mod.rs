//! Course management under `/api/professor`.
//!
//! Professors act on the courses they own; admins may act on any course.
//! Ownership is checked per request through [`super::managed_course`], so a
//! professor reaching for a colleague's course gets `403`.

mod announcements;
mod assignments;
mod courses;
mod files;
mod grades;

use actix_web::web::{delete, get, post, put, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/professor";

/// Configures the course management routes under `/api/professor`.
///
/// # Registered Routes:
///
/// *   **`GET /courses`**, **`POST /courses`**:
///     - **Handlers**: `courses::list`, `courses::create`
///     - **Description**: The caller's live courses (admins: every course), and course creation.
///       Titles are unique per professor among non-archived courses.
///
/// *   **`PUT /courses/{course_id}`**, **`DELETE /courses/{course_id}`**:
///     - **Handlers**: `courses::update`, `courses::archive`
///     - **Description**: Partial update, and archival. Nothing is removed on archive.
///
/// *   **`GET /courses/{course_id}/students`**:
///     - **Handler**: `courses::students`
///     - **Description**: Actively enrolled students.
///
/// *   **`POST /courses/{course_id}/assignments`**:
///     - **Handler**: `assignments::create`
///
/// *   **`GET /courses/{course_id}/grades`**, **`GET /assignments/{assignment_id}/grades`**:
///     - **Handlers**: `grades::for_course`, `grades::for_assignment`
///
/// *   **`POST /grades`**:
///     - **Handler**: `grades::submit`
///     - **Description**: Creates or overwrites the grade for a (student, assignment) pair, with
///       the caller recorded as grader. The student must be actively enrolled.
///
/// *   **`POST /courses/{course_id}/announcements`**, **`DELETE /announcements/{announcement_id}`**:
///     - **Handlers**: `announcements::post`, `announcements::remove`
///
/// *   **`POST /courses/{course_id}/files`**, **`DELETE /files/{file_id}`**:
///     - **Handlers**: `files::upload`, `files::remove`
///     - **Description**: Multipart upload of a `file` part with an optional `accessLevel` part,
///       and deletion of the blob and its record.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/courses", get().to(courses::list))
        .route("/courses", post().to(courses::create))
        .route("/courses/{course_id}", put().to(courses::update))
        .route("/courses/{course_id}", delete().to(courses::archive))
        .route("/courses/{course_id}/students", get().to(courses::students))
        .route("/courses/{course_id}/assignments", post().to(assignments::create))
        .route("/courses/{course_id}/grades", get().to(grades::for_course))
        .route("/courses/{course_id}/announcements", post().to(announcements::post))
        .route("/courses/{course_id}/files", post().to(files::upload))
        .route("/assignments/{assignment_id}/grades", get().to(grades::for_assignment))
        .route("/grades", post().to(grades::submit))
        .route("/announcements/{announcement_id}", delete().to(announcements::remove))
        .route("/files/{file_id}", delete().to(files::remove))
}
