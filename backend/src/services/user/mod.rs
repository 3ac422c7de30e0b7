//! Self-service account management under `/api/user`.

mod account;
mod password;
mod profile;

use actix_web::web::{delete, put, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/user";

/// Configures the self-service routes under `/api/user`.
///
/// # Registered Routes:
///
/// *   **`PUT /profile`**:
///     - **Handler**: `profile::process`
///     - **Description**: Renames the caller and returns the updated user.
///
/// *   **`PUT /password`**:
///     - **Handler**: `password::process`
///     - **Description**: Replaces the password after checking `currentPassword`. A wrong current
///       password is `403`; a missing or short new one is `400`.
///
/// *   **`DELETE /account`**:
///     - **Handler**: `account::process`
///     - **Description**: Removes the caller's credentials and profile. Enrollments, grades and
///       courses are left in place.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/profile", put().to(profile::process))
        .route("/password", put().to(password::process))
        .route("/account", delete().to(account::process))
}
