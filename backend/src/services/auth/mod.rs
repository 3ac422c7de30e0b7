//! Account entry points: `POST /signup`, `POST /login`, `GET /me`.
//!
//! Sign-up and login are public; `/me` sits under a protected prefix, so the
//! access gate has verified the token before the handler runs.

mod login;
mod me;
mod signup;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/auth";

/// Configures the account entry points under `/api/auth`.
///
/// # Registered Routes:
///
/// *   **`POST /signup`**:
///     - **Handler**: `signup::process`
///     - **Description**: Registers credentials and a profile for `{name, email, password, role?}`.
///       Only the student and professor roles may be chosen. Answers `201` with `{token, user}`,
///       or `409` when the email is already registered.
///
/// *   **`POST /login`**:
///     - **Handler**: `login::process`
///     - **Description**: Checks the credentials, stamps `lastLogin` and answers `{token, user}`.
///       Wrong credentials are `401`.
///
/// *   **`GET /me`**:
///     - **Handler**: `me::process`
///     - **Description**: The caller's stored profile.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/signup", post().to(signup::process))
        .route("/login", post().to(login::process))
        .route("/me", get().to(me::process))
}

/// Loose shape check: an `@` and a dot somewhere. Deliverability is not
/// verified.
pub(crate) fn looks_like_email(email: &str) -> bool {
    email.contains('@') && email.contains('.')
}
