use super::{USER_ID_HEADER, USER_ROLE_HEADER};
use crate::error::ApiError;
use actix_web::dev::Payload;
use actix_web::http::header::HeaderMap;
use actix_web::{FromRequest, HttpRequest};
use common::model::user::Role;
use futures_util::future::{ready, Ready};

/// The caller as verified by the access gate.
///
/// Extracting it on a route that the gate does not protect always fails
/// with 401, since only the gate sets the identity headers.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub id: String,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// 403 unless the caller has one of `roles`.
    pub fn require(&self, roles: &[Role]) -> Result<(), ApiError> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            Err(ApiError::forbidden(format!(
                "this action is not available to the {} role",
                self.role
            )))
        }
    }

    fn from_headers(headers: &HeaderMap) -> Result<Self, ApiError> {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let id = header(USER_ID_HEADER)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ApiError::unauthorized("authentication required"))?;
        let role = header(USER_ROLE_HEADER)
            .and_then(|r| r.parse().ok())
            .ok_or_else(|| ApiError::unauthorized("authentication required"))?;
        Ok(Self { id, role })
    }
}

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Self::from_headers(req.headers()))
    }
}
