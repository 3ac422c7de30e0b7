//! HTTP-facing error type. Every route returns `Result<_, ApiError>`, which
//! makes the route boundary the single place where failures become status
//! codes. Upstream failures are logged in full and answered with a generic
//! message.

use crate::auth::AuthError;
use crate::data::ServiceError;
use crate::storage::StorageError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use common::requests::MessageResponse;
use log::error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("internal server error")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::Internal(detail) = self {
            error!("request failed: {}", detail);
        }
        HttpResponse::build(self.status_code()).json(MessageResponse::new(self.to_string()))
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(what) => ApiError::NotFound(format!("{} not found", what)),
            ServiceError::Conflict(message) => ApiError::Conflict(message),
            ServiceError::Invalid(message) => ApiError::BadRequest(message),
            ServiceError::Auth(e) => e.into(),
            ServiceError::Storage(StorageError::NotFound(path)) => {
                ApiError::NotFound(format!("stored object {} not found", path))
            }
            ServiceError::Storage(e) => ApiError::Internal(e.to_string()),
            ServiceError::Store(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::EmailTaken => ApiError::Conflict(err.to_string()),
            AuthError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            AuthError::WrongPassword => ApiError::Forbidden(err.to_string()),
            AuthError::UnknownUser(_) => ApiError::NotFound("user not found".to_string()),
            AuthError::MalformedToken | AuthError::BadSignature | AuthError::Expired => {
                ApiError::Unauthorized("invalid or expired token".to_string())
            }
            AuthError::SigningKey
            | AuthError::Encoding(_)
            | AuthError::Hashing(_)
            | AuthError::Store(_) => ApiError::Internal(err.to_string()),
        }
    }
}
