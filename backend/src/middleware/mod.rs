//! # Access-Token Middleware
//!
//! Runs once per request, before routing, in this order:
//!
//! 1. drops any client-supplied identity headers;
//! 2. outside development mode, rejects state-changing requests (POST, PUT,
//!    PATCH, DELETE) whose `Origin` and `Referer` are missing or point at
//!    different origins (403);
//! 3. for paths under a protected prefix, requires a bearer token that the
//!    identity provider accepts (401);
//! 4. forwards the request, with `X-User-ID` / `X-User-Role` set when a
//!    token was verified.
//!
//! The fixed security headers are attached to every response, rejections
//! included. A rejected request never reaches a handler.

mod identity;

pub use identity::AuthUser;

use crate::auth::TokenClaims;
use crate::error::ApiError;
use crate::state::AppState;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, ORIGIN, REFERER};
use actix_web::http::Method;
use actix_web::middleware::Next;
use actix_web::{web, ResponseError};
use log::{debug, warn};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

const SECURITY_HEADERS: [(&str, &str); 5] = [
    ("x-dns-prefetch-control", "on"),
    (
        "strict-transport-security",
        "max-age=63072000; includeSubDomains; preload",
    ),
    ("x-frame-options", "SAMEORIGIN"),
    ("x-content-type-options", "nosniff"),
    ("referrer-policy", "origin-when-cross-origin"),
];

pub async fn access_gate(
    mut req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    req.headers_mut().remove(USER_ID_HEADER);
    req.headers_mut().remove(USER_ROLE_HEADER);

    let verdict = match req.app_data::<web::Data<AppState>>() {
        Some(state) => check_request(state, &req),
        None => Err(ApiError::Internal(
            "application state is not registered".to_string(),
        )),
    };

    match verdict.and_then(identity_headers) {
        Ok(headers) => {
            for (name, value) in headers {
                req.headers_mut().insert(name, value);
            }
        }
        Err(rejection) => {
            let mut res = req.into_response(rejection.error_response());
            attach_security_headers(res.headers_mut());
            return Ok(res.map_into_right_body());
        }
    }

    let mut res = next.call(req).await?;
    attach_security_headers(res.headers_mut());
    Ok(res.map_into_left_body())
}

/// Decides whether the request may proceed, returning the verified claims
/// for protected paths.
fn check_request(state: &AppState, req: &ServiceRequest) -> Result<Option<TokenClaims>, ApiError> {
    if !state.config.is_development()
        && is_state_changing(req.method())
        && !same_origin(req.headers())
    {
        warn!(
            "rejected cross-origin {} {}",
            req.method(),
            req.path()
        );
        return Err(ApiError::forbidden("cross-origin request rejected"));
    }

    if !is_protected(&state.config.protected_prefixes, req.path()) {
        return Ok(None);
    }

    let token = bearer_token(req.headers())
        .ok_or_else(|| ApiError::unauthorized("missing or malformed authorization header"))?;
    let claims = state.auth.verify_token(token).map_err(|e| {
        debug!("token rejected for {}: {}", req.path(), e);
        ApiError::unauthorized("invalid or expired token")
    })?;
    Ok(Some(claims))
}

fn identity_headers(
    claims: Option<TokenClaims>,
) -> Result<Vec<(HeaderName, HeaderValue)>, ApiError> {
    let Some(claims) = claims else {
        return Ok(Vec::new());
    };
    let user_id = HeaderValue::from_str(&claims.sub)
        .map_err(|_| ApiError::unauthorized("invalid or expired token"))?;
    Ok(vec![
        (HeaderName::from_static(USER_ID_HEADER), user_id),
        (
            HeaderName::from_static(USER_ROLE_HEADER),
            HeaderValue::from_static(claims.role.as_str()),
        ),
    ])
}

fn attach_security_headers(headers: &mut HeaderMap) {
    for (name, value) in SECURITY_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
}

fn is_state_changing(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

pub fn is_protected(prefixes: &[String], path: &str) -> bool {
    prefixes.iter().any(|prefix| {
        let prefix = prefix.trim_end_matches('/');
        path == prefix
            || path
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/'))
    })
}

/// `Origin` must be present and equal to the origin of `Referer`.
fn same_origin(headers: &HeaderMap) -> bool {
    let origin = headers.get(ORIGIN).and_then(|v| v.to_str().ok());
    let referer = headers.get(REFERER).and_then(|v| v.to_str().ok());
    match (origin.and_then(origin_of), referer.and_then(origin_of)) {
        (Some(origin), Some(referer)) => origin == referer,
        _ => false,
    }
}

/// `scheme://host[:port]`, lowercased, or `None` for anything that is not an
/// absolute URL (including the literal `null` origin).
pub fn origin_of(url: &str) -> Option<String> {
    let (scheme, rest) = url.trim().split_once("://")?;
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if scheme.is_empty() || authority.is_empty() {
        return None;
    }
    Some(format!(
        "{}://{}",
        scheme.to_ascii_lowercase(),
        authority.to_ascii_lowercase()
    ))
}

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    let well_formed = scheme.eq_ignore_ascii_case("bearer")
        && !token.is_empty()
        && !token.contains(char::is_whitespace);
    well_formed.then_some(token)
}
