//! Backend for the Alant course platform: a JSON API over a document store,
//! an object store for course files and a self-hosted identity provider.

pub mod auth;
pub mod config;
pub mod data;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
pub mod storage;
pub mod store;

use crate::error::ApiError;
use crate::state::AppState;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::{from_fn, Logger};
use actix_web::{web, App};

const JSON_LIMIT: usize = 1024 * 1024;

/// Builds the application: routes, JSON/query error handling, the access
/// gate and request logging. Shared by the server binary and the tests.
pub fn build_app(
    state: web::Data<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Response = ServiceResponse<impl MessageBody>,
        Config = (),
        InitError = (),
        Error = actix_web::Error,
    >,
> {
    App::new()
        .app_data(state)
        .app_data(
            web::JsonConfig::default()
                .limit(JSON_LIMIT)
                .error_handler(|err, _| ApiError::bad_request(err.to_string()).into()),
        )
        .app_data(
            web::QueryConfig::default()
                .error_handler(|err, _| ApiError::bad_request(err.to_string()).into()),
        )
        .configure(services::configure)
        .default_service(web::to(not_found))
        .wrap(from_fn(middleware::access_gate))
        .wrap(Logger::default())
}

async fn not_found() -> Result<web::Json<()>, ApiError> {
    Err(ApiError::NotFound("no such route".to_string()))
}
