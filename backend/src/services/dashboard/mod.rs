mod get;

use actix_web::web::{self, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/dashboard";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("", web::get().to(get::process))
}
