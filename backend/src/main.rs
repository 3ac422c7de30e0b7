use actix_web::{web, HttpServer};
use alant_backend::build_app;
use alant_backend::config::Config;
use alant_backend::state::AppState;
use env_logger::Env;
use log::info;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::from_env()?;
    let (host, port) = config.bind_address();
    let state = web::Data::new(AppState::from_config(config)?);

    info!("Server running at http://{}:{}", host, port);

    HttpServer::new(move || build_app(state.clone()))
        .bind((host.as_str(), port))?
        .run()
        .await?;
    Ok(())
}
