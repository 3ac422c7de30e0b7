//! Writes the demo accounts, courses and coursework into the configured
//! store. Every demo account shares the password in `ALANT_SEED_PASSWORD`.

use alant_backend::config::Config;
use alant_backend::data::seed::seed_demo_data;
use alant_backend::state::AppState;
use anyhow::{bail, Context};
use env_logger::Env;
use log::info;
use std::env;

const DEFAULT_SEED_PASSWORD: &str = "password123";

fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::from_env()?;
    let password = match env::var("ALANT_SEED_PASSWORD") {
        Ok(password) => password,
        Err(_) if config.is_development() => DEFAULT_SEED_PASSWORD.to_string(),
        Err(_) => bail!("ALANT_SEED_PASSWORD must be set outside development"),
    };

    let state = AppState::from_config(config)?;
    let summary = seed_demo_data(state.store(), state.auth.as_ref(), &password)
        .context("seeding demo data")?;

    info!(
        "seeded {} users, {} courses, {} enrollments, {} assignments, {} announcements",
        summary.users,
        summary.courses,
        summary.enrollments,
        summary.assignments,
        summary.announcements
    );
    Ok(())
}
