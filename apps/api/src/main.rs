//! PeopleHub API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod auth;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use peoplehub_core::AppError;
use tracing::{info, warn};

use crate::api_config::{ApiConfig, RunMode, init_tracing};
use crate::api_router::build_router;
use crate::api_services::{build_app_state, connect_and_migrate};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;
    let pool = connect_and_migrate(&config.database_url, config.database_max_connections).await?;

    if config.run_mode == RunMode::MigrateOnly {
        info!("database migrations applied successfully");
        return Ok(());
    }

    let app_state = build_app_state(pool, &config);

    if config.run_mode == RunMode::PurgeSessions {
        app_state.auth_service.purge_expired_sessions().await?;
        return Ok(());
    }

    if let Err(error) = app_state.auth_service.purge_expired_sessions().await {
        warn!(%error, "failed to purge expired sessions at startup");
    }

    let app = build_router(app_state, &config.frontend_url)?;
    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind API listener: {error}")))?;

    info!(%address, "peoplehub-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
