//! Pledge preview service — entry point.
//!
//! Runs the pledge screen pipeline on behalf of thin clients: previews pledge
//! data for a project and reward, and reports the status of a checkout
//! fetched from the upstream API.

mod api;
mod config;
mod errors;
mod ksapi;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use reqwest::Client;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use api::ApiState;
use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging (RUST_LOG controls verbosity).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Load optional .env file (ignored if missing).
    let _ = dotenvy::dotenv();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("{e}"))?;

    let client = Client::builder()
        .timeout(Duration::from_secs(config.ksapi_timeout_secs))
        .build()?;

    info!(
        "Upstream API: {} (shipping estimate {} from {})",
        config.ksapi_url, config.pledge.shipping_reference_amount, config.pledge.shipping_location
    );

    let addr = format!("0.0.0.0:{}", config.api_port);
    let state = Arc::new(ApiState::new(client, config));

    let app = Router::new()
        .route("/health", get(api::health))
        .route("/pledge/preview", post(api::preview_pledge))
        .route(
            "/projects/:project_id/rewards/:reward_id/pledge",
            get(api::project_pledge),
        )
        .route("/checkouts/:id", get(api::get_checkout))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
