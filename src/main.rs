// SPDX-License-Identifier: MIT

//! Poop Map API Server
//!
//! Serves the location-based social backend: entries, friends,
//! interactions, feeds, leaderboards, and gameplay extras.

use poop_map_api::{
    config::{Config, StoreBackend},
    store::Store,
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Poop Map API");

    // Select the persistence backend
    let store = match config.store_backend {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory store");
            Store::memory()
        }
        StoreBackend::Firestore => Store::firestore(&config.gcp_project_id)
            .await
            .expect("Failed to connect to Firestore"),
    };

    // Build shared state
    let state = Arc::new(AppState::new(config.clone(), store));

    // Build router
    let app = poop_map_api::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("poop_map_api=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
