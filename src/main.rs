// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Garmin Gateway API Server
//!
//! Receives Garmin activity pushes, stores them in InfluxDB and serves
//! reconstructed GPS tracks.

use garmin_gateway::{
    config::{Config, QueryDialect},
    db::{FluxStore, InfluxConnection, SqlStore, TimeSeriesStore},
    AppState,
};
use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(port = config.port, "Starting Garmin gateway");

    // One long-lived connection, shared by all requests
    let conn = InfluxConnection::from_config(&config);
    let store: Arc<dyn TimeSeriesStore> = match config.query_dialect {
        QueryDialect::Flux => Arc::new(FluxStore::new(conn)),
        QueryDialect::Sql => Arc::new(SqlStore::new(conn)),
    };
    tracing::info!(
        url = %config.influxdb_url,
        bucket = %config.influxdb_bucket,
        dialect = store.dialect(),
        allowed_activity_types = ?config.allowed_activity_types,
        "InfluxDB client initialized"
    );

    let state = Arc::new(AppState::new(config.clone(), store));

    // Build router
    let app = garmin_gateway::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> anyhow::Result<()> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("garmin_gateway=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
