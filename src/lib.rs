// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Garmin gateway: ingest Garmin Health API activity pushes into InfluxDB
//! and serve daily GPS tracks as GeoJSON.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::TimeSeriesStore;
use services::{ActivityFilter, ActivityIngestor};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn TimeSeriesStore>,
    pub ingestor: ActivityIngestor,
}

impl AppState {
    /// Wire the ingestor to `store` using the bucket and allow-list from
    /// `config`.
    pub fn new(config: Config, store: Arc<dyn TimeSeriesStore>) -> Self {
        let filter = ActivityFilter::new(config.allowed_activity_types.iter().cloned());
        let ingestor = ActivityIngestor::new(store.clone(), filter, config.influxdb_bucket.clone());
        Self {
            config,
            store,
            ingestor,
        }
    }
}
