// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod activity;
pub mod batch;
pub mod filter;
pub mod points;
pub mod tracks;

pub use activity::{ActivityIngestor, IngestResult};
pub use batch::{write_in_batches, MAX_BATCH_SIZE};
pub use filter::ActivityFilter;
pub use points::{PointError, PointShape};
pub use tracks::{TrackAggregator, TrackError};
