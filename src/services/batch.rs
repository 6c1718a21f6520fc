// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sequential batched writes.

use crate::db::{StoreError, TimeSeriesStore};
use crate::models::{Point, WritePrecision};

/// Largest number of points sent in one write call.
pub const MAX_BATCH_SIZE: usize = 500;

/// Write `points` in contiguous chunks of at most `MAX_BATCH_SIZE`, one
/// chunk at a time and in list order.
///
/// Stops at the first failing chunk. Chunks written before the failure stay
/// committed; nothing is rolled back.
///
/// Returns the number of write calls made.
pub async fn write_in_batches(
    store: &dyn TimeSeriesStore,
    bucket: &str,
    points: &[Point],
    precision: WritePrecision,
) -> Result<usize, StoreError> {
    let total_batches = points.len().div_ceil(MAX_BATCH_SIZE);

    for (index, batch) in points.chunks(MAX_BATCH_SIZE).enumerate() {
        if let Err(e) = store.write(bucket, batch, precision).await {
            tracing::error!(
                bucket,
                batch = index + 1,
                total_batches,
                committed_batches = index,
                error = %e,
                "Batch write failed; earlier batches remain committed"
            );
            return Err(e);
        }
        tracing::debug!(
            bucket,
            batch = index + 1,
            total_batches,
            points = batch.len(),
            "Batch written"
        );
    }

    Ok(total_batches)
}
