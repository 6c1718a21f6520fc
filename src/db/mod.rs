//! Time-series store layer (InfluxDB).
//!
//! Handlers only see [`TimeSeriesStore`]; the concrete client is picked from
//! the configured query dialect at startup.

pub mod flux;
pub mod influx;
pub mod line_protocol;
pub mod memory;
pub mod query;
pub mod sql;

pub use flux::FluxStore;
pub use influx::InfluxConnection;
pub use memory::MemoryStore;
pub use query::TrackQuery;
pub use sql::SqlStore;

use crate::models::{Point, WritePrecision};
use async_trait::async_trait;
use serde_json::{Map, Value};

/// One row returned by a query, keyed by column name.
pub type Row = Map<String, Value>;

/// Column holding the row timestamp after normalisation.
pub const TIME_COLUMN: &str = "time";

/// Store failures, classified by what the caller should do about them.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// The store answered 503; callers may retry later.
    #[error("store unavailable (HTTP 503): {0}")]
    Unavailable(String),

    #[error("store rejected request (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("store request failed: {0}")]
    Transport(String),

    #[error("could not decode store response: {0}")]
    Decode(String),
}

/// A time-series store the gateway writes points to and reads tracks from.
///
/// Implementations must be safe to share across in-flight requests.
#[async_trait]
pub trait TimeSeriesStore: Send + Sync {
    /// Write one batch of points to `bucket`.
    async fn write(
        &self,
        bucket: &str,
        points: &[Point],
        precision: WritePrecision,
    ) -> Result<(), StoreError>;

    /// Run a track query and return its rows in store order.
    async fn query(&self, query: &TrackQuery) -> Result<Vec<Row>, StoreError>;

    /// Short name of the query dialect, for logs.
    fn dialect(&self) -> &'static str;
}
