//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honoured for local development.

use std::env;
use std::str::FromStr;

const DEFAULT_INFLUXDB_URL: &str = "https://us-east-1-1.aws.cloud2.influxdata.com";
const DEFAULT_INFLUXDB_ORG: &str = "Technical Team";
const DEFAULT_INFLUXDB_BUCKET: &str = "garmin";

/// Which store client answers track queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryDialect {
    /// InfluxDB v2 HTTP API with Flux queries.
    Flux,
    /// InfluxDB 3 HTTP API with SQL queries.
    Sql,
}

impl FromStr for QueryDialect {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flux" => Ok(QueryDialect::Flux),
            "sql" => Ok(QueryDialect::Sql),
            other => Err(ConfigError::Invalid {
                name: "INFLUXDB_QUERY_DIALECT",
                value: other.to_string(),
            }),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the InfluxDB instance
    pub influxdb_url: String,
    /// InfluxDB API token
    pub influxdb_token: String,
    /// InfluxDB organisation
    pub influxdb_org: String,
    /// Bucket (database) all points are written to
    pub influxdb_bucket: String,
    /// Store client selection
    pub query_dialect: QueryDialect,
    /// Activity types to ingest; empty means all
    pub allowed_activity_types: Vec<String>,
    /// Server port
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let query_dialect = match env::var("INFLUXDB_QUERY_DIALECT") {
            Ok(raw) => raw.parse()?,
            Err(_) => QueryDialect::Flux,
        };

        let port = match env::var("PORT") {
            Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: raw.clone(),
            })?,
            Err(_) => 8080,
        };

        Ok(Self {
            influxdb_url: env::var("INFLUXDB_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_INFLUXDB_URL.to_string()),
            influxdb_token: env::var("INFLUXDB_TOKEN")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("INFLUXDB_TOKEN"))?,
            influxdb_org: env::var("INFLUXDB_ORG")
                .unwrap_or_else(|_| DEFAULT_INFLUXDB_ORG.to_string()),
            influxdb_bucket: env::var("INFLUXDB_BUCKET")
                .unwrap_or_else(|_| DEFAULT_INFLUXDB_BUCKET.to_string()),
            query_dialect,
            allowed_activity_types: parse_allow_list(
                &env::var("ALLOWED_ACTIVITY_TYPES").unwrap_or_default(),
            ),
            port,
        })
    }

    /// Config for tests: local store URL, no allow-list.
    pub fn test_default() -> Self {
        Self {
            influxdb_url: "http://localhost:8086".to_string(),
            influxdb_token: "test_token".to_string(),
            influxdb_org: DEFAULT_INFLUXDB_ORG.to_string(),
            influxdb_bucket: DEFAULT_INFLUXDB_BUCKET.to_string(),
            query_dialect: QueryDialect::Flux,
            allowed_activity_types: Vec::new(),
            port: 8080,
        }
    }
}

/// Split a comma-separated allow-list, dropping blank entries.
pub fn parse_allow_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}
