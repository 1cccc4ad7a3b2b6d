pub mod app_config;
pub mod config;
pub mod pagination;
pub mod partition;
pub mod query;
pub mod station;
pub mod store;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use pagination::{PageRequest, PaginatedResult, DEFAULT_MAX_PAGE_SIZE};
pub use partition::{partition_key_for, Region, FALLBACK_PARTITION};
pub use query::{
    query_by_id, query_by_partition, query_by_postal_code, query_positions, QueryError,
};
pub use station::{
    Address, Coordinates, Station, StationName, StationPosition, StationSummary,
    DEFAULT_NAME_LANG, UNKNOWN_PLACEHOLDER,
};
pub use store::{MemoryStationStore, StationStore, StoreError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Violations of the [`Station`] invariant.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("station id must be non-empty")]
    EmptyId,

    #[error("station {id} has an empty partition key")]
    EmptyPartitionKey { id: String },
}
