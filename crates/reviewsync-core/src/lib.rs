pub mod app_config;
pub mod config;
pub mod records;
pub mod tuning;

use thiserror::Error;

pub use app_config::{AppConfig, StoreCredentials, DEFAULT_SOURCE_URL, DEFAULT_TABLE_NAME};
pub use config::{load_app_config, load_app_config_from_env};
pub use records::{EnrichedRecord, Location, RawRecord, SyncOutcome, UNKNOWN_OWNER};
pub use tuning::{ExpandConfig, HarvestConfig, RunMode, ScrollConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
