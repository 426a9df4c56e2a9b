//! Shared types and configuration for the kapper provider map.
//!
//! The clustering transform in `kapper-cluster` consumes [`Point`]s built
//! here from provider records that already passed boundary validation.

pub mod app_config;
pub mod config;
pub mod geo;
pub mod providers;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{Coordinate, Point};
pub use providers::{
    into_points, load_providers, parse_providers, PointBatch, ProviderFilter, ProviderRecord,
    ProvidersFile, RawCoordinate, SkipReason, SkippedRecord,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read providers file {path}: {source}")]
    ProvidersFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse providers file: {0}")]
    ProvidersFileParse(#[source] serde_yaml::Error),

    #[error("providers validation failed: {0}")]
    Validation(String),
}
