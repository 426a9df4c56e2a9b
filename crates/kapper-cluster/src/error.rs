use thiserror::Error;

/// Errors returned while configuring the clustering pipeline.
///
/// Clustering itself never fails; only the tables and radii that drive it
/// are validated.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// Zoom table violates an ordering or range rule.
    #[error("invalid zoom table: {0}")]
    InvalidZoomTable(String),

    /// Clustering radius must be finite and positive.
    #[error("invalid clustering radius {0}: must be finite and > 0")]
    InvalidRadius(f64),

    /// Zoom table file could not be read.
    #[error("failed to read zoom table {path}: {source}")]
    ZoomTableIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Zoom table file is not valid YAML for the expected shape.
    #[error("failed to parse zoom table: {0}")]
    ZoomTableParse(#[source] serde_yaml::Error),
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, ClusterError>;
