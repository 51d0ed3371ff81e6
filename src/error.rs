//! Error types for the cursus clustering engine.

use thiserror::Error;

/// Main error type for cursus operations.
#[derive(Error, Debug)]
pub enum CursusError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Clustering error: {0}")]
    Cluster(#[from] ClusterError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Document source errors. Fatal and surfaced to the caller; the engine
/// performs no retries of its own.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Source unavailable: {0}")]
    Unavailable(String),

    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Embedding provider errors. Fatal for the semantic path; there is no
/// automatic fallback to the lexical path.
#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Batch too large: {0} (max {1})")]
    BatchTooLarge(usize, usize),

    #[error("No embedding provider configured")]
    NoProvider,
}

/// Errors from the clustering layer.
#[derive(Error, Debug)]
pub enum ClusterError {
    #[error("Dimension mismatch: expected {expected}, got {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("Invalid parameter {name}: {message}")]
    InvalidParameter {
        name: &'static str,
        message: &'static str,
    },

    #[error("Label count {found} does not match group count {expected}")]
    LabelCount { expected: usize, found: usize },
}

/// Result type alias for cursus operations.
pub type Result<T> = std::result::Result<T, CursusError>;
