//! Configuration loading and validation.

mod settings;

pub use settings::{Config, ClusteringConfig, EmbeddingConfig, LexicalConfig, SourceConfig};
