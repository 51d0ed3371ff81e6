//! Configuration settings for the cursus engine.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub embedding: EmbeddingConfig,
    pub clustering: ClusteringConfig,
    pub lexical: LexicalConfig,
    pub source: SourceConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::ReadFile)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations or use defaults.
    pub fn load() -> Result<Self> {
        let config_paths = [
            PathBuf::from("cursus.toml"),
            dirs::config_dir()
                .map(|p| p.join("cursus/config.toml"))
                .unwrap_or_default(),
            dirs::home_dir()
                .map(|p| p.join(".cursus/config.toml"))
                .unwrap_or_default(),
        ];

        for path in &config_paths {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.embedding.base_url.is_empty() {
            return Err(ConfigError::MissingField("embedding.base_url".to_string()).into());
        }
        if self.embedding.model.is_empty() {
            return Err(ConfigError::MissingField("embedding.model".to_string()).into());
        }
        if !(0.0..=1.0).contains(&self.clustering.merge_threshold) {
            return Err(
                ConfigError::Invalid("merge_threshold must be in [0, 1]".to_string()).into(),
            );
        }
        if self.clustering.distance_threshold <= 0.0 {
            return Err(
                ConfigError::Invalid("distance_threshold must be > 0".to_string()).into(),
            );
        }
        if self.clustering.min_cluster_size < 2 {
            return Err(
                ConfigError::Invalid("min_cluster_size must be at least 2".to_string()).into(),
            );
        }
        for (name, cutoff) in [
            ("lexical.flat_cutoff", self.lexical.flat_cutoff),
            ("lexical.partition_cutoff", self.lexical.partition_cutoff),
        ] {
            if !(0.0..=100.0).contains(&cutoff) {
                return Err(
                    ConfigError::Invalid(format!("{name} must be in [0, 100]")).into(),
                );
            }
        }
        Ok(())
    }
}

/// Embedding provider configuration (OpenAI-compatible API).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Base URL of the embeddings endpoint.
    pub base_url: String,
    /// Model name sent with each request.
    pub model: String,
    /// API key; falls back to the OPENAI_API_KEY env var when absent.
    pub api_key: Option<String>,
    /// Maximum texts per request.
    pub batch_size: usize,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "text-embedding-3-small".to_string(),
            api_key: None,
            batch_size: 100,
            timeout_secs: 30,
        }
    }
}

/// Parameters for the semantic merge and the adaptive clusterer.
///
/// The size cutoff and both algorithms' parameters are configuration
/// constants, never derived from the data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Cosine similarity at or above which two documents merge into one
    /// group before clustering.
    pub merge_threshold: f32,
    /// Below this many merged groups, hierarchical clustering runs instead
    /// of density clustering.
    pub small_dataset_cutoff: usize,
    /// Stopping distance for average-linkage hierarchical clustering.
    pub distance_threshold: f32,
    /// Minimum cluster size for density clustering.
    pub min_cluster_size: usize,
    /// Neighbor count for density (core distance) estimation.
    pub min_samples: usize,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            merge_threshold: 0.95,
            small_dataset_cutoff: 20,
            distance_threshold: 0.3,
            min_cluster_size: 2,
            min_samples: 2,
        }
    }
}

/// Parameters for filename-based clustering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalConfig {
    /// Noise patterns stripped from filenames, matched case-insensitively.
    pub noise_markers: Vec<String>,
    /// Pattern whose first match becomes a document's partition key.
    pub partition_pattern: String,
    /// Score cutoff for flat-mode token-sort matching.
    pub flat_cutoff: f64,
    /// Score cutoff for partitioned-mode token-set matching.
    pub partition_cutoff: f64,
}

impl Default for LexicalConfig {
    fn default() -> Self {
        Self {
            noise_markers: vec![
                "_resume".to_string(),
                "_ملخص".to_string(),
                r"unit\d+".to_string(),
                r"partie\d+".to_string(),
                r"الدرس\s*\d+".to_string(),
            ],
            partition_pattern: r"سورة\s+\S+".to_string(),
            flat_cutoff: 70.0,
            partition_cutoff: 85.0,
        }
    }
}

/// Local folder source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Glob patterns selecting listable files.
    pub patterns: Vec<String>,
    /// Minimum length for a JSON string value to count as extractable text.
    pub min_fragment_len: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            patterns: vec!["**/*.json".to_string(), "**/*.pdf".to_string()],
            min_fragment_len: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_parse_partial_toml() {
        let config = Config::from_toml(
            r#"
            [clustering]
            merge_threshold = 0.9
            small_dataset_cutoff = 10
            "#,
        )
        .unwrap();
        assert_eq!(config.clustering.merge_threshold, 0.9);
        assert_eq!(config.clustering.small_dataset_cutoff, 10);
        // Untouched sections keep their defaults.
        assert_eq!(config.lexical.flat_cutoff, 70.0);
    }

    #[test]
    fn test_invalid_merge_threshold() {
        let result = Config::from_toml(
            r#"
            [clustering]
            merge_threshold = 1.5
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_cutoff() {
        let result = Config::from_toml(
            r#"
            [lexical]
            flat_cutoff = 170.0
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_min_cluster_size_floor() {
        let result = Config::from_toml(
            r#"
            [clustering]
            min_cluster_size = 1
            "#,
        );
        assert!(result.is_err());
    }
}
