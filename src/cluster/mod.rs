//! Clustering over embedded document vectors.
//!
//! Two algorithms share one label convention: non-negative integers for
//! cluster membership and [`NOISE`] for points that belong nowhere. The
//! hierarchical path assigns every point a cluster; only the density path
//! produces noise. [`AdaptiveClusterer`] picks between them by dataset
//! size.

pub mod assemble;
pub mod density;
pub mod hierarchy;
pub mod lexical;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ClusteringConfig;
use crate::error::{ClusterError, Result};
use crate::sources::Document;

pub use assemble::assemble;
pub use density::DensityParams;
pub use lexical::LexicalClusterer;

/// Label for points that no cluster claims.
pub const NOISE: i32 = -1;

/// A group of documents judged to cover the same topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    pub label: String,
    pub documents: Vec<Document>,
    pub size: usize,
}

/// Outcome of a clustering run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusteringResult {
    pub clusters: Vec<Cluster>,
    pub outliers: Vec<Document>,
    pub total_documents: usize,
    pub algorithm_used: String,
    pub created_at: DateTime<Utc>,
}

impl ClusteringResult {
    /// Result for a run with nothing to cluster.
    pub fn empty(algorithm: &str) -> Self {
        Self {
            clusters: Vec::new(),
            outliers: Vec::new(),
            total_documents: 0,
            algorithm_used: algorithm.to_string(),
            created_at: Utc::now(),
        }
    }
}

/// Which algorithm a run ended up using.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Strategy {
    Hierarchical { distance_threshold: f32 },
    Density(DensityParams),
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Hierarchical { .. } => "agglomerative",
            Strategy::Density(_) => "hdbscan",
        }
    }
}

/// Chooses hierarchical clustering for small datasets and density
/// clustering for everything else, per the configured cutoff.
#[derive(Debug, Clone)]
pub struct AdaptiveClusterer {
    config: ClusteringConfig,
}

impl AdaptiveClusterer {
    pub fn new(config: ClusteringConfig) -> Self {
        Self { config }
    }

    /// The algorithm a dataset of `n` vectors would be routed to.
    pub fn strategy_for(&self, n: usize) -> Strategy {
        if n < self.config.small_dataset_cutoff {
            Strategy::Hierarchical {
                distance_threshold: self.config.distance_threshold,
            }
        } else {
            Strategy::Density(DensityParams {
                min_cluster_size: self.config.min_cluster_size,
                min_samples: self.config.min_samples,
            })
        }
    }

    /// Cluster `vectors`, returning one label per vector and the strategy
    /// that produced them.
    pub fn cluster(&self, vectors: &[Vec<f32>]) -> Result<(Vec<i32>, Strategy)> {
        if self.config.min_cluster_size < 2 {
            return Err(ClusterError::InvalidParameter {
                name: "min_cluster_size",
                message: "must be at least 2",
            }
            .into());
        }
        if self.config.min_samples < 1 {
            return Err(ClusterError::InvalidParameter {
                name: "min_samples",
                message: "must be at least 1",
            }
            .into());
        }
        if let Some(first) = vectors.first() {
            let expected = first.len();
            for v in vectors {
                if v.len() != expected {
                    return Err(ClusterError::DimensionMismatch {
                        expected,
                        found: v.len(),
                    }
                    .into());
                }
            }
        }

        let strategy = self.strategy_for(vectors.len());
        tracing::debug!(
            vectors = vectors.len(),
            algorithm = strategy.name(),
            "clustering embedded vectors"
        );

        let labels = match strategy {
            Strategy::Hierarchical { distance_threshold } => {
                hierarchy::cluster(vectors, distance_threshold)
            }
            Strategy::Density(params) => density::cluster(vectors, &params),
        };
        Ok((labels, strategy))
    }
}
