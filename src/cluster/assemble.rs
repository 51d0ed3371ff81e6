//! Turning label vectors back into document clusters.

use chrono::Utc;

use super::{Cluster, ClusteringResult, NOISE};
use crate::error::{ClusterError, Result};
use crate::sources::Document;

/// Fold labeled groups into a [`ClusteringResult`].
///
/// `groups[i]` holds the documents that were embedded as vector `i`, so one
/// label may cover several documents that were merged before embedding.
/// Noise groups become outliers; labeled groups become clusters named in
/// first-seen label order.
pub fn assemble(
    groups: Vec<Vec<Document>>,
    labels: &[i32],
    algorithm: &str,
) -> Result<ClusteringResult> {
    if groups.len() != labels.len() {
        return Err(ClusterError::LabelCount {
            expected: groups.len(),
            found: labels.len(),
        }
        .into());
    }

    let total_documents = groups.iter().map(Vec::len).sum();
    let mut outliers = Vec::new();
    let mut seen: Vec<i32> = Vec::new();
    let mut clusters: Vec<Cluster> = Vec::new();

    for (group, &label) in groups.into_iter().zip(labels) {
        if label == NOISE {
            outliers.extend(group);
            continue;
        }
        let slot = match seen.iter().position(|&l| l == label) {
            Some(slot) => slot,
            None => {
                seen.push(label);
                clusters.push(Cluster {
                    label: (clusters.len()).to_string(),
                    documents: Vec::new(),
                    size: 0,
                });
                clusters.len() - 1
            }
        };
        clusters[slot].documents.extend(group);
    }

    for cluster in &mut clusters {
        cluster.size = cluster.documents.len();
    }

    Ok(ClusteringResult {
        clusters,
        outliers,
        total_documents,
        algorithm_used: algorithm.to_string(),
        created_at: Utc::now(),
    })
}
