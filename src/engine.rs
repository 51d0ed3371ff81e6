//! The clustering engine.
//!
//! Wires sources, embeddings, and the clustering algorithms into the three
//! operations callers actually run: semantic clustering, lexical
//! clustering, and subject search.

use std::sync::Arc;

use tracing::{debug, info};

use crate::cluster::{assemble, AdaptiveClusterer, ClusteringResult, LexicalClusterer};
use crate::config::Config;
use crate::embedding::EmbeddingProvider;
use crate::error::{EmbeddingError, Result};
use crate::similarity::{merge_by_similarity, CosineSimilarity, l2_normalize};
use crate::sources::Document;
use crate::text::{normalize, SubjectKeyExtractor};

pub struct ClusterEngine {
    config: Config,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    lexical: LexicalClusterer,
    extractor: SubjectKeyExtractor,
}

impl ClusterEngine {
    /// Engine without an embedding provider; only the lexical operations
    /// work.
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            lexical: LexicalClusterer::new(&config.lexical)?,
            extractor: SubjectKeyExtractor::from_config(&config.lexical)?,
            config,
            embedder: None,
        })
    }

    pub fn with_embedder(config: Config, embedder: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        let mut engine = Self::new(config)?;
        engine.embedder = Some(embedder);
        Ok(engine)
    }

    /// Cluster documents by the meaning of their text.
    ///
    /// Near-duplicates (cosine similarity at or above the configured merge
    /// threshold) are folded into one group first, each group is re-embedded
    /// from its members' concatenated text, and the adaptive clusterer runs
    /// over the result. Documents with no extractable text are silently
    /// absent from the result; the lexical path is where they can still be
    /// placed.
    pub async fn cluster_semantic(&self, documents: &[Document]) -> Result<ClusteringResult> {
        let embedder = self
            .embedder
            .as_ref()
            .ok_or(EmbeddingError::NoProvider)?;

        let readable: Vec<&Document> = documents.iter().filter(|d| !d.raw_text.is_empty()).collect();

        if readable.is_empty() {
            return Ok(ClusteringResult::empty("none"));
        }

        info!(
            documents = documents.len(),
            readable = readable.len(),
            "semantic clustering started"
        );

        let texts: Vec<String> = readable.iter().map(|d| normalize(&d.raw_text)).collect();
        let vectors = self.embed_batched(embedder.as_ref(), &texts).await?;

        let threshold = self.config.clustering.merge_threshold as f64;
        let merged = merge_by_similarity(&vectors, &CosineSimilarity, threshold);
        debug!(
            documents = readable.len(),
            groups = merged.len(),
            "near-duplicate merge finished"
        );

        // One representative text per group: the members' raw texts
        // concatenated, then normalized like any other document.
        let representatives: Vec<String> = merged
            .iter()
            .map(|group| {
                let joined = group
                    .iter()
                    .map(|&i| readable[i].raw_text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                normalize(&joined)
            })
            .collect();
        let rep_vectors = self.embed_batched(embedder.as_ref(), &representatives).await?;

        let clusterer = AdaptiveClusterer::new(self.config.clustering.clone());
        let (labels, strategy) = clusterer.cluster(&rep_vectors)?;

        let groups: Vec<Vec<Document>> = merged
            .iter()
            .map(|group| group.iter().map(|&i| readable[i].clone()).collect())
            .collect();
        let result = assemble(groups, &labels, strategy.name())?;

        info!(
            clusters = result.clusters.len(),
            outliers = result.outliers.len(),
            algorithm = %result.algorithm_used,
            "semantic clustering finished"
        );
        Ok(result)
    }

    /// Cluster documents by filename alone. Works without an embedding
    /// provider and never produces outliers.
    pub fn cluster_lexical(&self, documents: &[Document], partitioned: bool) -> Result<ClusteringResult> {
        let groups = self.lexical.cluster(documents, partitioned);
        let labels: Vec<i32> = (0..groups.len() as i32).collect();
        let algorithm = if partitioned {
            "lexical_partitioned"
        } else {
            "lexical_flat"
        };
        assemble(groups, &labels, algorithm)
    }

    /// Find documents whose subject matches `query`, grouped so members of
    /// the same lexical cluster come out together. A query that normalizes
    /// to nothing matches every document.
    pub fn search(&self, documents: &[Document], query: &str) -> Vec<Document> {
        let needle = normalize(query);
        let groups = self.lexical.cluster(documents, false);
        let mut hits = Vec::new();
        for group in groups {
            for document in group {
                if self.extractor.subject_key(&document.name).contains(&needle) {
                    hits.push(document);
                }
            }
        }
        debug!(query = %query, hits = hits.len(), "search finished");
        hits
    }

    /// Embed `texts` in provider-sized chunks, preserving order.
    async fn embed_batched(
        &self,
        embedder: &dyn EmbeddingProvider,
        texts: &[String],
    ) -> Result<Vec<Vec<f32>>> {
        let batch = embedder.max_batch_size().max(1);
        let mut vectors = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(batch) {
            let mut embedded = embedder.embed(chunk).await?;
            for v in &mut embedded {
                l2_normalize(v);
            }
            vectors.extend(embedded);
        }
        Ok(vectors)
    }
}
