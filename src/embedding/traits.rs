//! Embedding trait definitions.

use async_trait::async_trait;

use crate::error::Result;

/// Trait for services that turn text into vectors.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a batch of texts, one vector per input in input order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Dimension of the vectors this provider produces.
    fn dimension(&self) -> usize;

    /// Largest batch a single `embed` call accepts.
    fn max_batch_size(&self) -> usize {
        100
    }
}
