//! Text embedding.
//!
//! Clustering only ever sees `Vec<f32>` vectors; everything about where
//! they come from sits behind [`EmbeddingProvider`].

mod api;
mod traits;

pub use api::ApiEmbeddingProvider;
pub use traits::EmbeddingProvider;
