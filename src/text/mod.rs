//! Text normalization and filename canonicalization.

mod normalize;
mod subject;

pub use normalize::normalize;
pub use subject::{categorize, DocumentKind, SubjectKeyExtractor, UNCLASSIFIED};
