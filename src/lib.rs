//! Cursus: topic clustering for course documents.
//!
//! Groups a folder of course material into topic clusters two ways: a
//! semantic path that embeds extracted text and clusters the vectors, and a
//! lexical path that works from filenames alone. A small search operation
//! rides on the lexical path.

pub mod cluster;
pub mod config;
pub mod embedding;
pub mod engine;
pub mod error;
pub mod similarity;
pub mod sources;
pub mod text;

pub use cluster::{Cluster, ClusteringResult, NOISE};
pub use config::Config;
pub use engine::ClusterEngine;
pub use error::{CursusError, Result};
pub use sources::{ContentType, Document, DocumentSource, LocalFolderSource};
