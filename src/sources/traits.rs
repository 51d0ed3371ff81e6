//! Source trait definitions and the document model.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::Result;

/// How a document's content is encoded, judged from its file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Json,
    Pdf,
    Other,
}

impl ContentType {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => ContentType::Json,
            Some("pdf") => ContentType::Pdf,
            _ => ContentType::Other,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentType::Json => write!(f, "json"),
            ContentType::Pdf => write!(f, "pdf"),
            ContentType::Other => write!(f, "other"),
        }
    }
}

/// A course document as seen by the clustering engine.
///
/// `raw_text` holds whatever text the source could extract; it is empty for
/// formats the source cannot read, in which case only the lexical path can
/// place the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Stable identifier, unique within a source.
    pub id: String,
    /// File name including extension.
    pub name: String,
    pub content_type: ContentType,
    pub raw_text: String,
}

/// Trait for places documents come from.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// List all documents, optionally keeping only those whose name
    /// contains `name_filter` (case-insensitive).
    async fn list(&self, name_filter: Option<&str>) -> Result<Vec<Document>>;

    /// Fetch the extracted text of a single document.
    async fn fetch_text(&self, id: &str) -> Result<String>;
}
