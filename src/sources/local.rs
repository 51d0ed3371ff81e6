//! Local folder source with glob patterns and JSON text extraction.

use async_trait::async_trait;
use glob::Pattern;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::traits::{ContentType, Document, DocumentSource};
use crate::config::SourceConfig;
use crate::error::{Result, SourceError};

/// A document source backed by a directory tree on the local filesystem.
pub struct LocalFolderSource {
    base: PathBuf,
    /// Compiled include patterns, matched against paths relative to `base`.
    patterns: Vec<Pattern>,
    min_fragment_len: usize,
}

impl LocalFolderSource {
    pub fn new(folder: impl Into<PathBuf>, config: &SourceConfig) -> Result<Self> {
        let folder = folder.into();
        let base = folder
            .canonicalize()
            .map_err(|e| SourceError::PathNotFound(format!("{}: {}", folder.display(), e)))?;

        let patterns: Vec<Pattern> = config
            .patterns
            .iter()
            .filter_map(|p| match Pattern::new(p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    warn!("Invalid include pattern '{}': {}", p, e);
                    None
                }
            })
            .collect();

        Ok(Self {
            base,
            patterns,
            min_fragment_len: config.min_fragment_len,
        })
    }

    fn matches_patterns(&self, rel_path: &str) -> bool {
        if self.patterns.is_empty() {
            return true;
        }
        self.patterns
            .iter()
            .any(|p| p.matches(rel_path) || p.matches_path(Path::new(rel_path)))
    }

    /// Walk the directory tree breadth-first, collecting matching files.
    fn scan(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let mut pending = vec![self.base.clone()];

        while let Some(dir) = pending.pop() {
            let entries = std::fs::read_dir(&dir).map_err(|e| {
                SourceError::Io(std::io::Error::new(
                    e.kind(),
                    format!("{}: {}", dir.display(), e),
                ))
            })?;

            for entry in entries.flatten() {
                let path = entry.path();
                let metadata = match std::fs::symlink_metadata(&path) {
                    Ok(m) => m,
                    Err(e) => {
                        debug!("Cannot read metadata for {}: {}", path.display(), e);
                        continue;
                    }
                };

                if metadata.is_dir() {
                    pending.push(path);
                } else if metadata.is_file() {
                    let rel_path = path
                        .strip_prefix(&self.base)
                        .unwrap_or(&path)
                        .to_string_lossy()
                        .to_string();
                    if self.matches_patterns(&rel_path) {
                        files.push(path);
                    }
                }
            }
        }

        files.sort();
        Ok(files)
    }

    fn read_document(&self, path: &Path) -> Result<Document> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let content_type = ContentType::from_path(path);

        let raw_text = match content_type {
            ContentType::Json => {
                let bytes = std::fs::read(path).map_err(SourceError::Io)?;
                match serde_json::from_slice(&bytes) {
                    Ok(value) => extract_fragments(&value, self.min_fragment_len),
                    Err(e) => {
                        warn!("Skipping malformed JSON in {}: {}", path.display(), e);
                        String::new()
                    }
                }
            }
            // Text extraction only covers JSON; other formats still cluster
            // through the lexical path.
            ContentType::Pdf | ContentType::Other => String::new(),
        };

        Ok(Document {
            id: path.to_string_lossy().to_string(),
            name,
            content_type,
            raw_text,
        })
    }
}

#[async_trait]
impl DocumentSource for LocalFolderSource {
    async fn list(&self, name_filter: Option<&str>) -> Result<Vec<Document>> {
        info!("Listing documents under {}", self.base.display());
        let files = self.scan()?;

        let filter = name_filter.map(|f| f.to_lowercase());
        let mut seen = HashSet::new();
        let mut documents = Vec::new();

        for path in files {
            let document = self.read_document(&path)?;
            if let Some(ref needle) = filter {
                if !document.name.to_lowercase().contains(needle) {
                    continue;
                }
            }
            if seen.insert(document.id.clone()) {
                documents.push(document);
            }
        }

        debug!(count = documents.len(), "documents listed");
        Ok(documents)
    }

    async fn fetch_text(&self, id: &str) -> Result<String> {
        let path = PathBuf::from(id);
        if !path.starts_with(&self.base) || !path.is_file() {
            return Err(SourceError::PathNotFound(id.to_string()).into());
        }
        Ok(self.read_document(&path)?.raw_text)
    }
}

/// Collect string fragments from a JSON document, skipping anything shorter
/// than `min_len` characters. Arrays and objects are walked in order, so the
/// output is stable for identical input.
pub fn extract_fragments(value: &serde_json::Value, min_len: usize) -> String {
    let mut fragments = Vec::new();
    let mut pending = vec![value];

    while let Some(value) = pending.pop() {
        match value {
            serde_json::Value::String(s) => {
                if s.chars().count() > min_len {
                    fragments.push(s.as_str());
                }
            }
            serde_json::Value::Array(items) => {
                pending.extend(items.iter().rev());
            }
            serde_json::Value::Object(map) => {
                pending.extend(map.values().rev());
            }
            _ => {}
        }
    }

    fragments.join(" ")
}
