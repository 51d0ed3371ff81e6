//! Canonical subject keys derived from filenames.
//!
//! Filenames carry structural noise (unit/part numbers, summary markers,
//! localized lesson numbering) on top of the course name. Stripping it
//! yields a "subject key" whose collisions across files are exactly the
//! clustering signal.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::LexicalConfig;
use crate::error::{ConfigError, Result};

/// Sentinel partition for subject keys without a categorical tag.
pub const UNCLASSIFIED: &str = "unclassified";

/// Coarse document kind detected from the filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Course,
    Exercise,
}

/// Classify a filename as course material or exercise sheet.
pub fn categorize(name: &str) -> DocumentKind {
    let lower = name.to_lowercase();
    if lower.contains("exercice") || lower.contains("non corrigé") {
        DocumentKind::Exercise
    } else {
        DocumentKind::Course
    }
}

/// Derives subject and partition keys from filenames.
///
/// Patterns are compiled once from [`LexicalConfig`]; extraction itself is
/// deterministic and never fails. An unmatched pattern leaves the key
/// unchanged, an absent partition tag yields [`UNCLASSIFIED`].
pub struct SubjectKeyExtractor {
    noise: Regex,
    leading_digits: Regex,
    separators: Regex,
    partition: Regex,
}

impl SubjectKeyExtractor {
    /// Compile the extractor from configuration.
    pub fn from_config(config: &LexicalConfig) -> Result<Self> {
        let noise_alternation = config.noise_markers.join("|");
        let noise = Regex::new(&format!("(?i)({noise_alternation})"))
            .map_err(|e| ConfigError::Invalid(format!("bad noise marker: {e}")))?;
        let partition = Regex::new(&format!("({})", config.partition_pattern))
            .map_err(|e| ConfigError::Invalid(format!("bad partition pattern: {e}")))?;

        Ok(Self {
            noise,
            leading_digits: Regex::new(r"^\d+\s*").expect("static pattern"),
            separators: Regex::new(r"[-_]+").expect("static pattern"),
            partition,
        })
    }

    /// Canonicalize a filename into its subject key.
    pub fn subject_key(&self, filename: &str) -> String {
        let stem = Path::new(filename)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| filename.to_string());

        let without_noise = self.noise.replace_all(&stem, "");
        let without_leading = self.leading_digits.replace(&without_noise, "");
        let spaced = self.separators.replace_all(&without_leading, " ");

        spaced
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    /// Extract the categorical partition tag from a subject key, if any.
    pub fn partition_key(&self, subject_key: &str) -> String {
        self.partition
            .find(subject_key)
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| UNCLASSIFIED.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> SubjectKeyExtractor {
        SubjectKeyExtractor::from_config(&LexicalConfig::default()).unwrap()
    }

    #[test]
    fn test_unit_and_summary_markers_stripped() {
        let ex = extractor();
        assert_eq!(ex.subject_key("Algebra_Unit3_resume.pdf"), "algebra");
        assert_eq!(ex.subject_key("Algebra_Unit5_resume.pdf"), "algebra");
        assert_eq!(ex.subject_key("Geometrie_Partie2.pdf"), "geometrie");
    }

    #[test]
    fn test_leading_digits_and_separators() {
        let ex = extractor();
        assert_eq!(ex.subject_key("12-Algebra-Notes.json"), "algebra notes");
        assert_eq!(ex.subject_key("03 Analyse__reelle.pdf"), "analyse reelle");
    }

    #[test]
    fn test_localized_lesson_marker() {
        let ex = extractor();
        assert_eq!(ex.subject_key("التوحيد الدرس 3.pdf"), "التوحيد");
    }

    #[test]
    fn test_no_extension() {
        let ex = extractor();
        assert_eq!(ex.subject_key("Algebra Unit1"), "algebra");
    }

    #[test]
    fn test_unmatched_patterns_leave_key_intact() {
        let ex = extractor();
        assert_eq!(ex.subject_key("Topologie.pdf"), "topologie");
    }

    #[test]
    fn test_partition_key() {
        let ex = extractor();
        assert_eq!(ex.partition_key("سورة لقمان تفسير"), "سورة لقمان");
        assert_eq!(ex.partition_key("algebra notes"), UNCLASSIFIED);
    }

    #[test]
    fn test_categorize() {
        assert_eq!(categorize("Algebra_exercice3.pdf"), DocumentKind::Exercise);
        assert_eq!(categorize("Devoir non corrigé.pdf"), DocumentKind::Exercise);
        assert_eq!(categorize("Algebra_Unit1.pdf"), DocumentKind::Course);
    }

    #[test]
    fn test_bad_config_pattern_rejected() {
        let config = LexicalConfig {
            noise_markers: vec!["(unclosed".to_string()],
            ..Default::default()
        };
        assert!(SubjectKeyExtractor::from_config(&config).is_err());
    }
}
