//! Filename-based clustering.
//!
//! Groups documents by fuzzy similarity of their subject keys, with no
//! embeddings involved. Two modes:
//!
//! - flat: every document competes with every other, using token sort
//!   similarity so word order in filenames does not matter;
//! - partitioned: documents are first bucketed by a partition marker in the
//!   name and only compared within their bucket, using the stricter token
//!   set similarity.

use tracing::debug;

use crate::config::LexicalConfig;
use crate::error::Result;
use crate::similarity::{SimilarityBackend, TokenSetSimilarity, TokenSortSimilarity};
use crate::sources::Document;
use crate::text::SubjectKeyExtractor;

pub struct LexicalClusterer {
    extractor: SubjectKeyExtractor,
    flat_cutoff: f64,
    partition_cutoff: f64,
}

impl LexicalClusterer {
    pub fn new(config: &LexicalConfig) -> Result<Self> {
        Ok(Self {
            extractor: SubjectKeyExtractor::from_config(config)?,
            flat_cutoff: config.flat_cutoff,
            partition_cutoff: config.partition_cutoff,
        })
    }

    /// Group `documents` by filename similarity. Every document lands in
    /// exactly one group; the lexical path has no notion of noise.
    pub fn cluster(&self, documents: &[Document], partitioned: bool) -> Vec<Vec<Document>> {
        let keys: Vec<String> = documents
            .iter()
            .map(|d| self.extractor.subject_key(&d.name))
            .collect();

        let groups = if partitioned {
            self.cluster_partitioned(documents, &keys)
        } else {
            self.cluster_flat(documents, &keys)
        };
        debug!(
            documents = documents.len(),
            groups = groups.len(),
            partitioned,
            "lexical clustering finished"
        );
        groups
    }

    /// Each unassigned document in turn anchors a group and pulls in every
    /// other unassigned document whose key scores at or above the cutoff,
    /// strongest match first.
    fn cluster_flat(&self, documents: &[Document], keys: &[String]) -> Vec<Vec<Document>> {
        let n = documents.len();
        let mut used = vec![false; n];
        let mut groups = Vec::new();

        for anchor in 0..n {
            if used[anchor] {
                continue;
            }
            used[anchor] = true;
            let mut group = vec![documents[anchor].clone()];

            let mut scored: Vec<(f64, usize)> = (0..n)
                .filter(|&j| !used[j])
                .map(|j| (TokenSortSimilarity.compare(&keys[anchor], &keys[j]), j))
                .filter(|&(score, _)| score >= self.flat_cutoff)
                .collect();
            scored.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));

            for (_, j) in scored {
                used[j] = true;
                group.push(documents[j].clone());
            }
            groups.push(group);
        }
        groups
    }

    /// Bucket by partition key first, then grow clusters within each bucket
    /// by comparing against the first member of each existing cluster.
    fn cluster_partitioned(&self, documents: &[Document], keys: &[String]) -> Vec<Vec<Document>> {
        // Buckets in first-seen order. The partition tag is read from the
        // subject key, not the raw filename, so separator style and file
        // extension cannot split a bucket.
        let mut bucket_names: Vec<String> = Vec::new();
        let mut buckets: Vec<Vec<usize>> = Vec::new();
        for i in 0..documents.len() {
            let partition = self.extractor.partition_key(&keys[i]);
            match bucket_names.iter().position(|p| *p == partition) {
                Some(b) => buckets[b].push(i),
                None => {
                    bucket_names.push(partition);
                    buckets.push(vec![i]);
                }
            }
        }

        let mut groups = Vec::new();
        for bucket in &buckets {
            // Clusters within the bucket, each identified by its first
            // member's key.
            let mut local: Vec<Vec<usize>> = Vec::new();
            for &i in bucket {
                let joined = local.iter_mut().find(|members| {
                    TokenSetSimilarity.compare(&keys[members[0]], &keys[i]) >= self.partition_cutoff
                });
                match joined {
                    Some(members) => members.push(i),
                    None => local.push(vec![i]),
                }
            }
            for members in local {
                groups.push(members.iter().map(|&i| documents[i].clone()).collect());
            }
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::ContentType;

    fn doc(name: &str) -> Document {
        Document {
            id: format!("/tmp/{name}"),
            name: name.to_string(),
            content_type: ContentType::Pdf,
            raw_text: String::new(),
        }
    }

    fn clusterer() -> LexicalClusterer {
        LexicalClusterer::new(&LexicalConfig::default()).unwrap()
    }

    #[test]
    fn test_flat_groups_same_subject() {
        let documents = vec![
            doc("Algebra Unit1.pdf"),
            doc("Algebra Unit2.pdf"),
            doc("Geometry Unit1.pdf"),
        ];
        let groups = clusterer().cluster(&documents, false);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 2);
        assert!(groups[0].iter().all(|d| d.name.starts_with("Algebra")));
        assert_eq!(groups[1][0].name, "Geometry Unit1.pdf");
    }

    #[test]
    fn test_flat_ignores_word_order() {
        let documents = vec![doc("Notes Algebra.pdf"), doc("Algebra Notes.pdf")];
        let groups = clusterer().cluster(&documents, false);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 2);
    }

    #[test]
    fn test_flat_orders_matches_by_score() {
        let documents = vec![
            doc("Algebra Notes.pdf"),
            doc("Algebra Note.pdf"),
            doc("Algebra Notes.json"),
        ];
        let groups = clusterer().cluster(&documents, false);
        assert_eq!(groups.len(), 1);
        // The exact-key match outranks the near miss.
        assert_eq!(groups[0][0].name, "Algebra Notes.pdf");
        assert_eq!(groups[0][1].name, "Algebra Notes.json");
        assert_eq!(groups[0][2].name, "Algebra Note.pdf");
    }

    #[test]
    fn test_partitioned_separates_buckets() {
        let documents = vec![
            doc("سورة لقمان الدرس 1.pdf"),
            doc("سورة الكهف الدرس 1.pdf"),
            doc("سورة لقمان الدرس 2.pdf"),
            doc("Algebra Unit1.pdf"),
        ];
        let groups = clusterer().cluster(&documents, true);
        // Buckets keep first-seen order, so لقمان comes out first.
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].len(), 2);
        assert!(groups[0].iter().all(|d| d.name.contains("لقمان")));
        assert_eq!(groups[1][0].name, "سورة الكهف الدرس 1.pdf");
        assert_eq!(groups[2][0].name, "Algebra Unit1.pdf");
    }

    #[test]
    fn test_partitioned_never_crosses_buckets() {
        // Identical subjects in different partitions stay apart.
        let documents = vec![
            doc("سورة لقمان التوحيد.pdf"),
            doc("سورة الكهف التوحيد.pdf"),
        ];
        let groups = clusterer().cluster(&documents, true);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_partition_reads_the_subject_key() {
        // Underscores canonicalize to spaces in the subject key; the
        // partition tag must match either separator style.
        let documents = vec![
            doc("سورة_لقمان تفسير.pdf"),
            doc("سورة لقمان تفسير.pdf"),
        ];
        let groups = clusterer().cluster(&documents, true);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 2);
    }

    #[test]
    fn test_partition_ignores_file_extension() {
        let documents = vec![doc("سورة ق.pdf"), doc("سورة ق.json")];
        let groups = clusterer().cluster(&documents, true);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 2);
    }

    #[test]
    fn test_empty_input() {
        let groups = clusterer().cluster(&[], false);
        assert!(groups.is_empty());
    }
}
