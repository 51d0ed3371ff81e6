//! Greedy near-duplicate merging.

use tracing::debug;

use super::SimilarityBackend;

/// Collapse near-duplicate items into index groups.
///
/// Single greedy pass, order-sensitive and O(n²) by design (folders hold
/// tens to low hundreds of documents). The earliest unused item anchors a
/// group; every later unused item joins the first anchor it clears the
/// threshold against, scanning anchors in index order. The returned groups
/// form an exact partition of `0..items.len()`, ordered by anchor index,
/// and nothing outlives the call.
pub fn merge_by_similarity<T, B>(items: &[T], backend: &B, threshold: f64) -> Vec<Vec<usize>>
where
    B: SimilarityBackend<T>,
{
    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut owner: Vec<Option<usize>> = vec![None; items.len()];

    for anchor in 0..items.len() {
        if owner[anchor].is_some() {
            continue;
        }
        let group_id = groups.len();
        owner[anchor] = Some(group_id);
        let mut group = vec![anchor];

        for candidate in (anchor + 1)..items.len() {
            if owner[candidate].is_some() {
                continue;
            }
            if backend.compare(&items[anchor], &items[candidate]) >= threshold {
                owner[candidate] = Some(group_id);
                group.push(candidate);
            }
        }
        groups.push(group);
    }

    debug!(
        items = items.len(),
        groups = groups.len(),
        threshold,
        "merged near-duplicates"
    );
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::{CosineSimilarity, TokenSortSimilarity};

    #[test]
    fn test_every_item_in_exactly_one_group() {
        let items: Vec<String> = ["algebra", "algebre", "geometry", "algebra"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let groups = merge_by_similarity(&items, &TokenSortSimilarity, 80.0);

        let mut seen = vec![0usize; items.len()];
        for group in &groups {
            for &i in group {
                seen[i] += 1;
            }
        }
        assert!(seen.iter().all(|&c| c == 1));
    }

    #[test]
    fn test_anchor_is_earliest_index() {
        let items: Vec<String> = ["geometry", "algebra", "algebra"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let groups = merge_by_similarity(&items, &TokenSortSimilarity, 90.0);
        assert_eq!(groups, vec![vec![0], vec![1, 2]]);
    }

    #[test]
    fn test_cosine_backend_merges_near_duplicates() {
        // Unit vectors: the first two are close, the third orthogonal.
        let items = vec![
            vec![1.0, 0.0],
            vec![0.9950372, 0.09950372],
            vec![0.0, 1.0],
        ];
        let groups = merge_by_similarity(&items, &CosineSimilarity, 0.95);
        assert_eq!(groups, vec![vec![0, 1], vec![2]]);
    }

    #[test]
    fn test_raising_threshold_never_decreases_group_count() {
        let items: Vec<String> = [
            "algebra notes",
            "algebra note",
            "algebra",
            "geometry",
            "geometri",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let mut previous = 0usize;
        for threshold in [0.0, 20.0, 60.0, 80.0, 95.0, 101.0] {
            let count = merge_by_similarity(&items, &TokenSortSimilarity, threshold).len();
            assert!(
                count >= previous,
                "groups shrank from {previous} to {count} at threshold {threshold}"
            );
            previous = count;
        }
    }

    #[test]
    fn test_empty_input() {
        let items: Vec<String> = vec![];
        assert!(merge_by_similarity(&items, &TokenSortSimilarity, 70.0).is_empty());
    }
}
