//! Fuzzy string ratios in the 0-100 range.
//!
//! Token-sort is order-invariant; token-set is additionally
//! duplication-invariant. Both are symmetric and score 100 only for
//! mode-appropriate equivalence.

use std::collections::BTreeSet;

/// Plain similarity ratio between two strings, 0-100.
pub fn ratio(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b) * 100.0
}

/// Similarity after sorting whitespace tokens. 100 iff both strings have
/// equal token multisets.
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

/// Set-based similarity: compares the shared token core against each
/// side's remainder and takes the best pairing. Ignores token order and
/// repetition entirely.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let set_a: BTreeSet<&str> = a.split_whitespace().collect();
    let set_b: BTreeSet<&str> = b.split_whitespace().collect();

    let core = join(set_a.intersection(&set_b));
    let only_a = join(set_a.difference(&set_b));
    let only_b = join(set_b.difference(&set_a));

    let combined_a = combine(&core, &only_a);
    let combined_b = combine(&core, &only_b);

    ratio(&core, &combined_a)
        .max(ratio(&core, &combined_b))
        .max(ratio(&combined_a, &combined_b))
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn join<'a>(iter: impl Iterator<Item = &'a &'a str>) -> String {
    iter.copied().collect::<Vec<_>>().join(" ")
}

fn combine(core: &str, rest: &str) -> String {
    if core.is_empty() {
        rest.to_string()
    } else if rest.is_empty() {
        core.to_string()
    } else {
        format!("{core} {rest}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_strings_score_100() {
        assert_eq!(token_sort_ratio("algebra", "algebra"), 100.0);
        assert_eq!(token_set_ratio("algebra", "algebra"), 100.0);
    }

    #[test]
    fn test_token_sort_is_order_invariant() {
        assert_eq!(token_sort_ratio("linear algebra", "algebra linear"), 100.0);
    }

    #[test]
    fn test_token_sort_demands_equal_multisets() {
        assert!(token_sort_ratio("algebra algebra", "algebra") < 100.0);
    }

    #[test]
    fn test_token_set_ignores_repetition() {
        assert_eq!(token_set_ratio("algebra algebra", "algebra"), 100.0);
    }

    #[test]
    fn test_token_set_subset_scores_high() {
        // The shared core matches itself perfectly against one side.
        assert_eq!(token_set_ratio("analyse reelle", "analyse"), 100.0);
    }

    #[test]
    fn test_unrelated_strings_score_low() {
        assert!(token_sort_ratio("algebra", "geometry") < 50.0);
    }

    #[test]
    fn test_symmetry() {
        let (a, b) = ("analyse complexe", "complexe analyse approfondie");
        assert_eq!(token_sort_ratio(a, b), token_sort_ratio(b, a));
        assert_eq!(token_set_ratio(a, b), token_set_ratio(b, a));
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(token_sort_ratio("", ""), 100.0);
        assert!(token_sort_ratio("algebra", "") < 1.0);
    }
}
