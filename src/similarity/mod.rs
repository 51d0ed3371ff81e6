//! Pairwise similarity backends and near-duplicate merging.
//!
//! The merger and the lexical clusterer are backend-agnostic: anything
//! implementing [`SimilarityBackend`] can drive them, whether the score
//! lives in [-1, 1] (cosine) or [0, 100] (fuzzy ratios).

mod fuzz;
mod merge;

pub use fuzz::{ratio, token_set_ratio, token_sort_ratio};
pub use merge::merge_by_similarity;

/// A symmetric pairwise similarity measure over items of type `T`.
pub trait SimilarityBackend<T> {
    /// Compare two items; higher means more similar.
    fn compare(&self, a: &T, b: &T) -> f64;
}

/// Cosine similarity over embedding vectors, range [-1, 1].
pub struct CosineSimilarity;

impl SimilarityBackend<Vec<f32>> for CosineSimilarity {
    fn compare(&self, a: &Vec<f32>, b: &Vec<f32>) -> f64 {
        cosine_similarity(a, b)
    }
}

/// Token-sort fuzzy ratio over strings, range [0, 100].
pub struct TokenSortSimilarity;

impl SimilarityBackend<String> for TokenSortSimilarity {
    fn compare(&self, a: &String, b: &String) -> f64 {
        token_sort_ratio(a, b)
    }
}

/// Token-set fuzzy ratio over strings, range [0, 100].
pub struct TokenSetSimilarity;

impl SimilarityBackend<String> for TokenSetSimilarity {
    fn compare(&self, a: &String, b: &String) -> f64 {
        token_set_ratio(a, b)
    }
}

/// Cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| (*x as f64) * (*y as f64)).sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Scale a vector to unit L2 norm in place. Zero vectors are left as is.
pub fn l2_normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_identical() {
        let a = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_zero_vector() {
        let a = vec![0.0, 0.0];
        let b = vec![1.0, 0.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_l2_normalize() {
        let mut v = vec![3.0, 4.0];
        l2_normalize(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);

        let mut zero = vec![0.0, 0.0];
        l2_normalize(&mut zero);
        assert_eq!(zero, vec![0.0, 0.0]);
    }
}
