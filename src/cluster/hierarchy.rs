//! Hierarchical clustering for small document sets.
//!
//! Bottom-up agglomerative merging with average linkage over Euclidean
//! distances. Every vector starts as its own cluster and the closest pair
//! is merged repeatedly until the closest remaining pair sits at or beyond
//! the distance threshold. Every vector ends up in a cluster; the caller
//! treats singletons as clusters of one, not as noise.

/// Cluster `vectors`, returning one non-negative label per vector.
///
/// Labels are assigned in order of each cluster's earliest member, so the
/// first vector always gets label `0` and the output is deterministic for
/// identical input.
pub fn cluster(vectors: &[Vec<f32>], distance_threshold: f32) -> Vec<i32> {
    let n = vectors.len();
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![0];
    }

    let mut dists = vec![0.0f32; n * n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d = euclidean(&vectors[i], &vectors[j]);
            dists[i * n + j] = d;
            dists[j * n + i] = d;
        }
    }

    let mut active = vec![true; n];
    let mut sizes = vec![1usize; n];
    // Which cluster slot each vector currently belongs to.
    let mut slot: Vec<usize> = (0..n).collect();

    loop {
        // Closest active pair, scanning in index order so ties break toward
        // the earliest pair.
        let mut best = f32::INFINITY;
        let mut pair = None;
        for i in 0..n {
            if !active[i] {
                continue;
            }
            for j in (i + 1)..n {
                if active[j] && dists[i * n + j] < best {
                    best = dists[i * n + j];
                    pair = Some((i, j));
                }
            }
        }

        let Some((i, j)) = pair else { break };
        if best >= distance_threshold {
            break;
        }

        // Average linkage: the merged cluster's distance to every other
        // cluster is the size-weighted mean of the two parts' distances.
        let (si, sj) = (sizes[i] as f32, sizes[j] as f32);
        for k in 0..n {
            if !active[k] || k == i || k == j {
                continue;
            }
            let d = (si * dists[i * n + k] + sj * dists[j * n + k]) / (si + sj);
            dists[i * n + k] = d;
            dists[k * n + i] = d;
        }

        sizes[i] += sizes[j];
        active[j] = false;
        for s in slot.iter_mut() {
            if *s == j {
                *s = i;
            }
        }
    }

    // Relabel surviving slots in order of first appearance.
    let mut label_of = vec![-1i32; n];
    let mut next = 0i32;
    slot.iter()
        .map(|&s| {
            if label_of[s] < 0 {
                label_of[s] = next;
                next += 1;
            }
            label_of[s]
        })
        .collect()
}

fn euclidean(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum::<f32>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_tight_groups() {
        let data = vec![
            vec![0.0, 0.0],
            vec![0.1, 0.0],
            vec![0.0, 0.1],
            vec![5.0, 5.0],
            vec![5.1, 5.0],
        ];
        let labels = cluster(&data, 0.3);
        assert_eq!(labels.len(), 5);
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[0], labels[2]);
        assert_eq!(labels[3], labels[4]);
        assert_ne!(labels[0], labels[3]);
    }

    #[test]
    fn test_no_merges_beyond_threshold() {
        let data = vec![vec![0.0], vec![1.0], vec![2.0]];
        let labels = cluster(&data, 0.5);
        assert_eq!(labels, vec![0, 1, 2]);
    }

    #[test]
    fn test_everything_merges_under_loose_threshold() {
        let data = vec![vec![0.0], vec![1.0], vec![2.0]];
        let labels = cluster(&data, 100.0);
        assert!(labels.iter().all(|&l| l == 0));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        // Exactly at the threshold the pair must stay apart.
        let data = vec![vec![0.0], vec![0.3]];
        assert_eq!(cluster(&data, 0.3), vec![0, 1]);
        assert_eq!(cluster(&data, 0.31), vec![0, 0]);
    }

    #[test]
    fn test_single_vector() {
        assert_eq!(cluster(&[vec![1.0, 2.0]], 0.3), vec![0]);
    }

    #[test]
    fn test_empty_input() {
        let data: Vec<Vec<f32>> = vec![];
        assert!(cluster(&data, 0.3).is_empty());
    }

    #[test]
    fn test_labels_follow_first_appearance() {
        let data = vec![vec![10.0], vec![0.0], vec![10.05], vec![0.05]];
        let labels = cluster(&data, 0.3);
        assert_eq!(labels, vec![0, 1, 0, 1]);
    }
}
