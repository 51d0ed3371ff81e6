//! Density clustering for larger document sets.
//!
//! Implements HDBSCAN (Campello, Moulavi, Sander 2013): core distances from
//! the `min_samples`-th neighbor, a minimum spanning tree over mutual
//! reachability distances, a condensed cluster tree pruned at
//! `min_cluster_size`, and excess-of-mass cluster selection. Points outside
//! every selected cluster are labeled [`NOISE`]. Everything is O(n²) in the
//! dense pairwise step, which is fine at the tens-to-hundreds scale this
//! engine targets, and fully deterministic for identical input.

use super::NOISE;

/// Parameters for the density path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DensityParams {
    pub min_cluster_size: usize,
    pub min_samples: usize,
}

/// Cluster `vectors`, returning one label per vector with `-1` for noise.
pub fn cluster(vectors: &[Vec<f32>], params: &DensityParams) -> Vec<i32> {
    let n = vectors.len();
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![NOISE];
    }

    let dists = pairwise_distances(vectors);
    let core = core_distances(&dists, n, params.min_samples);

    let mut mst = minimum_spanning_tree(n, |i, j| {
        dists[i * n + j].max(core[i]).max(core[j])
    });
    mst.sort_by(|a, b| a.2.total_cmp(&b.2));

    let dendrogram = Dendrogram::build(&mst, n);
    let tree = CondensedTree::condense(&dendrogram, n, params.min_cluster_size.max(2));
    tree.extract_labels(n)
}

fn pairwise_distances(vectors: &[Vec<f32>]) -> Vec<f32> {
    let n = vectors.len();
    let mut dists = vec![0.0f32; n * n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d = euclidean(&vectors[i], &vectors[j]);
            dists[i * n + j] = d;
            dists[j * n + i] = d;
        }
    }
    dists
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

/// Distance to the `min_samples`-th nearest neighbor, counting the point
/// among its own neighbors, clamped to the sample size.
fn core_distances(dists: &[f32], n: usize, min_samples: usize) -> Vec<f32> {
    let k = min_samples.saturating_sub(1).clamp(1, n - 1);
    let mut core = Vec::with_capacity(n);
    for i in 0..n {
        let mut row: Vec<f32> = (0..n).filter(|&j| j != i).map(|j| dists[i * n + j]).collect();
        row.sort_by(|a, b| a.total_cmp(b));
        core.push(row[k - 1]);
    }
    core
}

/// Prim's algorithm on the dense complete graph. Returns `(u, v, weight)`.
fn minimum_spanning_tree(
    n: usize,
    weight: impl Fn(usize, usize) -> f32,
) -> Vec<(usize, usize, f32)> {
    let mut in_tree = vec![false; n];
    let mut best = vec![f32::INFINITY; n];
    let mut parent = vec![usize::MAX; n];
    best[0] = 0.0;

    for _ in 0..n {
        let mut u = usize::MAX;
        let mut u_best = f32::INFINITY;
        for i in 0..n {
            if !in_tree[i] && best[i] < u_best {
                u_best = best[i];
                u = i;
            }
        }
        if u == usize::MAX {
            break;
        }
        in_tree[u] = true;

        for v in 0..n {
            if in_tree[v] {
                continue;
            }
            let w = weight(u, v);
            if w < best[v] {
                best[v] = w;
                parent[v] = u;
            }
        }
    }

    (1..n)
        .filter(|&v| parent[v] != usize::MAX)
        .map(|v| (parent[v], v, best[v]))
        .collect()
}

/// Single-linkage dendrogram over the MST. Leaves are `0..n`; internal
/// merge nodes are `n..2n - 1`, with `children`, `distance`, and `size`
/// indexed by `node - n`.
struct Dendrogram {
    children: Vec<(usize, usize)>,
    distance: Vec<f32>,
    size: Vec<usize>,
    root: usize,
    n: usize,
}

impl Dendrogram {
    /// Sweep MST edges in ascending distance order, creating one internal
    /// node per merge. `node_of` maps each union-find root to the dendrogram
    /// node currently representing its component.
    fn build(mst: &[(usize, usize, f32)], n: usize) -> Self {
        let mut parent: Vec<usize> = (0..n).collect();
        let mut node_of: Vec<usize> = (0..n).collect();
        let mut children = Vec::with_capacity(n.saturating_sub(1));
        let mut distance = Vec::with_capacity(n.saturating_sub(1));
        let mut size = Vec::with_capacity(n.saturating_sub(1));
        let mut root = 0;

        let find = |parent: &mut Vec<usize>, mut x: usize| {
            while parent[x] != x {
                parent[x] = parent[parent[x]];
                x = parent[x];
            }
            x
        };

        for &(u, v, d) in mst {
            let ru = find(&mut parent, u);
            let rv = find(&mut parent, v);
            if ru == rv {
                continue;
            }
            let (nu, nv) = (node_of[ru], node_of[rv]);
            let su = if nu < n { 1 } else { size[nu - n] };
            let sv = if nv < n { 1 } else { size[nv - n] };

            let node = n + children.len();
            children.push((nu, nv));
            distance.push(d);
            size.push(su + sv);

            parent[rv] = ru;
            node_of[ru] = node;
            root = node;
        }

        Self { children, distance, size, root, n }
    }

    fn node_size(&self, node: usize) -> usize {
        if node < self.n {
            1
        } else {
            self.size[node - self.n]
        }
    }

    /// Collect the leaf points under `node`.
    fn leaves_into(&self, node: usize, out: &mut Vec<usize>) {
        let mut stack = vec![node];
        while let Some(x) = stack.pop() {
            if x < self.n {
                out.push(x);
            } else {
                let (l, r) = self.children[x - self.n];
                stack.push(l);
                stack.push(r);
            }
        }
    }
}

/// One row of the condensed cluster tree: either a point falling out of a
/// cluster (`child < n`, `size == 1`) or a child cluster splitting off.
struct CondensedRow {
    parent: usize,
    child: usize,
    lambda: f64,
    size: usize,
}

struct CondensedTree {
    rows: Vec<CondensedRow>,
    /// Number of clusters; cluster ids are `n..n + count`.
    count: usize,
}

impl CondensedTree {
    /// Walk the dendrogram top-down. A split where both sides reach
    /// `min_cluster_size` creates two child clusters. A split where only
    /// one side does sheds the small side's points and keeps the cluster on
    /// the big side. When neither side is large enough the cluster ends and
    /// all its remaining points fall out at that split.
    fn condense(dendrogram: &Dendrogram, n: usize, min_cluster_size: usize) -> Self {
        let mut rows: Vec<CondensedRow> = Vec::new();
        if dendrogram.children.is_empty() {
            return Self { rows, count: 0 };
        }

        let mut next_id = n;
        let root_cluster = next_id;
        next_id += 1;

        let mut stack = vec![(dendrogram.root, root_cluster)];
        let mut fallen = Vec::new();

        while let Some((node, cluster)) = stack.pop() {
            let (l, r) = dendrogram.children[node - n];
            let dist = dendrogram.distance[node - n];
            let lambda = if dist > 0.0 {
                1.0 / dist as f64
            } else {
                f64::INFINITY
            };
            let (sl, sr) = (dendrogram.node_size(l), dendrogram.node_size(r));
            let l_big = sl >= min_cluster_size;
            let r_big = sr >= min_cluster_size;

            if l_big && r_big {
                for (side, size) in [(l, sl), (r, sr)] {
                    let id = next_id;
                    next_id += 1;
                    rows.push(CondensedRow { parent: cluster, child: id, lambda, size });
                    stack.push((side, id));
                }
            } else if l_big || r_big {
                let (big, small) = if l_big { (l, r) } else { (r, l) };
                fallen.clear();
                dendrogram.leaves_into(small, &mut fallen);
                for &p in &fallen {
                    rows.push(CondensedRow { parent: cluster, child: p, lambda, size: 1 });
                }
                stack.push((big, cluster));
            } else {
                fallen.clear();
                dendrogram.leaves_into(l, &mut fallen);
                dendrogram.leaves_into(r, &mut fallen);
                for &p in &fallen {
                    rows.push(CondensedRow { parent: cluster, child: p, lambda, size: 1 });
                }
            }
        }

        Self { rows, count: next_id - n }
    }

    /// Excess-of-mass selection followed by point labeling.
    fn extract_labels(&self, n: usize) -> Vec<i32> {
        if self.count == 0 {
            return vec![NOISE; n];
        }

        // Birth lambda: the lambda at which a cluster first appears as a
        // child. Clusters never appearing as a child (roots) are born at 0.
        let mut birth = vec![0.0f64; self.count];
        let mut is_child = vec![false; self.count];
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); self.count];

        for row in &self.rows {
            if row.size > 1 && row.child >= n {
                let child = row.child - n;
                birth[child] = row.lambda;
                is_child[child] = true;
                children[row.parent - n].push(child);
            }
        }

        // stability(c) = sum over rows with parent c of size * (lambda - birth(c)).
        let mut stability = vec![0.0f64; self.count];
        for row in &self.rows {
            let parent = row.parent - n;
            stability[parent] += row.size as f64 * (row.lambda - birth[parent]);
        }

        // Select the non-overlapping cluster set maximizing total stability:
        // a node wins over its subtree when its own stability exceeds the
        // best total its children can reach. The tree root itself is never
        // a candidate; a dataset-spanning "cluster" carries no information.
        let mut selected = vec![false; self.count];
        for root in 0..self.count {
            if !is_child[root] {
                for &child in &children[root] {
                    self.select(child, &children, &stability, &mut selected);
                }
            }
        }

        let mut labels = vec![NOISE; n];
        let mut next_label = 0i32;
        for cluster in 0..self.count {
            if selected[cluster] {
                self.label_subtree(cluster, next_label, n, &mut labels);
                next_label += 1;
            }
        }
        labels
    }

    /// Best achievable stability within the subtree rooted at `node`.
    fn subtree_stability(&self, node: usize, children: &[Vec<usize>], stability: &[f64]) -> f64 {
        if children[node].is_empty() {
            return stability[node];
        }
        let from_children: f64 = children[node]
            .iter()
            .map(|&c| self.subtree_stability(c, children, stability))
            .sum();
        stability[node].max(from_children)
    }

    fn select(
        &self,
        node: usize,
        children: &[Vec<usize>],
        stability: &[f64],
        selected: &mut [bool],
    ) {
        if children[node].is_empty() {
            selected[node] = true;
            return;
        }
        let from_children: f64 = children[node]
            .iter()
            .map(|&c| self.subtree_stability(c, children, stability))
            .sum();
        if stability[node] > from_children {
            selected[node] = true;
        } else {
            for &c in &children[node] {
                self.select(c, children, stability, selected);
            }
        }
    }

    /// Label every point that fell out anywhere in `cluster`'s subtree.
    /// Selection never descends past a chosen node, so no descendant is
    /// independently selected.
    fn label_subtree(&self, cluster: usize, label: i32, n: usize, labels: &mut [i32]) {
        let id = cluster + n;
        for row in &self.rows {
            if row.parent != id {
                continue;
            }
            if row.size == 1 && row.child < n {
                labels[row.child] = label;
            } else if row.child >= n {
                self.label_subtree(row.child - n, label, n, labels);
            }
        }
    }

}
