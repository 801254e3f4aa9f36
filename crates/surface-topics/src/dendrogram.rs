//! Dendrogram leaf ordering.
//!
//! Topic models normally hand over the leaf order of their own hierarchy
//! plot. When they don't, the order is rebuilt here from the topic distance
//! matrix with average-linkage agglomerative clustering, so that similar
//! topics end up next to each other on the surface's y axis.

use tracing::debug;

use crate::similarity::DistanceMatrix;

/// Left-to-right leaf positions of an average-linkage dendrogram.
///
/// At each step the closest pair of active clusters is merged; ties go to
/// the lowest cluster slot. Leaves are cluster ids `0..n` and the `k`-th
/// merge creates id `n + k`. The child with the smaller id is placed on the
/// left, so a leaf joining an existing cluster comes before it.
pub fn average_linkage_leaf_order(distances: &DistanceMatrix) -> Vec<usize> {
    let n = distances.len();
    if n == 0 {
        return Vec::new();
    }

    let mut clusters: Vec<Option<Vec<usize>>> = (0..n).map(|i| Some(vec![i])).collect();
    let mut ids: Vec<usize> = (0..n).collect();
    let mut d: Vec<Vec<f64>> = (0..n)
        .map(|i| (0..n).map(|j| distances.get(i, j)).collect())
        .collect();

    for step in 0..n - 1 {
        let mut best: Option<(usize, usize, f64)> = None;
        for i in 0..n {
            if clusters[i].is_none() {
                continue;
            }
            for j in (i + 1)..n {
                if clusters[j].is_none() {
                    continue;
                }
                if best.map_or(true, |(_, _, b)| d[i][j] < b) {
                    best = Some((i, j, d[i][j]));
                }
            }
        }

        let Some((i, j, distance)) = best else {
            break;
        };

        let lower = clusters[i].take().unwrap_or_default();
        let upper = clusters[j].take().unwrap_or_default();
        let size_i = lower.len() as f64;
        let size_j = upper.len() as f64;

        // Lance-Williams update for average linkage
        for k in 0..n {
            if k == i || clusters[k].is_none() {
                continue;
            }
            let merged = (size_i * d[i][k] + size_j * d[j][k]) / (size_i + size_j);
            d[i][k] = merged;
            d[k][i] = merged;
        }

        let (mut leaves, tail) = if ids[i] < ids[j] {
            (lower, upper)
        } else {
            (upper, lower)
        };
        leaves.extend(tail);
        debug!(
            left = ids[i].min(ids[j]),
            right = ids[i].max(ids[j]),
            id = n + step,
            distance,
            "merged topic clusters"
        );
        clusters[i] = Some(leaves);
        ids[i] = n + step;
    }

    clusters.into_iter().flatten().flatten().collect()
}

/// Total distance walked visiting `order` left to right.
pub fn leaf_path_length(order: &[usize], distances: &DistanceMatrix) -> f64 {
    order
        .windows(2)
        .map(|pair| distances.get(pair[0], pair[1]))
        .sum()
}
