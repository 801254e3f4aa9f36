//! Vector similarity functions.
//!
//! Pure Rust implementations without external dependencies.

/// An embedding vector.
pub type Embedding = Vec<f32>;

/// Calculate cosine similarity between two vectors.
///
/// Accumulates in `f64`. Returns value in [-1.0, 1.0] where 1.0 = identical
/// direction, and 0.0 when either vector has zero norm.
///
/// # Panics
/// Panics if vectors have different dimensions.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    assert_eq!(a.len(), b.len(), "Vectors must have same dimension");

    let dot_product: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| f64::from(*x) * f64::from(*y))
        .sum();
    let norm_a: f64 = a.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Symmetric matrix of pairwise topic dissimilarities.
///
/// Indexed by topic position, not topic id. The diagonal is zero.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    size: usize,
    values: Vec<f64>,
}

impl DistanceMatrix {
    /// Number of rows (and columns).
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Distance between positions `i` and `j`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.size + j]
    }
}

/// Calculate pairwise distances between embeddings.
///
/// Distance = 1 - cosine_similarity, clamped at zero so rounding never
/// yields a negative dissimilarity.
pub fn pairwise_distances(embeddings: &[Embedding]) -> DistanceMatrix {
    let n = embeddings.len();
    let mut values = vec![0.0f64; n * n];

    for i in 0..n {
        for j in (i + 1)..n {
            let sim = cosine_similarity(&embeddings[i], &embeddings[j]);
            let dist = (1.0 - sim).max(0.0);
            values[i * n + j] = dist;
            values[j * n + i] = dist;
        }
    }

    DistanceMatrix { size: n, values }
}
