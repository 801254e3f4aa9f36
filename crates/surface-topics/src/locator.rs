//! Topic positioning on the surface.
//!
//! Every topic present at a time slice becomes one [`TopicObservation`]:
//! `x` is the slice's column, `y` the distance walked along the dendrogram
//! leaf order up to that topic, normalized by the full leaf path length and
//! stretched to the number of slices. Only topics present at the slice take
//! part in the walk, so a topic absent at time `t` neither emits nor adds
//! distance.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, instrument};

use surface_types::{
    label_from_terms, SurfaceError, TermWeight, TimeLabel, TopicId, TopicObservation,
    OUTLIER_TOPIC_ID,
};

use crate::dendrogram::{average_linkage_leaf_order, leaf_path_length};
use crate::similarity::{pairwise_distances, DistanceMatrix, Embedding};

/// Topic frequencies observed at one time slice.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSlice {
    /// Raw label of the slice
    pub label: TimeLabel,
    /// Topic id -> frequency; absent topics are missing or zero
    pub frequencies: HashMap<TopicId, f64>,
}

impl TimeSlice {
    pub fn new(label: impl Into<TimeLabel>) -> Self {
        Self {
            label: label.into(),
            frequencies: HashMap::new(),
        }
    }

    /// Builder-style frequency insertion.
    pub fn with(mut self, topic: TopicId, frequency: f64) -> Self {
        self.frequencies.insert(topic, frequency);
        self
    }

    /// Frequency of `topic`, `None` when the topic is absent.
    pub fn frequency(&self, topic: TopicId) -> Option<f64> {
        self.frequencies.get(&topic).copied().filter(|f| *f > 0.0)
    }
}

/// Positions topics using a fixed dendrogram leaf order.
///
/// The distance matrix and the leaf path length are computed once here and
/// shared by every time slice.
#[derive(Debug, Clone)]
pub struct TopicLocator {
    positions: HashMap<TopicId, usize>,
    distances: DistanceMatrix,
    leaf_order: Vec<TopicId>,
    total: f64,
}

impl TopicLocator {
    /// Create a locator from ascending topic ids, their embeddings and a
    /// dendrogram leaf order.
    ///
    /// The leaf order may contain the outlier topic, which is skipped. Any
    /// other entry must be a known topic, and every topic must appear once.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for misaligned inputs, `DegenerateInput` when the
    /// leaf path has zero total length.
    pub fn new(
        topics: &[TopicId],
        embeddings: &[Embedding],
        leaf_order: &[TopicId],
    ) -> Result<Self, SurfaceError> {
        let positions = index_topics(topics, embeddings)?;

        let mut seen = HashSet::new();
        let mut order = Vec::with_capacity(topics.len());
        for &leaf in leaf_order {
            if leaf == OUTLIER_TOPIC_ID {
                continue;
            }
            if !positions.contains_key(&leaf) {
                return Err(SurfaceError::InvalidInput(format!(
                    "leaf order references unknown topic {}",
                    leaf
                )));
            }
            if !seen.insert(leaf) {
                return Err(SurfaceError::InvalidInput(format!(
                    "topic {} appears twice in leaf order",
                    leaf
                )));
            }
            order.push(leaf);
        }
        if order.len() != topics.len() {
            return Err(SurfaceError::InvalidInput(format!(
                "leaf order covers {} of {} topics",
                order.len(),
                topics.len()
            )));
        }

        Self::build(positions, pairwise_distances(embeddings), order)
    }

    /// Create a locator whose leaf order is derived from the embeddings with
    /// average-linkage clustering.
    pub fn from_embeddings(
        topics: &[TopicId],
        embeddings: &[Embedding],
    ) -> Result<Self, SurfaceError> {
        let positions = index_topics(topics, embeddings)?;
        let distances = pairwise_distances(embeddings);
        let order = average_linkage_leaf_order(&distances)
            .into_iter()
            .map(|pos| topics[pos])
            .collect();
        Self::build(positions, distances, order)
    }

    fn build(
        positions: HashMap<TopicId, usize>,
        distances: DistanceMatrix,
        leaf_order: Vec<TopicId>,
    ) -> Result<Self, SurfaceError> {
        let leaf_positions: Vec<usize> = leaf_order.iter().map(|id| positions[id]).collect();
        let total = leaf_path_length(&leaf_positions, &distances);

        if !(total.is_finite() && total > 0.0) {
            return Err(SurfaceError::DegenerateInput(format!(
                "dendrogram leaf path over {} topics has zero length",
                leaf_order.len()
            )));
        }

        debug!(topics = leaf_order.len(), total, "built topic locator");

        Ok(Self {
            positions,
            distances,
            leaf_order,
            total,
        })
    }

    /// Leaf order without the outlier topic.
    pub fn leaf_order(&self) -> &[TopicId] {
        &self.leaf_order
    }

    /// Total path length of the leaf traversal.
    pub fn total_distance(&self) -> f64 {
        self.total
    }

    /// Dissimilarity between two known topics.
    pub fn distance(&self, a: TopicId, b: TopicId) -> Option<f64> {
        let i = *self.positions.get(&a)?;
        let j = *self.positions.get(&b)?;
        Some(self.distances.get(i, j))
    }

    /// Position every topic present at every slice.
    ///
    /// Slices are processed in the given order; the slice index becomes `x`.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when a topic has no ranked terms or a frequency is
    /// negative or not finite. Nothing is emitted on error.
    #[instrument(skip_all, fields(slices = slices.len()))]
    pub fn locate(
        &self,
        terms: &HashMap<TopicId, Vec<TermWeight>>,
        slices: &[TimeSlice],
    ) -> Result<Vec<TopicObservation>, SurfaceError> {
        for topic in &self.leaf_order {
            if !terms.contains_key(topic) {
                return Err(SurfaceError::InvalidInput(format!(
                    "no ranked terms for topic {}",
                    topic
                )));
            }
        }
        for slice in slices {
            if let Some((topic, freq)) = slice
                .frequencies
                .iter()
                .find(|(_, f)| !f.is_finite() || **f < 0.0)
            {
                return Err(SurfaceError::InvalidInput(format!(
                    "topic {} has invalid frequency {} at slice {}",
                    topic, freq, slice.label
                )));
            }
        }

        let labels: HashMap<TopicId, String> = terms
            .iter()
            .map(|(id, t)| (*id, label_from_terms(t)))
            .collect();
        let slice_count = slices.len() as f64;
        let mut observations = Vec::new();

        for (col, slice) in slices.iter().enumerate() {
            let mut cumulative = 0.0;
            let mut previous: Option<usize> = None;

            for &leaf in &self.leaf_order {
                let Some(n) = slice.frequency(leaf) else {
                    continue;
                };
                let pos = self.positions[&leaf];
                if let Some(prev) = previous {
                    cumulative += self.distances.get(prev, pos);
                }

                observations.push(TopicObservation {
                    x: col as f64,
                    y: (cumulative / self.total) * slice_count,
                    t: slice.label.clone(),
                    id: Some(leaf),
                    n,
                    label: labels[&leaf].clone(),
                    top_terms: terms[&leaf].clone(),
                });
                previous = Some(pos);
            }
        }

        info!(
            observations = observations.len(),
            slices = slices.len(),
            "located topics"
        );
        Ok(observations)
    }
}

/// Validate topic/embedding alignment and map ids to positions.
fn index_topics(
    topics: &[TopicId],
    embeddings: &[Embedding],
) -> Result<HashMap<TopicId, usize>, SurfaceError> {
    if topics.len() != embeddings.len() {
        return Err(SurfaceError::InvalidInput(format!(
            "{} topics but {} embeddings",
            topics.len(),
            embeddings.len()
        )));
    }
    if let Some(first) = embeddings.first() {
        if let Some(bad) = embeddings.iter().position(|e| e.len() != first.len()) {
            return Err(SurfaceError::InvalidInput(format!(
                "embedding {} has dimension {}, expected {}",
                bad,
                embeddings[bad].len(),
                first.len()
            )));
        }
    }
    if topics.contains(&OUTLIER_TOPIC_ID) {
        return Err(SurfaceError::InvalidInput(
            "outlier topic cannot be positioned".to_string(),
        ));
    }
    if topics.windows(2).any(|w| w[0] >= w[1]) {
        return Err(SurfaceError::InvalidInput(
            "topic ids must be unique and ascending".to_string(),
        ));
    }

    Ok(topics.iter().enumerate().map(|(i, id)| (*id, i)).collect())
}

/// Position topics in one call: build a [`TopicLocator`] and run it.
pub fn locate_topics(
    topics: &[TopicId],
    embeddings: &[Embedding],
    leaf_order: &[TopicId],
    terms: &HashMap<TopicId, Vec<TermWeight>>,
    slices: &[TimeSlice],
) -> Result<Vec<TopicObservation>, SurfaceError> {
    TopicLocator::new(topics, embeddings, leaf_order)?.locate(terms, slices)
}
