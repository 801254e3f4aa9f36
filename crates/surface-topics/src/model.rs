//! Topic-model outputs handed over by the external topic modeller.
//!
//! The modeller exports ranked terms, an embedding and optionally a size per
//! topic, the per-slice topic frequencies, and optionally the leaf order of
//! its hierarchy plot. [`TopicModelOutput::prepare`] turns that into the
//! typed inputs of [`TopicLocator`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use surface_types::{SurfaceError, TermWeight, TimeLabel, TopicId, OUTLIER_TOPIC_ID};

use crate::locator::{TimeSlice, TopicLocator};
use crate::similarity::Embedding;

/// One topic as exported by the topic model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicRecord {
    /// Topic identifier (`-1` for outliers)
    pub id: TopicId,
    /// Number of documents assigned to the topic
    #[serde(default)]
    pub size: Option<u64>,
    /// Ranked `(term, weight)` pairs, weight descending
    pub top_terms: Vec<(String, f64)>,
    /// Topic embedding
    pub embedding: Embedding,
}

/// Frequency of one topic at one time slice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrequencyRecord {
    pub topic: TopicId,
    pub timestamp: TimeLabel,
    pub frequency: f64,
}

/// Complete topic-model export.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicModelOutput {
    pub topics: Vec<TopicRecord>,
    /// Dendrogram leaf order; derived from embeddings when absent
    #[serde(default)]
    pub leaf_order: Option<Vec<TopicId>>,
    pub frequencies: Vec<FrequencyRecord>,
}

/// Locator inputs extracted from a [`TopicModelOutput`].
#[derive(Debug, Clone)]
pub struct PreparedModel {
    /// Ascending topic ids, outlier removed
    pub topics: Vec<TopicId>,
    /// Embeddings aligned with `topics`
    pub embeddings: Vec<Embedding>,
    /// Ranked terms per topic, truncated to the configured count
    pub terms: HashMap<TopicId, Vec<TermWeight>>,
    /// Leaf order supplied by the topic model, if any
    pub leaf_order: Option<Vec<TopicId>>,
    /// Time slices in first-seen order
    pub slices: Vec<TimeSlice>,
}

impl PreparedModel {
    /// True when there is nothing to position.
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty() || self.slices.is_empty()
    }

    /// Build the locator, deriving the leaf order when none was supplied.
    pub fn locator(&self) -> Result<TopicLocator, SurfaceError> {
        match &self.leaf_order {
            Some(order) => TopicLocator::new(&self.topics, &self.embeddings, order),
            None => TopicLocator::from_embeddings(&self.topics, &self.embeddings),
        }
    }
}

impl TopicModelOutput {
    /// Parse an export from JSON.
    pub fn from_json(json: &str) -> Result<Self, SurfaceError> {
        serde_json::from_str(json).map_err(|e| SurfaceError::InvalidInput(e.to_string()))
    }

    /// Extract locator inputs.
    ///
    /// Drops the outlier topic, sorts topics ascending, keeps the first
    /// `top_n_words` terms of each topic and groups frequencies by slice.
    pub fn prepare(
        self,
        top_n_words: usize,
        min_topic_size: u64,
    ) -> Result<PreparedModel, SurfaceError> {
        let mut records: Vec<TopicRecord> = self
            .topics
            .into_iter()
            .filter(|t| t.id != OUTLIER_TOPIC_ID)
            .collect();
        records.sort_by_key(|t| t.id);

        if let Some(dup) = records.windows(2).find(|w| w[0].id == w[1].id) {
            return Err(SurfaceError::InvalidInput(format!(
                "topic {} exported twice",
                dup[0].id
            )));
        }

        for record in &records {
            if let Some(size) = record.size.filter(|s| *s < min_topic_size) {
                warn!(
                    topic = record.id,
                    size, min_topic_size, "topic smaller than minimum topic size"
                );
            }
        }

        let topics: Vec<TopicId> = records.iter().map(|t| t.id).collect();
        let mut embeddings = Vec::with_capacity(records.len());
        let mut terms = HashMap::with_capacity(records.len());
        for record in records {
            let ranked = record
                .top_terms
                .into_iter()
                .take(top_n_words)
                .map(|(term, weight)| TermWeight::new(term, weight))
                .collect();
            terms.insert(record.id, ranked);
            embeddings.push(record.embedding);
        }

        let slices = group_by_slice(self.frequencies);
        debug!(
            topics = topics.len(),
            slices = slices.len(),
            "prepared topic model output"
        );

        Ok(PreparedModel {
            topics,
            embeddings,
            terms,
            leaf_order: self.leaf_order,
            slices,
        })
    }
}

/// Group frequency rows into slices, in first-seen timestamp order.
///
/// Repeated `(topic, timestamp)` rows are summed.
pub fn group_by_slice(records: Vec<FrequencyRecord>) -> Vec<TimeSlice> {
    let mut slices: Vec<TimeSlice> = Vec::new();
    let mut index: HashMap<TimeLabel, usize> = HashMap::new();

    for record in records {
        let pos = *index.entry(record.timestamp.clone()).or_insert_with(|| {
            slices.push(TimeSlice::new(record.timestamp.clone()));
            slices.len() - 1
        });
        *slices[pos].frequencies.entry(record.topic).or_insert(0.0) += record.frequency;
    }

    slices
}
