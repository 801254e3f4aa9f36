//! # surface-topics
//!
//! Topic positioning for the topic surface.
//!
//! This crate turns topic-model outputs into positioned observations:
//! each topic present at a time slice is placed at the slice's column and
//! at its cumulative distance along the dendrogram leaf order.
//!
//! ## Features
//! - Cosine distance matrix over topic embeddings
//! - Average-linkage leaf ordering when the topic model supplies none
//! - Typed records for the topic-model export

pub mod dendrogram;
pub mod locator;
pub mod model;
pub mod similarity;

pub use dendrogram::{average_linkage_leaf_order, leaf_path_length};
pub use locator::{locate_topics, TimeSlice, TopicLocator};
pub use model::{FrequencyRecord, PreparedModel, TopicModelOutput, TopicRecord};
pub use similarity::{cosine_similarity, pairwise_distances, DistanceMatrix, Embedding};
