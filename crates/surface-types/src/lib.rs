//! # surface-types
//!
//! Shared domain types for the topic surface pipeline.
//!
//! This crate defines the data structures passed between pipeline stages:
//! - Observations: topics positioned at one time slice
//! - Grids: dense interpolated surfaces
//! - Settings: layered configuration
//! - Errors: the unified `SurfaceError`

pub mod config;
pub mod error;
pub mod grid;
pub mod observation;

pub use config::Settings;
pub use error::SurfaceError;
pub use grid::SurfaceGrid;
pub use observation::{
    label_from_terms, terms_as_string, TermWeight, TimeLabel, TopicId, TopicObservation,
    LABEL_TERM_COUNT, OUTLIER_TOPIC_ID,
};
