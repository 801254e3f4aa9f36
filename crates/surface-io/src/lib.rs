//! # surface-io
//!
//! File formats at the edges of the topic surface pipeline:
//! - GeoJSON point features for positioned topic observations
//! - ASCII grid text for interpolated surfaces
//! - JSON exports from the external topic modeller

pub mod geo;
pub mod grid;
pub mod model;

pub use geo::{
    from_collection, import_observations, read_observations, FeatureCollection, GeoEncoder,
};
pub use grid::{export_grid, write_grid};
pub use model::read_topic_model;
