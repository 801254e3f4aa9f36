//! # surface-kde
//!
//! Kernel density interpolation of positioned topic observations into a
//! dense surface grid, using a quartic kernel over a warped distance.

pub mod interpolate;
pub mod kernel;

pub use interpolate::{
    interpolate, interpolate_parallel, KdeParams, SurfaceSummary, MAX_GRID_CELLS,
};
pub use kernel::{quartic, warped_distance};
