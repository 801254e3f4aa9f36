//! Kernel density surface over scattered topic observations.
//!
//! The grid has a caller-fixed row count over the y extent; cells are square,
//! so the column count follows from the x extent. Each cell at `(c*g, r*g)`
//! sums the quartic kernel of every observation, weighted by its frequency.
//! The x distance is divided by `n / T^2` (observations over squared slice
//! count) to balance the time axis against the dendrogram axis, and the
//! bandwidth is expressed in grid units per time step.
//!
//! Cost is O(rows * cols * observations) with no spatial pruning.

use std::collections::HashSet;

use rayon::prelude::*;
use tracing::{info, instrument};

use surface_types::{SurfaceError, SurfaceGrid, TopicObservation};

use crate::kernel::{quartic, warped_distance};

/// Upper bound on grid cells, about 2 GiB of `f64` values.
pub const MAX_GRID_CELLS: usize = 1 << 28;

/// Caller parameters of the interpolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KdeParams {
    /// Number of grid rows
    pub row_count: usize,
    /// Bandwidth, in distances between consecutive time slices
    pub max_dist: f64,
    /// Multiplier applied to every cell
    pub z_scale: f64,
}

impl KdeParams {
    pub fn new(row_count: usize, max_dist: f64, z_scale: f64) -> Self {
        Self {
            row_count,
            max_dist,
            z_scale,
        }
    }
}

/// Geometry derived from the observations before any cell is computed.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceSummary {
    pub rows: usize,
    pub cols: usize,
    /// Side length of a square cell
    pub cell_size: f64,
    /// Number of observations
    pub n: usize,
    /// Number of distinct time slices
    pub t: usize,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    /// Kernel bandwidth in surface units
    pub max_dist_units: f64,
    /// Divisor applied to squared x distances
    pub x_warp: f64,
}

impl SurfaceSummary {
    /// Compute grid geometry for `observations`.
    ///
    /// # Errors
    ///
    /// `DegenerateInput` for an empty set, a zero row count, or a bounding box
    /// that yields no cells or more than [`MAX_GRID_CELLS`]; `InvalidInput`
    /// for a non-positive bandwidth.
    pub fn compute(
        observations: &[TopicObservation],
        params: &KdeParams,
    ) -> Result<Self, SurfaceError> {
        if observations.is_empty() {
            return Err(SurfaceError::DegenerateInput(
                "no observations to interpolate".to_string(),
            ));
        }
        if params.row_count == 0 {
            return Err(SurfaceError::DegenerateInput(
                "surface needs at least one row".to_string(),
            ));
        }
        if params.max_dist.is_nan() || params.max_dist <= 0.0 {
            return Err(SurfaceError::InvalidInput(format!(
                "KDE bandwidth must be positive, got {}",
                params.max_dist
            )));
        }

        let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
        for obs in observations {
            x_min = x_min.min(obs.x);
            x_max = x_max.max(obs.x);
            y_min = y_min.min(obs.y);
            y_max = y_max.max(obs.y);
        }

        let cell_size = (y_max - y_min) / params.row_count as f64;
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(SurfaceError::DegenerateInput(format!(
                "y extent {}..{} gives cell size {}",
                y_min, y_max, cell_size
            )));
        }

        let cols = ((x_max - x_min) / cell_size).floor() as usize;
        if cols == 0 {
            return Err(SurfaceError::DegenerateInput(format!(
                "x extent {}..{} is narrower than one cell of {}",
                x_min, x_max, cell_size
            )));
        }
        match params.row_count.checked_mul(cols) {
            Some(cells) if cells <= MAX_GRID_CELLS => {}
            _ => {
                return Err(SurfaceError::DegenerateInput(format!(
                    "{} rows by {} columns exceeds {} cells (cell size {})",
                    params.row_count, cols, MAX_GRID_CELLS, cell_size
                )));
            }
        }

        let n = observations.len();
        let t = observations
            .iter()
            .map(|o| &o.t)
            .collect::<HashSet<_>>()
            .len();
        let x_warp = n as f64 / (t * t) as f64;
        let max_dist_units = params.max_dist * cell_size * (cols as f64 / t as f64);

        Ok(Self {
            rows: params.row_count,
            cols,
            cell_size,
            n,
            t,
            x_min,
            x_max,
            y_min,
            y_max,
            max_dist_units,
            x_warp,
        })
    }
}

/// Interpolate observations into a dense grid, one row after another.
///
/// Identical inputs give bit-identical grids.
#[instrument(skip_all, fields(observations = observations.len(), rows = params.row_count))]
pub fn interpolate(
    observations: &[TopicObservation],
    params: &KdeParams,
) -> Result<SurfaceGrid, SurfaceError> {
    let summary = SurfaceSummary::compute(observations, params)?;
    log_summary(&summary);

    let mut values = vec![0.0; summary.rows * summary.cols];
    values
        .chunks_mut(summary.cols)
        .enumerate()
        .for_each(|(r, row)| fill_row(r, row, observations, &summary, params.z_scale));

    SurfaceGrid::new(summary.rows, summary.cols, summary.cell_size, values)
}

/// Interpolate with rows spread over the rayon pool.
///
/// Each worker owns whole rows and sums cells in the same order as
/// [`interpolate`], so both produce the same grid.
#[instrument(skip_all, fields(observations = observations.len(), rows = params.row_count))]
pub fn interpolate_parallel(
    observations: &[TopicObservation],
    params: &KdeParams,
) -> Result<SurfaceGrid, SurfaceError> {
    let summary = SurfaceSummary::compute(observations, params)?;
    log_summary(&summary);

    let mut values = vec![0.0; summary.rows * summary.cols];
    values
        .par_chunks_mut(summary.cols)
        .enumerate()
        .for_each(|(r, row)| fill_row(r, row, observations, &summary, params.z_scale));

    SurfaceGrid::new(summary.rows, summary.cols, summary.cell_size, values)
}

fn fill_row(
    r: usize,
    row: &mut [f64],
    observations: &[TopicObservation],
    summary: &SurfaceSummary,
    z_scale: f64,
) {
    let g = summary.cell_size;
    for (c, cell) in row.iter_mut().enumerate() {
        let at = (c as f64 * g, r as f64 * g);
        let mut sum = 0.0;
        for obs in observations {
            sum += quartic(
                warped_distance(at, (obs.x, obs.y), summary.x_warp),
                summary.max_dist_units,
                obs.n,
            );
        }
        *cell = sum * z_scale;
    }
}

fn log_summary(s: &SurfaceSummary) {
    info!(
        rows = s.rows,
        cols = s.cols,
        cell_size = %format!("{:.2}", s.cell_size),
        n = s.n,
        t = s.t,
        n_per_t = %format!("{:.2}", s.n as f64 / s.t as f64),
        x = %format!("{}-{}", s.x_max, s.x_min),
        y = %format!("{}-{}", s.y_max, s.y_min),
        max_dist = %format!("{:.2}", s.max_dist_units),
        x_warp = %format!("{:.2}", s.x_warp),
        "computing surface"
    );
}
