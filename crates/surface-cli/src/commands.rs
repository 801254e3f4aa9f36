//! Command implementations for topic-surface.
//!
//! Handles:
//! - locate: topic-model export -> GeoJSON topic locations
//! - surface: GeoJSON topic locations -> ASCII grid surface
//! - run: both, with derived output file names

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, instrument, warn};

use surface_io::{export_grid, import_observations, read_topic_model, GeoEncoder};
use surface_kde::{interpolate, interpolate_parallel, KdeParams};
use surface_types::{Settings, SurfaceGrid, TopicObservation};

/// Result of a pipeline stage.
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome {
    /// Output written to `path`
    Written { path: PathBuf, items: usize },
    /// Nothing to write; the input held no usable topics
    NoOutput,
}

/// Load settings and apply the global CLI overrides.
pub fn load_settings(config_path: Option<&str>, log_level: Option<&str>) -> Result<Settings> {
    let mut settings = Settings::load(config_path).context("Failed to load configuration")?;
    if let Some(level) = log_level {
        settings.log_level = level.to_string();
    }
    Ok(settings)
}

/// Install the global tracing subscriber. `RUST_LOG` wins over `level`.
pub fn init_tracing(level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

/// Position the topics of a topic-model export and write them as GeoJSON.
#[instrument(skip(settings))]
pub fn locate_command(settings: &Settings, input: &Path, output: &Path) -> Result<StageOutcome> {
    settings.validate()?;

    let model = read_topic_model(input)
        .with_context(|| format!("Failed to read topic model {}", input.display()))?;
    let prepared = model.prepare(settings.top_n_words, settings.min_topic_size)?;

    if prepared.is_empty() {
        warn!(
            topics = prepared.topics.len(),
            slices = prepared.slices.len(),
            "no topics to locate, nothing written"
        );
        return Ok(StageOutcome::NoOutput);
    }

    let locator = prepared.locator().context("Failed to build topic locator")?;
    info!(
        topics = prepared.topics.len(),
        total_distance = locator.total_distance(),
        "computed dendrogram path"
    );
    let observations = locator.locate(&prepared.terms, &prepared.slices)?;

    if observations.is_empty() {
        warn!("no topic has a non-zero frequency, nothing written");
        return Ok(StageOutcome::NoOutput);
    }

    GeoEncoder::new(settings.x_scale, settings.y_scale)
        .export(output, &observations)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!(path = %output.display(), observations = observations.len(), "wrote topic locations");

    Ok(StageOutcome::Written {
        path: output.to_path_buf(),
        items: observations.len(),
    })
}

/// Interpolate observations with the configured parameters.
pub fn compute_surface(
    settings: &Settings,
    observations: &[TopicObservation],
) -> Result<SurfaceGrid> {
    let params = KdeParams::new(settings.row_count, settings.max_dist, settings.z_scale);
    let grid = if settings.parallel {
        interpolate_parallel(observations, &params)?
    } else {
        interpolate(observations, &params)?
    };
    Ok(grid)
}

/// Interpolate GeoJSON topic locations and write the ASCII grid.
#[instrument(skip(settings))]
pub fn surface_command(settings: &Settings, input: &Path, output: &Path) -> Result<StageOutcome> {
    settings.validate()?;

    let observations = import_observations(input)
        .with_context(|| format!("Failed to read topic locations {}", input.display()))?;
    info!(path = %input.display(), observations = observations.len(), "read topic locations");

    let grid = compute_surface(settings, &observations)?;
    export_grid(output, &grid).with_context(|| format!("Failed to write {}", output.display()))?;
    info!(
        path = %output.display(),
        rows = grid.rows(),
        cols = grid.cols(),
        "wrote surface"
    );

    Ok(StageOutcome::Written {
        path: output.to_path_buf(),
        items: grid.rows() * grid.cols(),
    })
}

/// Output files of a full run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutputs {
    pub locations: PathBuf,
    pub surface: PathBuf,
}

impl RunOutputs {
    /// `<dir>/<name>.topiclocation.geojson` and `<dir>/<name>.surface.asc`
    pub fn new(output_dir: &Path, name: &str) -> Self {
        Self {
            locations: output_dir.join(format!("{}.topiclocation.geojson", name)),
            surface: output_dir.join(format!("{}.surface.asc", name)),
        }
    }
}

/// Locate topics and interpolate their surface.
///
/// Returns `None` when the export held nothing to locate.
pub fn run_pipeline(settings: &Settings, input: &Path, name: &str) -> Result<Option<RunOutputs>> {
    let output_dir = settings.output_path();
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;
    let outputs = RunOutputs::new(&output_dir, name);

    match locate_command(settings, input, &outputs.locations)? {
        StageOutcome::NoOutput => return Ok(None),
        StageOutcome::Written { .. } => {}
    }
    surface_command(settings, &outputs.locations, &outputs.surface)?;

    Ok(Some(outputs))
}
