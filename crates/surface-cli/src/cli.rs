//! CLI argument parsing for topic-surface.
//!
//! CLI flags override all other config sources.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use surface_types::Settings;

/// Topic Surface
///
/// Positions topics over time and interpolates their prevalence into a
/// renderable surface.
#[derive(Parser, Debug)]
#[command(name = "topic-surface")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/topic-surface/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Pipeline commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Position topics from a topic-model export and write GeoJSON
    Locate {
        /// Topic-model export (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// GeoJSON output file
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        locate: LocateArgs,
    },

    /// Interpolate GeoJSON topic locations into an ASCII grid
    Surface {
        /// GeoJSON topic locations
        #[arg(short, long)]
        input: PathBuf,

        /// ASCII grid output file
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        surface: SurfaceArgs,
    },

    /// Locate and interpolate in one go
    Run {
        /// Topic-model export (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory (default from config)
        #[arg(long)]
        output_dir: Option<String>,

        /// Model name used for output file names
        #[arg(short, long)]
        name: String,

        #[command(flatten)]
        locate: LocateArgs,

        #[command(flatten)]
        surface: SurfaceArgs,
    },
}

/// Overrides for topic location export
#[derive(Args, Debug, Clone, Default)]
pub struct LocateArgs {
    /// Scale applied to exported x coordinates
    #[arg(long)]
    pub x_scale: Option<f64>,

    /// Scale applied to exported y coordinates
    #[arg(long)]
    pub y_scale: Option<f64>,

    /// Ranked terms kept per topic
    #[arg(long)]
    pub top_n_words: Option<usize>,
}

impl LocateArgs {
    /// Apply the flags that were given.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(x_scale) = self.x_scale {
            settings.x_scale = x_scale;
        }
        if let Some(y_scale) = self.y_scale {
            settings.y_scale = y_scale;
        }
        if let Some(top_n_words) = self.top_n_words {
            settings.top_n_words = top_n_words;
        }
    }
}

/// Overrides for surface interpolation
#[derive(Args, Debug, Clone, Default)]
pub struct SurfaceArgs {
    /// Number of grid rows
    #[arg(long)]
    pub rows: Option<usize>,

    /// KDE bandwidth in distances between time slices
    #[arg(long)]
    pub max_dist: Option<f64>,

    /// Multiplier applied to surface values
    #[arg(long)]
    pub z_scale: Option<f64>,

    /// Compute the surface on a single thread
    #[arg(long)]
    pub sequential: bool,
}

impl SurfaceArgs {
    /// Apply the flags that were given.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(rows) = self.rows {
            settings.row_count = rows;
        }
        if let Some(max_dist) = self.max_dist {
            settings.max_dist = max_dist;
        }
        if let Some(z_scale) = self.z_scale {
            settings.z_scale = z_scale;
        }
        if self.sequential {
            settings.parallel = false;
        }
    }
}
