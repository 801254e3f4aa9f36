//! Configuration loading for topic-surface.
//!
//! Layered config: defaults -> config file -> env vars -> CLI flags.
//! The default config file lives at ~/.config/topic-surface/config.toml.

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::SurfaceError;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Vertical resolution of the surface grid
    #[serde(default = "default_row_count")]
    pub row_count: usize,

    /// KDE bandwidth, in distances between consecutive time slices
    #[serde(default = "default_max_dist")]
    pub max_dist: f64,

    /// Multiplier applied to every surface value
    #[serde(default = "default_scale_one")]
    pub z_scale: f64,

    /// Scale applied to x coordinates on GeoJSON export
    #[serde(default = "default_axis_scale")]
    pub x_scale: f64,

    /// Scale applied to y coordinates on GeoJSON export
    #[serde(default = "default_axis_scale")]
    pub y_scale: f64,

    /// Ranked terms retained per topic
    #[serde(default = "default_top_n_words")]
    pub top_n_words: usize,

    /// Minimum documents per topic expected from the topic model
    #[serde(default = "default_min_topic_size")]
    pub min_topic_size: u64,

    /// Compute surface rows on a worker pool
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Directory receiving pipeline outputs
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

fn default_row_count() -> usize {
    100
}

fn default_max_dist() -> f64 {
    100.0
}

fn default_scale_one() -> f64 {
    1.0
}

fn default_axis_scale() -> f64 {
    100.0
}

fn default_top_n_words() -> usize {
    30
}

fn default_min_topic_size() -> u64 {
    1000
}

fn default_parallel() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_output_dir() -> String {
    ".".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            row_count: default_row_count(),
            max_dist: default_max_dist(),
            z_scale: default_scale_one(),
            x_scale: default_axis_scale(),
            y_scale: default_axis_scale(),
            top_n_words: default_top_n_words(),
            min_topic_size: default_min_topic_size(),
            parallel: default_parallel(),
            log_level: default_log_level(),
            output_dir: default_output_dir(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/topic-surface/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (SURFACE_*)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, SurfaceError> {
        let config_dir = ProjectDirs::from("", "", "topic-surface")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("row_count", default_row_count() as i64)
            .map_err(|e| SurfaceError::Config(e.to_string()))?
            .set_default("max_dist", default_max_dist())
            .map_err(|e| SurfaceError::Config(e.to_string()))?
            .set_default("z_scale", default_scale_one())
            .map_err(|e| SurfaceError::Config(e.to_string()))?
            .set_default("x_scale", default_axis_scale())
            .map_err(|e| SurfaceError::Config(e.to_string()))?
            .set_default("y_scale", default_axis_scale())
            .map_err(|e| SurfaceError::Config(e.to_string()))?
            .set_default("top_n_words", default_top_n_words() as i64)
            .map_err(|e| SurfaceError::Config(e.to_string()))?
            .set_default("min_topic_size", default_min_topic_size() as i64)
            .map_err(|e| SurfaceError::Config(e.to_string()))?
            .set_default("parallel", default_parallel())
            .map_err(|e| SurfaceError::Config(e.to_string()))?
            .set_default("log_level", default_log_level())
            .map_err(|e| SurfaceError::Config(e.to_string()))?
            .set_default("output_dir", default_output_dir())
            .map_err(|e| SurfaceError::Config(e.to_string()))?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Format: SURFACE_ROW_COUNT, SURFACE_MAX_DIST, SURFACE_LOG_LEVEL, etc.
        builder = builder.add_source(
            Environment::with_prefix("SURFACE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| SurfaceError::Config(e.to_string()))?;

        let settings: Settings = config
            .try_deserialize()
            .map_err(|e| SurfaceError::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), SurfaceError> {
        if self.row_count == 0 {
            return Err(SurfaceError::Config("row_count must be > 0".to_string()));
        }
        if self.max_dist.is_nan() || self.max_dist <= 0.0 {
            return Err(SurfaceError::Config(format!(
                "max_dist must be > 0, got {}",
                self.max_dist
            )));
        }
        if self.x_scale == 0.0 || self.y_scale == 0.0 {
            return Err(SurfaceError::Config(
                "x_scale and y_scale must be non-zero".to_string(),
            ));
        }
        if self.top_n_words == 0 {
            return Err(SurfaceError::Config("top_n_words must be > 0".to_string()));
        }
        Ok(())
    }

    /// Output directory as a path.
    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(&self.output_dir)
    }
}
