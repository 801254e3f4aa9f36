//! Topic Surface
//!
//! Builds a spatial topic surface from a diachronic topic model.
//!
//! # Usage
//!
//! ```bash
//! topic-surface locate --input model.json --output locs.geojson
//! topic-surface surface --input locs.geojson --output surface.asc
//! topic-surface run --input model.json --name covid [--output-dir DIR]
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/topic-surface/config.toml)
//! 3. File given with --config
//! 4. Environment variables (SURFACE_*)
//! 5. CLI flags

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use surface_cli::{
    init_tracing, load_settings, locate_command, run_pipeline, surface_command, Cli, Commands,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = load_settings(cli.config.as_deref(), cli.log_level.as_deref())?;
    init_tracing(&settings.log_level)?;
    info!("topic-surface started");

    match cli.command {
        Commands::Locate {
            input,
            output,
            locate,
        } => {
            locate.apply(&mut settings);
            locate_command(&settings, &input, &output)?;
        }
        Commands::Surface {
            input,
            output,
            surface,
        } => {
            surface.apply(&mut settings);
            surface_command(&settings, &input, &output)?;
        }
        Commands::Run {
            input,
            output_dir,
            name,
            locate,
            surface,
        } => {
            locate.apply(&mut settings);
            surface.apply(&mut settings);
            if let Some(dir) = output_dir {
                settings.output_dir = dir;
            }
            match run_pipeline(&settings, &input, &name)? {
                Some(outputs) => info!(
                    locations = %outputs.locations.display(),
                    surface = %outputs.surface.display(),
                    "pipeline finished"
                ),
                None => warn!("pipeline produced no output"),
            }
        }
    }

    info!("topic-surface ended");
    Ok(())
}
