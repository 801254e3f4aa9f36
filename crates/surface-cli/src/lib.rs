//! topic-surface library exports.
//!
//! This crate provides the CLI binary for the topic surface pipeline.
//!
//! # Modules
//!
//! - `cli`: Command-line argument parsing with clap
//! - `commands`: Command implementations (locate, surface, run)

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands, LocateArgs, SurfaceArgs};
pub use commands::{
    compute_surface, init_tracing, load_settings, locate_command, run_pipeline, surface_command,
    RunOutputs, StageOutcome,
};
