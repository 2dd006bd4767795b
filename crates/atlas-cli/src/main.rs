//! Command line entry point for the timeline atlas.
//!
//! Runs one selection pass over a stored event pool and prints the
//! resulting groups and items as JSON, the payload the timeline widget
//! consumes.
//!
//! ```text
//! events JSON --> decode --> pipeline (viewport, options) --> groups + items JSON
//! ```
//!
//! Logs go to stderr so stdout carries only the payload.

mod config;
mod error;

use std::io::Write;

use atlas_core::config::AtlasConfig;
use atlas_core::pipeline::{Viewport, build_view};
use atlas_core::source::{load_categories, load_events};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::CliConfig;
use crate::error::CliError;

/// Application entry point.
///
/// Loads the run configuration from environment variables, initializes
/// logging, decodes the payloads, runs the pipeline, and writes the view
/// to stdout.
///
/// # Errors
///
/// Returns an error if any input cannot be loaded or the output cannot be
/// written.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::from_env()?;
    let config = match &cli.config_path {
        Some(path) => AtlasConfig::from_file(path)?,
        None => AtlasConfig::default(),
    };

    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!(
        events = %cli.events_path.display(),
        windowed = cli.window.is_some(),
        geo_filter = config.display.filter_by_visible_geographic_area,
        "atlas-cli starting"
    );

    run(&cli, &config)?;
    Ok(())
}

fn run(cli: &CliConfig, config: &AtlasConfig) -> Result<(), CliError> {
    let events = load_events(&cli.events_path)?;
    let categories = match &cli.categories_path {
        Some(path) => load_categories(path)?,
        None => Vec::new(),
    };
    info!(
        events = events.len(),
        categories = categories.len(),
        "payloads loaded"
    );

    let viewport = Viewport {
        window: cli.window,
        span_ms: None,
        bounds: cli.bounds,
    };
    let view = build_view(&events, &categories, &viewport, &config.display);
    info!(
        items = view.items.len(),
        groups = view.groups.len(),
        "view built"
    );

    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, &view)?;
    writeln!(out)?;
    Ok(())
}
