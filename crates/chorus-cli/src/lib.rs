//! CLI logic for the Chorus import tool.
//!
//! This module contains the core CLI logic: load the configuration, import a
//! JSON model and dump the resulting scene as JSON.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Measure};

use std::fs;

use log::info;

use chorus::{ChorusError, ImportBuilder};

/// Run the Chorus CLI application
///
/// This function imports the input model and writes the element snapshots
/// of the resulting scene to the output file as pretty-printed JSON.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `ChorusError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Model decoding errors
/// - Import errors
pub fn run(args: &Args) -> Result<(), ChorusError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing diagram"
    );

    let mut app_config = config::load_config(args.config.as_ref())?;
    if let Some(measure) = args.measure {
        app_config = config::override_measure(app_config, measure.into());
    }

    let source = fs::read_to_string(&args.input)?;

    let builder = ImportBuilder::new(app_config);
    let model = builder.parse(&source)?;
    let outcome = builder.import(&model)?;

    let json = serde_json::to_string_pretty(&outcome.canvas().snapshot())?;
    fs::write(&args.output, json)?;

    let summary = outcome.summary();
    info!(
        output_file = args.output,
        shapes = summary.shapes(),
        bands = summary.bands(),
        connections = summary.connections();
        "Scene exported successfully"
    );

    Ok(())
}
