//! Chorus CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use chorus::ChorusError;
use chorus_cli::{Args, error_adapter::to_reportables};

fn main() {
    miette::set_panic_hook();

    let args = Args::parse();
    init_logger(&args.log_level);

    info!(input = args.input.as_str(), output = args.output.as_str(); "Importing choreography");
    debug!(args:?; "Parsed arguments");

    match chorus_cli::run(&args) {
        Ok(()) => info!(output = args.output.as_str(); "Scene written"),
        Err(err) => {
            report(&err);
            process::exit(1);
        }
    }
}

/// Falls back to `warn` when `level` is not a known filter.
fn init_logger(level: &str) {
    let filter = LevelFilter::from_str(level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {level}. Using 'warn' instead.");
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(filter)
        .init();
}

fn report(err: &ChorusError) {
    let reporter = miette::GraphicalReportHandler::new();
    for reportable in to_reportables(err) {
        let mut rendered = String::new();
        match reporter.render_report(&mut rendered, &reportable) {
            Ok(()) => error!("{rendered}"),
            Err(_) => error!(code = reportable.code_str(); "{err}"),
        }
    }
}
