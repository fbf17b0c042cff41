//! Command-line argument definitions for the Chorus CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, label measurement and logging verbosity.

use clap::{Parser, ValueEnum};

use chorus::config::MeasureKind;

/// Command-line arguments for the Chorus import tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input JSON model
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output JSON scene dump
    #[arg(short, long, default_value = "out.json")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Label text measurement, overriding the configuration file
    #[arg(long, value_enum)]
    pub measure: Option<Measure>,
}

/// Label text measurement selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Measure {
    /// Shape text with system fonts
    Font,
    /// Fixed advance per character
    Mono,
}

impl From<Measure> for MeasureKind {
    fn from(measure: Measure) -> Self {
        match measure {
            Measure::Font => Self::Font,
            Measure::Mono => Self::Monospace,
        }
    }
}
