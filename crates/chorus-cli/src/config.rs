//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory).

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use chorus::{
    ChorusError,
    config::{AppConfig, ImportConfig, MeasureKind},
};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),
}

impl From<ConfigError> for ChorusError {
    fn from(err: ConfigError) -> Self {
        ChorusError::Config(err.to_string())
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (chorus/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, ChorusError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("chorus/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "chorus", "chorus") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Returns `config` with label text measured by `measure`.
pub fn override_measure(config: AppConfig, measure: MeasureKind) -> AppConfig {
    let import = config.import();
    debug!(measure:?; "Overriding label measurement");
    AppConfig::new(ImportConfig::new(
        *import.bands(),
        import.labels().clone().with_measure(measure),
    ))
}

/// Load configuration from a TOML file
///
/// # Errors
///
/// Returns error if:
/// - File doesn't exist
/// - File cannot be read
/// - TOML parsing fails
fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, ChorusError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;

    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_explicit_file_is_loaded() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[import.bands]\nbase = 30.0\n\n[import.labels]\nwidth = 120.0\nmeasure = \"monospace\""
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();
        let import = config.import();
        assert_eq!(import.bands().height_of(Default::default()), 30.0);
        assert_eq!(import.labels().width(), 120.0);
        assert_eq!(import.labels().measure(), MeasureKind::Monospace);
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, ChorusError::Config(_)));
        assert!(err.to_string().contains("Missing configuration file"));
    }

    #[test]
    fn test_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[import.bands\nbase = ").unwrap();

        let err = load_config(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("Failed to parse TOML configuration"));
    }

    #[test]
    fn test_override_measure_keeps_other_settings() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[import.labels]\nheight = 24.0").unwrap();
        let config = load_config(Some(file.path())).unwrap();

        let config = override_measure(config, MeasureKind::Monospace);
        assert_eq!(config.import().labels().height(), 24.0);
        assert_eq!(config.import().labels().measure(), MeasureKind::Monospace);
    }
}
