//! Configuration loading and discovery for `pxscale.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::PxscaleConfig;
use crate::registry::{Algorithm, Backend};
use crate::scaler::Scaler;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// File name looked up during discovery
pub const CONFIG_FILE: &str = "pxscale.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse pxscale.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override algorithm
    pub algorithm: Option<Algorithm>,
    /// Override scale factor
    pub factor: Option<f32>,
    /// Override backend
    pub backend: Option<Backend>,
    /// Force sequential CPU kernels
    pub parallel: Option<bool>,
    /// Override rows per band
    pub band_rows: Option<u32>,
}

/// Find pxscale.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for pxscale.toml
/// 2. Check XDG_CONFIG_HOME/pxscale/pxscale.toml (or ~/.config/pxscale/pxscale.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find pxscale.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("pxscale").join(CONFIG_FILE);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find pxscale.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a pxscale.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate the config file. If no config file is found, returns the default
/// configuration.
pub fn load_config(path: Option<&Path>) -> Result<PxscaleConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => {
            debug!("no pxscale.toml found, using defaults");
            Ok(PxscaleConfig::default())
        }
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<PxscaleConfig, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let contents = fs::read_to_string(path)?;
    let config: PxscaleConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    Ok(config)
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut PxscaleConfig, overrides: &CliOverrides) {
    if let Some(algorithm) = overrides.algorithm {
        config.defaults.algorithm = algorithm;
    }
    if let Some(factor) = overrides.factor {
        config.defaults.factor = factor;
    }
    if let Some(backend) = overrides.backend {
        config.defaults.backend = backend;
    }
    if let Some(parallel) = overrides.parallel {
        config.engine.parallel = parallel;
    }
    if let Some(band_rows) = overrides.band_rows {
        config.engine.band_rows = band_rows;
    }
}

impl PxscaleConfig {
    /// A dispatcher configured from the `[defaults]` backend and `[engine]`
    /// settings.
    pub fn scaler(&self) -> Scaler {
        Scaler::new(self.defaults.backend)
            .with_parallel(self.engine.parallel)
            .with_band_rows(self.engine.band_rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(dir: &Path, contents: &str) -> PathBuf {
        let config_path = dir.join(CONFIG_FILE);
        File::create(&config_path)
            .expect("should create config file")
            .write_all(contents.as_bytes())
            .expect("should write config content");
        config_path
    }

    #[test]
    fn test_find_config_in_current_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "[defaults]\nfactor = 3.0\n");

        let found = find_config_from(temp.path().to_path_buf());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_in_parent_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "");

        let subdir = temp.path().join("art").join("sprites");
        fs::create_dir_all(&subdir).expect("should create subdirectories");

        let found = find_config_from(subdir);
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_not_found() {
        let temp = TempDir::new().expect("should create temp dir");
        let found = find_config_from(temp.path().to_path_buf());
        assert_eq!(found, None);
    }

    #[test]
    fn test_load_config_from_file() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(
            temp.path(),
            r#"
[defaults]
algorithm = "xbr"
factor = 4.0

[engine]
band_rows = 16
"#,
        );

        let config = load_config(Some(&config_path)).expect("should load valid config");
        assert_eq!(config.defaults.algorithm, Algorithm::Xbr);
        assert_eq!(config.defaults.factor, 4.0);
        assert_eq!(config.engine.band_rows, 16);
        assert!(config.engine.parallel);
    }

    #[test]
    fn test_load_config_missing_file_errors() {
        let temp = TempDir::new().expect("should create temp dir");
        let result = load_config(Some(&temp.path().join("nonexistent.toml")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "this is not valid toml {{{");

        let result = load_config(Some(&config_path));
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_validation_error() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "[defaults]\nalgorithm = \"epx\"\nfactor = 3.0\n");

        match load_config(Some(&config_path)) {
            Err(ConfigError::Validation(errors)) => {
                assert_eq!(errors.len(), 1);
                assert!(errors[0].contains("defaults.factor"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_validation_error_message_lists_fields() {
        let err = ConfigError::Validation(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(err.to_string(), "Config validation failed:\n  - a\n  - b");
    }

    #[test]
    fn test_merge_cli_overrides() {
        let mut config = PxscaleConfig::default();
        let overrides = CliOverrides {
            algorithm: Some(Algorithm::OmniScale),
            factor: Some(2.5),
            parallel: Some(false),
            ..Default::default()
        };
        merge_cli_overrides(&mut config, &overrides);

        assert_eq!(config.defaults.algorithm, Algorithm::OmniScale);
        assert_eq!(config.defaults.factor, 2.5);
        assert_eq!(config.defaults.backend, Backend::Cpu);
        assert!(!config.engine.parallel);
        assert_eq!(config.engine.band_rows, 32);
    }

    #[test]
    fn test_scaler_from_config() {
        let mut config = PxscaleConfig::default();
        config.defaults.backend = Backend::Raster;
        config.engine.parallel = false;
        config.engine.band_rows = 4;

        let scaler = config.scaler();
        assert_eq!(scaler.backend(), Backend::Raster);
        assert!(!scaler.is_parallel());
        assert_eq!(scaler.band_rows(), 4);
    }
}
