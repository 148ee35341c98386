//! Configuration schema types for `pxscale.toml`
//!
//! Defines the structure and validation rules for scaler configuration.

use serde::{Deserialize, Serialize};

use crate::registry::{is_scale_supported, Algorithm, Backend};
use crate::scaler::DEFAULT_BAND_ROWS;

/// Defaults used when the command line leaves a choice open
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Default algorithm
    #[serde(default = "default_algorithm")]
    pub algorithm: Algorithm,
    /// Default scale factor
    #[serde(default = "default_factor")]
    pub factor: f32,
    /// Default backend
    #[serde(default)]
    pub backend: Backend,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            algorithm: default_algorithm(),
            factor: default_factor(),
            backend: Backend::default(),
        }
    }
}

fn default_algorithm() -> Algorithm {
    Algorithm::Hq
}

fn default_factor() -> f32 {
    2.0
}

/// Engine tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Run CPU kernels over row bands in parallel
    #[serde(default = "default_true")]
    pub parallel: bool,
    /// Source rows per band
    #[serde(default = "default_band_rows")]
    pub band_rows: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            band_rows: DEFAULT_BAND_ROWS,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_band_rows() -> u32 {
    DEFAULT_BAND_ROWS
}

/// Complete pxscale.toml configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PxscaleConfig {
    /// Default settings
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// Engine settings
    #[serde(default)]
    pub engine: EngineConfig,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "defaults.factor")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pxscale.toml: '{}' {}", self.field, self.message)
    }
}

impl PxscaleConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let defaults = &self.defaults;

        if !defaults.factor.is_finite() || defaults.factor <= 0.0 {
            errors.push(ConfigValidationError {
                field: "defaults.factor".to_string(),
                message: "must be a positive number".to_string(),
            });
        } else if !is_scale_supported(defaults.algorithm, defaults.backend, defaults.factor) {
            errors.push(ConfigValidationError {
                field: "defaults.factor".to_string(),
                message: format!(
                    "{}x is not supported by {} on the {} backend",
                    defaults.factor, defaults.algorithm, defaults.backend
                ),
            });
        }

        if self.engine.band_rows == 0 {
            errors.push(ConfigValidationError {
                field: "engine.band_rows".to_string(),
                message: "must be a positive integer".to_string(),
            });
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_parse() {
        let config: PxscaleConfig = toml::from_str("").unwrap();
        assert_eq!(config, PxscaleConfig::default());
        assert_eq!(config.defaults.algorithm, Algorithm::Hq);
        assert_eq!(config.defaults.factor, 2.0);
        assert_eq!(config.defaults.backend, Backend::Cpu);
        assert!(config.engine.parallel);
        assert_eq!(config.engine.band_rows, 32);
    }

    #[test]
    fn test_full_config_parse() {
        let toml = r#"
[defaults]
algorithm = "scale-sfx"
factor = 3.0
backend = "raster"

[engine]
parallel = false
band_rows = 8
"#;
        let config: PxscaleConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.defaults.algorithm, Algorithm::ScaleSfx);
        assert_eq!(config.defaults.factor, 3.0);
        assert_eq!(config.defaults.backend, Backend::Raster);
        assert!(!config.engine.parallel);
        assert_eq!(config.engine.band_rows, 8);
        assert!(config.is_valid());
    }

    #[test]
    fn test_unknown_algorithm_fails_to_parse() {
        let result: Result<PxscaleConfig, _> = toml::from_str("[defaults]\nalgorithm = \"hq5x\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_collects_every_error() {
        let config = PxscaleConfig {
            defaults: DefaultsConfig {
                algorithm: Algorithm::Hq,
                factor: -1.0,
                backend: Backend::Cpu,
            },
            engine: EngineConfig {
                parallel: true,
                band_rows: 0,
            },
        };
        let errors = config.validate();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "defaults.factor");
        assert_eq!(errors[1].field, "engine.band_rows");
    }

    #[test]
    fn test_unsupported_default_combination() {
        let mut config = PxscaleConfig::default();
        config.defaults.backend = Backend::Raster;
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].to_string(),
            "pxscale.toml: 'defaults.factor' 2x is not supported by hq on the raster backend"
        );
    }
}
