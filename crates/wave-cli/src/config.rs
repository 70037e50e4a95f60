//! Configuration for wavec
//!
//! Loaded from a YAML file when one is given, otherwise defaults.
//! Environment variables always override file values.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use wave_compile::CompileOptions;
use wave_json::DEFAULT_CACHE_CAPACITY;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid value for {var}: {value}")]
    InvalidEnvVar { var: String, value: String },
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) or module-specific filter
    pub level: String,

    /// Output format: pretty, json, compact
    pub format: String,

    /// Output destination: stderr, file, both
    pub output: String,

    /// Directory for log files
    pub directory: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "compact".to_string(),
            output: "stderr".to_string(),
            directory: "./logs".to_string(),
        }
    }
}

/// JSON extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonConfig {
    pub cache_capacity: usize,
}

impl Default for JsonConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub compile: CompileOptions,
    pub json: JsonConfig,
}

impl Config {
    /// Load configuration from YAML file with environment variable overrides
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.with_env_overrides()
    }

    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Ok(level) = std::env::var("RUST_LOG") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("LOG_FORMAT") {
            self.logging.format = format;
        }
        if let Ok(output) = std::env::var("LOG_OUTPUT") {
            self.logging.output = output;
        }
        if let Ok(dir) = std::env::var("LOG_DIR") {
            self.logging.directory = dir;
        }

        if let Ok(strict) = std::env::var("WAVE_STRICT_BINDINGS") {
            self.compile.strict_bindings = match strict.as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(ConfigError::InvalidEnvVar {
                        var: "WAVE_STRICT_BINDINGS".to_string(),
                        value: strict,
                    })
                }
            };
        }
        if let Ok(capacity) = std::env::var("WAVE_JSON_CACHE_CAPACITY") {
            self.json.cache_capacity = capacity.parse().map_err(|_| ConfigError::InvalidEnvVar {
                var: "WAVE_JSON_CACHE_CAPACITY".to_string(),
                value: capacity.clone(),
            })?;
        }

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.format, "compact");
        assert_eq!(config.logging.output, "stderr");
        assert!(config.compile.strict_bindings);
        assert_eq!(config.json.cache_capacity, 32);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: Config = serde_yaml::from_str(
            r#"
compile:
  strict_bindings: false
"#,
        )
        .unwrap();
        assert!(!config.compile.strict_bindings);
        assert_eq!(config.logging.format, "compact");
        assert_eq!(config.json.cache_capacity, 32);
    }

    #[test]
    fn test_env_var_override() {
        std::env::set_var("WAVE_STRICT_BINDINGS", "false");
        std::env::set_var("WAVE_JSON_CACHE_CAPACITY", "8");

        let config_yaml = r#"
logging:
  level: "info"
  format: "pretty"
  output: "stderr"
  directory: "./logs"
compile:
  strict_bindings: true
"#;
        let temp_file = std::env::temp_dir().join("wave_test_config.yaml");
        std::fs::write(&temp_file, config_yaml).unwrap();

        let config = Config::load(&temp_file).unwrap();
        assert!(!config.compile.strict_bindings); // Overridden
        assert_eq!(config.json.cache_capacity, 8); // Overridden

        std::env::set_var("WAVE_STRICT_BINDINGS", "maybe");
        assert!(matches!(
            Config::default().with_env_overrides(),
            Err(ConfigError::InvalidEnvVar { .. })
        ));

        std::env::remove_var("WAVE_STRICT_BINDINGS");
        std::env::remove_var("WAVE_JSON_CACHE_CAPACITY");
        std::fs::remove_file(temp_file).ok();
    }
}
