// RUNTIME PREFERENCES (User Experience)

use crate::logging::LogLevel;
use crate::validation::{IndexBound, ValidationMode};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Errors raised while loading a runtime configuration file
#[derive(Debug, thiserror::Error)]
pub enum RuntimeConfigError {
    #[error("Failed to read configuration file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid runtime configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationPreferences {
    /// When validation runs: on every edit, or only on check/apply
    pub mode: ValidationMode,

    /// Upper bound used to classify unknown indices as out of range
    pub bound: IndexBound,
}

impl Default for ValidationPreferences {
    fn default() -> Self {
        Self {
            mode: env::var(env_vars::VALIDATION_MODE)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(ValidationMode::Eager),
            bound: env::var(env_vars::VALIDATION_BOUND)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(IndexBound::TotalConditions),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubstitutionPreferences {
    /// Wrap composed predicates containing a top-level AND/OR in parentheses
    pub wrap_top_level: bool,

    /// Literal substituted for indices without a fragment
    pub inactive_placeholder: String,
}

impl Default for SubstitutionPreferences {
    fn default() -> Self {
        Self {
            wrap_top_level: env::var(env_vars::SUBSTITUTION_WRAP_TOP_LEVEL)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            inactive_placeholder: env::var(env_vars::SUBSTITUTION_PLACEHOLDER)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| "TRUE".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging
    pub use_structured_logging: bool,

    /// Minimum level that reaches the configured logger
    pub min_log_level: LogLevel,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env::var(env_vars::LOGGING_USE_STRUCTURED)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
        }
    }
}

/// Parse log level from string (used for environment variables)
pub(crate) fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub validation: ValidationPreferences,
    pub substitution: SubstitutionPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Parse a runtime configuration from TOML text; missing sections use defaults
    pub fn from_toml_str(content: &str) -> Result<Self, RuntimeConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a runtime configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, RuntimeConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| RuntimeConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // Validation
    pub const VALIDATION_MODE: &str = "CUSTOM_LOGIC_VALIDATION_MODE";
    pub const VALIDATION_BOUND: &str = "CUSTOM_LOGIC_VALIDATION_BOUND";

    // Substitution
    pub const SUBSTITUTION_WRAP_TOP_LEVEL: &str = "CUSTOM_LOGIC_WRAP_TOP_LEVEL";
    pub const SUBSTITUTION_PLACEHOLDER: &str = "CUSTOM_LOGIC_INACTIVE_PLACEHOLDER";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "CUSTOM_LOGIC_LOGGING_USE_STRUCTURED";
    pub const LOGGING_MIN_LEVEL: &str = "CUSTOM_LOGIC_LOGGING_MIN_LEVEL";
}
