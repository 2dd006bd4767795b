//! Configuration loading and typed config structures for the timeline atlas.
//!
//! Configuration lives in a YAML file (`atlas-config.yaml` by convention).
//! This module defines strongly-typed structs that mirror the YAML
//! structure, and provides a loader that reads and validates the file.
//! Every field has a default, so an empty document is a valid config.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is outside its allowed range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level atlas configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AtlasConfig {
    /// Selection and layout tuning.
    #[serde(default)]
    pub display: DisplayOptions,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AtlasConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a display option is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a display option is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // serde_yml rejects a completely empty document; treat it as `{}`.
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.display.validate()?;
        Ok(config)
    }
}

/// Caller-tunable selection and layout options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayOptions {
    /// Floor on the number of items shown while a window is active.
    #[serde(default = "default_min_visible_events")]
    pub min_visible_events: usize,

    /// Maximum number of admitted events overlapping any instant.
    #[serde(default = "default_max_overlapping_events")]
    pub max_overlapping_events: usize,

    /// Events shorter than this fraction of the visible span are "short"
    /// for label suppression.
    #[serde(default = "default_short_event_fraction")]
    pub short_event_fraction: f64,

    /// Events longer than this multiple of the visible span are excluded.
    #[serde(default = "default_max_event_span_visible_ratio")]
    pub max_event_span_visible_ratio: f64,

    /// Whether to restrict events to the map's visible bound.
    #[serde(default)]
    pub filter_by_visible_geographic_area: bool,

    /// Shortest display duration drawn as a range bar instead of a point.
    #[serde(default = "default_min_range_duration_ms")]
    pub min_range_duration_ms: i64,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            min_visible_events: default_min_visible_events(),
            max_overlapping_events: default_max_overlapping_events(),
            short_event_fraction: default_short_event_fraction(),
            max_event_span_visible_ratio: default_max_event_span_visible_ratio(),
            filter_by_visible_geographic_area: false,
            min_range_duration_ms: default_min_range_duration_ms(),
        }
    }
}

impl DisplayOptions {
    /// Check that every option is inside its allowed range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending option.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_overlapping_events == 0 {
            return Err(ConfigError::Invalid {
                reason: "max_overlapping_events must be at least 1".to_owned(),
            });
        }
        if !self.short_event_fraction.is_finite() || self.short_event_fraction < 0.0 {
            return Err(ConfigError::Invalid {
                reason: "short_event_fraction must be a finite, non-negative number".to_owned(),
            });
        }
        if !self.max_event_span_visible_ratio.is_finite() || self.max_event_span_visible_ratio <= 0.0
        {
            return Err(ConfigError::Invalid {
                reason: "max_event_span_visible_ratio must be a finite, positive number".to_owned(),
            });
        }
        if self.min_range_duration_ms < 0 {
            return Err(ConfigError::Invalid {
                reason: "min_range_duration_ms must not be negative".to_owned(),
            });
        }
        Ok(())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) used when `RUST_LOG` is
    /// not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_min_visible_events() -> usize {
    20
}

const fn default_max_overlapping_events() -> usize {
    10
}

const fn default_short_event_fraction() -> f64 {
    0.02
}

const fn default_max_event_span_visible_ratio() -> f64 {
    3.0
}

const fn default_min_range_duration_ms() -> i64 {
    86_400_000
}

fn default_log_level() -> String {
    "info".to_owned()
}
