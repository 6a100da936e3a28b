//! Configuration system using Figment.
//!
//! Strongly-typed configuration loading for the telemetry scope.
//! Configuration is loaded from:
//! 1. A TOML file (`config/default.toml` unless overridden on the CLI)
//! 2. Environment variables (prefixed with `MOTORSCOPE_`)
//!
//! The record width (3 vs 4 fields) is a configuration value, not a code
//! fork: the ordered `[stream] channels` list defines both the decoded field
//! count and the channel-role names, and `[[range_groups]]` binds the
//! position-like subset to a shared display range.
//!
//! # Example
//! ```no_run
//! use motorscope::config::Settings;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::load()?;
//! println!("channels: {:?}", settings.stream.channels);
//! # Ok(())
//! # }
//! ```

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Application settings
    pub application: ApplicationSettings,
    /// Serial link settings
    pub link: LinkSettings,
    /// Telemetry stream layout
    pub stream: StreamSettings,
    /// Shared display-range groups for position-like channels
    #[serde(default)]
    pub range_groups: Vec<RangeGroupSettings>,
    /// Export sink settings
    pub storage: StorageSettings,
}

/// Application-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationSettings {
    /// Application name
    pub name: String,
    /// Logging level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Serial link configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkSettings {
    /// Port identifier, e.g. `/dev/ttyACM0`
    pub port: String,
    /// Baud rate
    #[serde(default = "default_baud")]
    pub baud: u32,
    /// Read timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// Telemetry stream layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamSettings {
    /// Rolling history capacity per channel (samples)
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// Ordered channel roles; the length defines the decoded field count
    pub channels: Vec<String>,
}

/// One group of channels sharing a symmetric display range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeGroupSettings {
    /// Unique group identifier
    pub id: String,
    /// Member channel names (must appear in `stream.channels`)
    pub channels: Vec<String>,
    /// Base limit; also the floor below which the range never contracts
    pub base_limit: i64,
}

/// Export sink configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Output directory for exported CSV files
    pub output_dir: PathBuf,
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_baud() -> u32 {
    115_200
}

fn default_timeout_ms() -> u64 {
    500
}

fn default_capacity() -> usize {
    3000
}

impl Settings {
    /// Load configuration from `config/default.toml` and environment variables.
    ///
    /// Environment variables can override configuration with prefix `MOTORSCOPE_`.
    /// Example: `MOTORSCOPE_LINK_BAUD=57600`
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from("config/default.toml")
    }

    /// Load configuration from a specific file path.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("MOTORSCOPE_").split("_"))
            .extract()
    }

    /// Validate configuration after loading.
    pub fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.application.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.application.log_level,
                valid_levels.join(", ")
            ));
        }

        if self.stream.capacity == 0 {
            return Err("stream.capacity must be greater than zero".to_string());
        }

        if self.stream.channels.is_empty() {
            return Err("stream.channels must name at least one channel".to_string());
        }

        let mut names = std::collections::HashSet::new();
        for channel in &self.stream.channels {
            if !names.insert(channel) {
                return Err(format!("Duplicate channel name: {channel}"));
            }
        }

        let mut group_ids = std::collections::HashSet::new();
        for group in &self.range_groups {
            if !group_ids.insert(&group.id) {
                return Err(format!("Duplicate range group ID: {}", group.id));
            }
            if group.base_limit <= 0 {
                return Err(format!(
                    "Range group '{}' base_limit must be positive, got {}",
                    group.id, group.base_limit
                ));
            }
            for member in &group.channels {
                if !self.stream.channels.contains(member) {
                    return Err(format!(
                        "Range group '{}' references unknown channel '{member}'",
                        group.id
                    ));
                }
            }
        }

        Ok(())
    }

    /// Number of i32 fields each wire record carries.
    pub fn field_count(&self) -> usize {
        self.stream.channels.len()
    }
}
