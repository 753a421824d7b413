//! Configuration loading for RFSC services
//!
//! Settings are resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Levels 1 and 2 are handled by the binary's argument parser; this module
//! loads level 3 and supplies level 4. A missing TOML file is not an error.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::features::{FeatureExtractor, PeakDetector};
use crate::{Error, Result};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "RFSC_CONFIG";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Address the HTTP server binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted upload body in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Sessions held in memory before the oldest is evicted
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Peak detection constraints (optional)
    #[serde(default)]
    pub peak_detection: PeakDetectionConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

/// Peak detection constraints; absent fields mean "no constraint"
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq)]
pub struct PeakDetectionConfig {
    /// Minimum peak height
    #[serde(default)]
    pub height: Option<f64>,

    /// Minimum distance between peaks, in rows
    #[serde(default)]
    pub distance: Option<usize>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
            max_sessions: default_max_sessions(),
            logging: LoggingConfig::default(),
            peak_detection: PeakDetectionConfig::default(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5780
}

fn default_max_upload_bytes() -> usize {
    32 * 1024 * 1024
}

fn default_max_sessions() -> usize {
    16
}

fn default_log_level() -> String {
    "info".to_string()
}

impl PeakDetectionConfig {
    /// Build the detector these constraints describe
    pub fn detector(&self) -> Result<PeakDetector> {
        PeakDetector::new()
            .with_min_height(self.height)
            .and_then(|d| d.with_min_distance(self.distance))
            .map_err(|e| Error::Config(format!("peak_detection: {}", e)))
    }
}

impl TomlConfig {
    /// Parse configuration text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the service cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(Error::Config("port must be non-zero".to_string()));
        }
        if self.max_sessions == 0 {
            return Err(Error::Config("max_sessions must be >= 1".to_string()));
        }
        if self.max_upload_bytes == 0 {
            return Err(Error::Config("max_upload_bytes must be >= 1".to_string()));
        }
        self.peak_detection.detector()?;
        Ok(())
    }

    /// Feature extractor configured with this file's peak constraints
    pub fn feature_extractor(&self) -> Result<FeatureExtractor> {
        Ok(FeatureExtractor::new(self.peak_detection.detector()?))
    }
}

/// Load configuration from an explicit path
///
/// Unlike [`load_config`], the file must exist.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    TomlConfig::from_toml_str(&content)
}

/// Load configuration with graceful fallback
///
/// An explicit path (CLI or [`CONFIG_ENV_VAR`]) must be readable. Without
/// one, the platform default location is tried and compiled defaults are
/// used when no file is there.
pub fn load_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    if let Some(path) = explicit {
        info!("Loading config from {}", path.display());
        return load_toml_config(path);
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        info!("Loading config from {} ({})", path, CONFIG_ENV_VAR);
        return load_toml_config(Path::new(&path));
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            info!("Loading config from {}", path.display());
            load_toml_config(&path)
        }
        Some(path) => {
            warn!(
                "No config file at {}, using compiled defaults",
                path.display()
            );
            Ok(TomlConfig::default())
        }
        None => {
            warn!("Could not determine config directory, using compiled defaults");
            Ok(TomlConfig::default())
        }
    }
}

/// Platform config file location (`<config_dir>/rfsc/rfsc-an.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("rfsc").join("rfsc-an.toml"))
}
