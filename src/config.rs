//! Configuration management for the FraudShield client

use crate::types::AnalysisType;
use crate::validation::MAX_UPLOAD_BYTES;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default location of the config file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub upload: UploadConfig,
    pub progress: ProgressConfig,
    pub notifications: NotificationConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// Analysis service endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Scheme, host and port of the model-serving service
    pub base_url: String,
    /// Path of the analysis endpoint
    pub analyze_path: String,
    /// Whole-request timeout in seconds
    pub timeout_secs: u64,
}

impl ApiConfig {
    pub fn analyze_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.analyze_path.trim_start_matches('/')
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            analyze_path: "/analyze".to_string(),
            timeout_secs: 120,
        }
    }
}

/// Upload form defaults and limits
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Largest accepted file in bytes
    pub max_file_bytes: u64,
    pub default_threshold: f64,
    pub default_analysis_type: AnalysisType,
    pub generate_report: bool,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: MAX_UPLOAD_BYTES,
            default_threshold: 0.7,
            default_analysis_type: AnalysisType::Standard,
            generate_report: true,
        }
    }
}

/// Simulated progress indicator
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    /// Interval between ticks in milliseconds
    pub tick_ms: u64,
    /// Percent added per tick
    pub step_percent: u8,
    /// Highest percent reached before the response arrives
    pub ceiling_percent: u8,
    /// Time the 100% state stays up before results display, in milliseconds
    pub completion_delay_ms: u64,
}

impl ProgressConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }

    pub fn completion_delay(&self) -> Duration {
        Duration::from_millis(self.completion_delay_ms)
    }
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            tick_ms: 200,
            step_percent: 5,
            ceiling_percent: 90,
            completion_delay_ms: 1000,
        }
    }
}

/// Notification visibility
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Workflow and auth messages, in milliseconds
    pub workflow_ttl_ms: u64,
    /// Generic alerts, in milliseconds
    pub alert_ttl_ms: u64,
}

impl NotificationConfig {
    pub fn workflow_ttl(&self) -> Duration {
        Duration::from_millis(self.workflow_ttl_ms)
    }

    pub fn alert_ttl(&self) -> Duration {
        Duration::from_millis(self.alert_ttl_ms)
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            workflow_ttl_ms: 5000,
            alert_ttl_ms: 3000,
        }
    }
}

/// Where the persistent store lives
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub dir: PathBuf,
}

impl StorageConfig {
    pub fn local_storage_path(&self) -> PathBuf {
        self.dir.join("local_storage.json")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".fraudshield"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default file (if present) and the environment
    pub fn load() -> Result<Self> {
        Self::load_from_path(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from a specific path.
    ///
    /// A missing file falls back to defaults. `FRAUDSHIELD_<SECTION>__<KEY>`
    /// variables override file values, e.g. `FRAUDSHIELD_API__BASE_URL`.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(
                Environment::with_prefix("FRAUDSHIELD")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
