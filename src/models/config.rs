use crate::models::CanonicalSettings;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Application configuration from OptPS2 Config.yaml
///
/// Contains startup timings and logging preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(rename = "OptPS2_Config", default)]
    pub app: AppSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(rename = "Splash Duration Ms", default = "default_splash_duration_ms")]
    pub splash_duration_ms: u64,

    #[serde(rename = "Detection Timeout Ms", default = "default_detection_timeout_ms")]
    pub detection_timeout_ms: u64,

    #[serde(rename = "Simulated Latency Ms", default = "default_simulated_latency_ms")]
    pub simulated_latency_ms: u64,

    #[serde(rename = "Debug Mode", default)]
    pub debug_mode: bool,

    #[serde(rename = "Log Directory", default = "default_log_directory")]
    pub log_directory: String,

    #[serde(rename = "Console Logging", default = "default_console_logging")]
    pub console_logging: bool,

    #[serde(rename = "JSON Logs", default)]
    pub json_logs: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            splash_duration_ms: default_splash_duration_ms(),
            detection_timeout_ms: default_detection_timeout_ms(),
            simulated_latency_ms: default_simulated_latency_ms(),
            debug_mode: false,
            log_directory: default_log_directory(),
            console_logging: default_console_logging(),
            json_logs: false,
        }
    }
}

impl AppSettings {
    /// Minimum time the splash screen stays up.
    pub fn splash_duration(&self) -> Duration {
        Duration::from_millis(self.splash_duration_ms)
    }

    /// Upper bound on a single device detection.
    pub fn detection_timeout(&self) -> Duration {
        Duration::from_millis(self.detection_timeout_ms)
    }

    /// Latency of the simulated signal source.
    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }
}

/// On-disk layout of OptPS2 Settings.yaml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsFile {
    #[serde(rename = "OptPS2_Settings")]
    pub settings: CanonicalSettings,
}

fn default_splash_duration_ms() -> u64 {
    6000
}

fn default_detection_timeout_ms() -> u64 {
    5000
}

fn default_simulated_latency_ms() -> u64 {
    2000
}

fn default_log_directory() -> String {
    "logs".to_string()
}

fn default_console_logging() -> bool {
    true
}
