use crate::models::AppSettings;
use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Where and how log output is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingOptions {
    /// Directory for the daily log files
    pub log_dir: Utf8PathBuf,
    /// Prefix for log file names
    pub prefix: String,
    /// Debug level instead of info
    pub debug: bool,
    /// Also log to stdout
    pub console: bool,
    /// Write the log file as JSON lines
    pub json: bool,
}

impl LoggingOptions {
    pub fn from_settings(settings: &AppSettings) -> Self {
        Self {
            log_dir: Utf8PathBuf::from(&settings.log_directory),
            prefix: "optps2".to_string(),
            debug: settings.debug_mode,
            console: settings.console_logging,
            json: settings.json_logs,
        }
    }

    fn default_directive(&self) -> &'static str {
        if self.debug { "debug" } else { "info" }
    }
}

/// Build the level filter; a `RUST_LOG` directive takes precedence over the debug flag.
fn env_filter(options: &LoggingOptions) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(options.default_directive()))
}

/// Setup logging with a daily rotating file and optional console output.
///
/// # Returns
/// A guard that must be held for the duration of the program to keep logging active
///
/// # Errors
/// Fails if the log directory cannot be created or a global subscriber is already set.
pub fn setup_logging(options: &LoggingOptions) -> Result<WorkerGuard> {
    if !options.log_dir.exists() {
        fs::create_dir_all(&options.log_dir)
            .with_context(|| format!("Failed to create log directory: {}", options.log_dir))?;
    }

    let file_appender = rolling::daily(&options.log_dir, &options.prefix);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let (plain_file_layer, json_file_layer) = if options.json {
        let layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(non_blocking)
            .with_target(true)
            .with_thread_ids(true);
        (None, Some(layer))
    } else {
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false) // No ANSI codes in log files
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);
        (Some(layer), None)
    };

    let console_layer = options.console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_ansi(true)
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(env_filter(options))
        .with(plain_file_layer)
        .with(json_file_layer)
        .with(console_layer)
        .try_init()
        .context("Failed to install the global tracing subscriber")?;

    tracing::info!(
        "Logging initialized: dir={}, prefix={}, debug={}, console={}, json={}",
        options.log_dir,
        options.prefix,
        options.debug,
        options.console,
        options.json
    );

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_options_from_settings() {
        let settings = AppSettings {
            debug_mode: true,
            json_logs: true,
            ..AppSettings::default()
        };
        let options = LoggingOptions::from_settings(&settings);

        assert_eq!(options.log_dir, "logs");
        assert_eq!(options.prefix, "optps2");
        assert!(options.debug);
        assert!(options.console);
        assert!(options.json);
        assert_eq!(options.default_directive(), "debug");
    }

    #[test]
    fn test_setup_logging_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let log_dir = Utf8PathBuf::try_from(temp_dir.path().join("logs")).unwrap();
        let options = LoggingOptions {
            log_dir: log_dir.clone(),
            prefix: "test".to_string(),
            debug: false,
            console: false,
            json: false,
        };

        // Only one global subscriber per process; a second install reports an error
        // but the directory is created either way.
        let _result = setup_logging(&options);

        assert!(log_dir.exists());
    }
}
