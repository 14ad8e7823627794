//! OptPS2 - Device-aware settings optimizer for a PS2 emulator front-end
//!
//! Main entry point.
//!
//! # Execution Flow
//!
//! 1. Load `OptPS2 Data/OptPS2 Config.yaml` (defaults if missing)
//! 2. Initialize logging → logs/optps2.<date>
//! 3. Create a single-threaded tokio runtime
//! 4. Create the SettingsStore and load `OptPS2 Settings.yaml` if present
//! 5. Run the bootstrap: splash timer and device check, joined into one ready transition
//! 6. Log the device profile, the compatibility overview and the metrics summary
//!
//! # Configuration Files
//!
//! Expected in `OptPS2 Data/` directory:
//! - `OptPS2 Config.yaml`: startup timings, logging preferences
//! - `OptPS2 Settings.yaml`: saved emulator settings (optional)

use anyhow::{Context, Result};
use optps2::logging::{LoggingOptions, setup_logging};
use optps2::models::builtin_games;
use optps2::services::{
    BootstrapSequencer, CompatibilityClassifier, DeviceProfileCache, SimulatedSignalSource,
    bucket_counts,
};
use optps2::{APP_NAME, ConfigManager, SettingsStore, VERSION, metrics};
use std::sync::Arc;

fn main() -> Result<()> {
    let config_manager = ConfigManager::new("OptPS2 Data")?;
    let app_config = config_manager.load_app_config()?;
    let app = app_config.app;

    let _log_guard = setup_logging(&LoggingOptions::from_settings(&app))?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    // The bootstrap is two concurrent tasks and a join; one thread is enough.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;

    let settings_store = SettingsStore::global();
    match settings_store.load(&config_manager) {
        Ok(true) => tracing::info!("Restored saved settings"),
        Ok(false) => tracing::info!("No saved settings, using Balanced defaults"),
        Err(e) => tracing::warn!("Ignoring saved settings: {}", e),
    }

    let classifier = CompatibilityClassifier::new(
        Arc::new(SimulatedSignalSource::new(app.simulated_latency())),
        DeviceProfileCache::global(),
        app.detection_timeout(),
    );
    let sequencer = BootstrapSequencer::new(Arc::new(classifier), app.splash_duration());

    let profile = runtime.block_on(sequencer.launch());

    tracing::info!(
        "{}: {} ({}), {} RAM, tier {}, score {}",
        profile.headline(),
        profile.device_model,
        profile.processor_name,
        profile.ram_label,
        profile.tier,
        profile.performance_score
    );
    if let Some(warning) = profile.compatibility_warning() {
        tracing::warn!("{}", warning);
    }

    let settings = settings_store.snapshot();
    tracing::info!(
        "Active preset {}: {} resolution, {} textures, {} backend, {} fps",
        settings.preset_name,
        settings.resolution_scale,
        settings.texture_quality,
        settings.rendering_backend,
        settings.fps_limit
    );

    for (label, count) in bucket_counts(builtin_games()) {
        tracing::info!("Compatibility {}: {} games", label, count);
    }

    metrics::global().log_summary();
    tracing::info!("Application shutdown complete");

    Ok(())
}
