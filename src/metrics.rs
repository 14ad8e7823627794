// Session metrics module
//
// Provides lightweight counters for device checks and settings activity

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

static GLOBAL_METRICS: OnceLock<Metrics> = OnceLock::new();

/// Process-wide metrics instance.
pub fn global() -> &'static Metrics {
    GLOBAL_METRICS.get_or_init(Metrics::new)
}

/// Session metrics
///
/// Uses atomic operations for thread-safe metric tracking without locks.
/// Counters are bumped by the classifier, the bootstrap sequencer and the
/// settings store, and logged once on shutdown.
#[derive(Debug)]
pub struct Metrics {
    /// Device checks that ran detection
    pub checks_computed: AtomicU64,

    /// Non-forced checks answered from the cache
    pub cache_hits: AtomicU64,

    /// Checks that waited on an in-flight detection instead of starting their own
    pub checks_joined: AtomicU64,

    /// Detections that failed or timed out and fell back to the unknown tier
    pub detection_failures: AtomicU64,

    /// Presets applied to the settings store
    pub presets_applied: AtomicU64,

    /// Setting updates rejected as invalid
    pub settings_rejected: AtomicU64,

    /// Successful settings saves
    pub settings_saved: AtomicU64,

    /// Time from bootstrap start to ready, in milliseconds
    pub bootstrap_time_ms: AtomicU64,

    /// Application start time
    start_time: Instant,
}

impl Metrics {
    /// Create a new Metrics instance
    pub fn new() -> Self {
        Self {
            checks_computed: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
            checks_joined: AtomicU64::new(0),
            detection_failures: AtomicU64::new(0),
            presets_applied: AtomicU64::new(0),
            settings_rejected: AtomicU64::new(0),
            settings_saved: AtomicU64::new(0),
            bootstrap_time_ms: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_check_computed(&self) {
        self.checks_computed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_check_joined(&self) {
        self.checks_joined.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_detection_failure(&self) {
        self.detection_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_preset_applied(&self) {
        self.presets_applied.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_setting_rejected(&self) {
        self.settings_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_settings_saved(&self) {
        self.settings_saved.fetch_add(1, Ordering::Relaxed);
    }

    /// Record how long the bootstrap took to reach ready
    pub fn record_bootstrap_time(&self, duration: Duration) {
        self.bootstrap_time_ms
            .store(duration.as_millis() as u64, Ordering::Relaxed);
    }

    /// Get total uptime
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Share of non-forced checks served from the cache, 0.0 when there were none
    pub fn cache_hit_ratio(&self) -> f64 {
        let hits = self.cache_hits.load(Ordering::Relaxed);
        let computed = self.checks_computed.load(Ordering::Relaxed);
        let total = hits + computed;
        if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        }
    }

    /// Log metrics summary
    pub fn log_summary(&self) {
        tracing::info!("=== Session Metrics Summary ===");
        tracing::info!("Uptime: {:.2}s", self.uptime().as_secs_f64());
        tracing::info!(
            "Bootstrap: {}ms to ready",
            self.bootstrap_time_ms.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Device checks: {} computed, {} cache hits ({:.0}%), {} joined, {} failed",
            self.checks_computed.load(Ordering::Relaxed),
            self.cache_hits.load(Ordering::Relaxed),
            self.cache_hit_ratio() * 100.0,
            self.checks_joined.load(Ordering::Relaxed),
            self.detection_failures.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Settings: {} presets applied, {} rejected updates, {} saves",
            self.presets_applied.load(Ordering::Relaxed),
            self.settings_rejected.load(Ordering::Relaxed),
            self.settings_saved.load(Ordering::Relaxed)
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new();
        assert_eq!(metrics.checks_computed.load(Ordering::Relaxed), 0);
        assert_eq!(metrics.presets_applied.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_record_check_operations() {
        let metrics = Metrics::new();

        metrics.record_check_computed();
        metrics.record_cache_hit();
        metrics.record_cache_hit();
        metrics.record_cache_hit();
        metrics.record_detection_failure();

        assert_eq!(metrics.checks_computed.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.cache_hits.load(Ordering::Relaxed), 3);
        assert_eq!(metrics.detection_failures.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.cache_hit_ratio(), 0.75);
    }

    #[test]
    fn test_cache_hit_ratio_without_checks() {
        let metrics = Metrics::new();
        assert_eq!(metrics.cache_hit_ratio(), 0.0);
    }

    #[test]
    fn test_bootstrap_time_overwrites() {
        let metrics = Metrics::new();
        metrics.record_bootstrap_time(Duration::from_millis(6000));
        metrics.record_bootstrap_time(Duration::from_millis(6500));
        assert_eq!(metrics.bootstrap_time_ms.load(Ordering::Relaxed), 6500);
    }

    #[test]
    fn test_global_is_shared() {
        assert!(std::ptr::eq(global(), global()));
    }
}
