//! Device compatibility classification.
//!
//! [`CompatibilityClassifier::check`] turns a [`SignalReading`](crate::models::SignalReading)
//! into a [`DeviceProfile`] and memoizes it in a [`DeviceProfileCache`]:
//!
//! - `check(false)` with a populated cache returns the cached profile without reading
//!   any signals. At most one real check happens per session unless forced.
//! - `check(true)` always detects again, except that a caller arriving while another
//!   detection is in flight waits for that detection and returns its result. The gate
//!   lives in the cache, so at most one detection is outstanding per cache even across
//!   several classifiers.
//! - Detection failures and timeouts resolve to [`DeviceProfile::unknown()`], so a check
//!   always completes.

use super::cache::DeviceProfileCache;
use super::signal::{SignalError, SignalSource};
use crate::metrics;
use crate::models::{DeviceProfile, Tier};
use std::sync::Arc;
use std::time::Duration;

/// Turns raw device signals into a memoized [`DeviceProfile`].
pub struct CompatibilityClassifier {
    source: Arc<dyn SignalSource>,
    cache: Arc<DeviceProfileCache>,
    detection_timeout: Duration,
}

impl CompatibilityClassifier {
    /// Create a classifier publishing into `cache`.
    ///
    /// # Arguments
    /// * `source` - Where device signals come from
    /// * `cache` - Shared profile cache (usually [`DeviceProfileCache::global()`])
    /// * `detection_timeout` - Upper bound on a single signal read
    pub fn new(
        source: Arc<dyn SignalSource>,
        cache: Arc<DeviceProfileCache>,
        detection_timeout: Duration,
    ) -> Self {
        Self {
            source,
            cache,
            detection_timeout,
        }
    }

    pub fn cache(&self) -> &Arc<DeviceProfileCache> {
        &self.cache
    }

    /// Return the device profile, detecting it if needed.
    ///
    /// Publishes to the cache exactly once per call that actually detects.
    pub async fn check(&self, force: bool) -> DeviceProfile {
        if !force {
            if let Some(profile) = self.cache.get() {
                tracing::debug!("Device check served from cache");
                metrics::global().record_cache_hit();
                return profile;
            }
        }

        let seen = self.cache.detection_count();
        let permit = self.cache.acquire_detection().await;

        // A detection finished while we waited for the gate: join its result.
        if self.cache.detection_count() != seen {
            if let Some(profile) = self.cache.get() {
                tracing::debug!("Joined in-flight device check");
                metrics::global().record_check_joined();
                return profile;
            }
        }

        let profile = self.detect().await;
        metrics::global().record_check_computed();
        permit.publish(profile.clone());

        tracing::info!(
            "Device check complete: {} ({}), tier={}, score={}",
            profile.device_model,
            profile.processor_name,
            profile.tier,
            profile.performance_score
        );

        profile
    }

    async fn detect(&self) -> DeviceProfile {
        let outcome = match tokio::time::timeout(self.detection_timeout, self.source.read()).await
        {
            Ok(result) => result,
            Err(_) => Err(SignalError::TimedOut(self.detection_timeout)),
        };

        match outcome {
            Ok(reading) => {
                let span = Tier::for_reading(&reading).score_span();
                DeviceProfile::from_reading(&reading, self.source.score_offset(span))
            }
            Err(e) => {
                tracing::warn!("Device detection failed, assuming unknown tier: {}", e);
                metrics::global().record_detection_failure();
                DeviceProfile::unknown()
            }
        }
    }
}
