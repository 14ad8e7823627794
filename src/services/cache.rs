//! Process-wide cache of the last device classification.
//!
//! # Lifecycle
//!
//! - **Init**: [`DeviceProfileCache::global()`] lazily creates the shared instance on first
//!   access. It starts empty; nothing is classified until someone asks.
//! - **Publish**: only [`CompatibilityClassifier`](super::CompatibilityClassifier) (and the
//!   bootstrap fallback path) publish, once per check that actually computed.
//! - **Reset**: [`reset()`](DeviceProfileCache::reset) empties the cache so the next
//!   non-forced check computes again.
//!
//! The cache also owns the detection gate. Every classifier sharing a cache goes through
//! [`acquire_detection()`](DeviceProfileCache::acquire_detection), so at most one
//! detection is outstanding per cache no matter how many classifiers exist.
//!
//! Tests build private instances with [`DeviceProfileCache::new()`] instead of touching
//! the global one.

use crate::models::DeviceProfile;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use tokio::sync::{Mutex, MutexGuard, watch};

static GLOBAL_CACHE: OnceLock<Arc<DeviceProfileCache>> = OnceLock::new();

/// Shared, memoized [`DeviceProfile`].
#[derive(Debug)]
pub struct DeviceProfileCache {
    profile_tx: watch::Sender<Option<DeviceProfile>>,
    publishes: AtomicU64,
    /// Held for the whole duration of a detection.
    detection_gate: Mutex<()>,
    /// Detections published through a [`DetectionPermit`].
    detections: AtomicU64,
}

/// Exclusive right to run a detection against a [`DeviceProfileCache`].
///
/// Other callers of [`DeviceProfileCache::acquire_detection`] wait until the permit is
/// published or dropped.
pub struct DetectionPermit<'a> {
    cache: &'a DeviceProfileCache,
    _guard: MutexGuard<'a, ()>,
}

impl DetectionPermit<'_> {
    /// Publish the detected profile and release the gate.
    pub fn publish(self, profile: DeviceProfile) {
        self.cache.publish(profile);
        self.cache.detections.fetch_add(1, Ordering::AcqRel);
    }
}

impl DeviceProfileCache {
    pub fn new() -> Self {
        let (profile_tx, _) = watch::channel(None);
        Self {
            profile_tx,
            publishes: AtomicU64::new(0),
            detection_gate: Mutex::new(()),
            detections: AtomicU64::new(0),
        }
    }

    /// The process-wide instance.
    pub fn global() -> Arc<DeviceProfileCache> {
        Arc::clone(GLOBAL_CACHE.get_or_init(|| Arc::new(DeviceProfileCache::new())))
    }

    /// The cached profile, if a check has completed.
    pub fn get(&self) -> Option<DeviceProfile> {
        self.profile_tx.borrow().clone()
    }

    pub fn is_populated(&self) -> bool {
        self.profile_tx.borrow().is_some()
    }

    /// Replace the cached profile and notify subscribers.
    pub fn publish(&self, profile: DeviceProfile) {
        tracing::debug!(
            "Publishing device profile: tier={}, score={}",
            profile.tier,
            profile.performance_score
        );
        self.profile_tx.send_replace(Some(profile));
        self.publishes.fetch_add(1, Ordering::AcqRel);
    }

    /// Empty the cache; the publish count is kept.
    pub fn reset(&self) {
        tracing::debug!("Device profile cache reset");
        self.profile_tx.send_replace(None);
    }

    /// Number of publishes since creation.
    ///
    /// Used to tell whether a check finished while a caller was waiting for its turn.
    pub fn publish_count(&self) -> u64 {
        self.publishes.load(Ordering::Acquire)
    }

    /// Wait until no other detection is running on this cache, then claim the gate.
    pub async fn acquire_detection(&self) -> DetectionPermit<'_> {
        DetectionPermit {
            cache: self,
            _guard: self.detection_gate.lock().await,
        }
    }

    /// Number of detections published through a permit.
    ///
    /// Plain [`publish`](DeviceProfileCache::publish) calls do not count, so a waiter can
    /// tell a finished detection apart from a fallback write.
    pub fn detection_count(&self) -> u64 {
        self.detections.load(Ordering::Acquire)
    }

    /// Watch the cached value; the receiver sees every publish and reset.
    pub fn subscribe(&self) -> watch::Receiver<Option<DeviceProfile>> {
        self.profile_tx.subscribe()
    }
}

impl Default for DeviceProfileCache {
    fn default() -> Self {
        Self::new()
    }
}
