//! Device signal sources.
//!
//! The classifier never probes hardware itself. It asks a [`SignalSource`] for a
//! [`SignalReading`] and turns that into a profile. Two sources ship with the crate:
//!
//! - [`SimulatedSignalSource`]: the production wiring. It draws a random device after a
//!   short artificial delay; there is no real hardware probing behind it.
//! - [`FixedSignalSource`]: returns a fixed reading (or a fixed failure), for tests and demos.

use crate::models::device::UNKNOWN_LABEL;
use crate::models::{SignalReading, TierHint};
use async_trait::async_trait;
use rand::Rng;
use rand::seq::IndexedRandom;
use std::time::Duration;
use thiserror::Error;

/// Errors a signal source can report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    #[error("Signal source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Device detection timed out after {0:?}")]
    TimedOut(Duration),
}

/// Provider of raw device signals.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SignalSource: Send + Sync {
    /// Read the device signals. May take a while and may fail.
    async fn read(&self) -> Result<SignalReading, SignalError>;

    /// Position of the performance score inside a tier range of `span` values.
    ///
    /// Real signals are noisy, so this is where score jitter comes from. Deterministic
    /// sources return 0, which puts the score at the bottom of the range.
    fn score_offset(&self, span: u32) -> u32 {
        let _ = span;
        0
    }
}

const HIGH_END_PROCESSORS: &[&str] = &[
    "Snapdragon 8 Gen 2",
    "Snapdragon 8+ Gen 1",
    "Snapdragon 888",
    "Snapdragon 865",
];

const MID_RANGE_PROCESSORS: &[&str] = &[
    "Snapdragon 780G",
    "Snapdragon 778G",
    "Snapdragon 765G",
    "Snapdragon 750G",
];

const OTHER_PROCESSORS: &[&str] = &["MediaTek Dimensity 8200", "Exynos 2200", "Unisoc T612"];

const DEVICE_MODELS: &[&str] = &[
    "Samsung Galaxy S23",
    "Xiaomi 13 Pro",
    "OnePlus 11",
    "Motorola Edge 40 Pro",
    "Pixel 7 Pro",
];

const RAM_SIZES: &[&str] = &["6 GB", "8 GB", "12 GB", "16 GB"];

/// Randomized stand-in for hardware detection.
///
/// 80% of draws are Snapdragon devices; of those 70% are 8xx series and 30% 7xx.
#[derive(Debug, Clone)]
pub struct SimulatedSignalSource {
    latency: Duration,
}

impl SimulatedSignalSource {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    fn draw() -> SignalReading {
        let mut rng = rand::rng();

        let vendor_match = rng.random_bool(0.8);
        let tier_hint = if !vendor_match {
            TierHint::Unknown
        } else if rng.random_bool(0.7) {
            TierHint::High
        } else {
            TierHint::Mid
        };

        let processors = match tier_hint {
            TierHint::High => HIGH_END_PROCESSORS,
            TierHint::Mid => MID_RANGE_PROCESSORS,
            TierHint::Unknown => OTHER_PROCESSORS,
        };

        let pick = |choices: &[&str], rng: &mut rand::rngs::ThreadRng| {
            choices
                .choose(rng)
                .copied()
                .unwrap_or(UNKNOWN_LABEL)
                .to_string()
        };

        SignalReading {
            vendor_match,
            tier_hint,
            processor_name: pick(processors, &mut rng),
            device_model: pick(DEVICE_MODELS, &mut rng),
            ram_label: pick(RAM_SIZES, &mut rng),
        }
    }
}

impl Default for SimulatedSignalSource {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}

#[async_trait]
impl SignalSource for SimulatedSignalSource {
    async fn read(&self) -> Result<SignalReading, SignalError> {
        tokio::time::sleep(self.latency).await;
        let reading = Self::draw();
        tracing::debug!(
            "Simulated device: {} / {} / {}",
            reading.device_model,
            reading.processor_name,
            reading.ram_label
        );
        Ok(reading)
    }

    fn score_offset(&self, span: u32) -> u32 {
        if span == 0 {
            return 0;
        }
        rand::rng().random_range(0..span)
    }
}

/// Deterministic source returning the same outcome on every read.
#[derive(Debug, Clone)]
pub struct FixedSignalSource {
    outcome: Result<SignalReading, SignalError>,
    latency: Duration,
    score_offset: u32,
}

impl FixedSignalSource {
    pub fn new(reading: SignalReading) -> Self {
        Self {
            outcome: Ok(reading),
            latency: Duration::ZERO,
            score_offset: 0,
        }
    }

    /// A source whose every read fails with `error`.
    pub fn failing(error: SignalError) -> Self {
        Self {
            outcome: Err(error),
            latency: Duration::ZERO,
            score_offset: 0,
        }
    }

    /// A matching high-end device.
    pub fn high_end() -> Self {
        Self::new(SignalReading {
            vendor_match: true,
            tier_hint: TierHint::High,
            processor_name: "Snapdragon 8 Gen 2".to_string(),
            device_model: "Samsung Galaxy S23".to_string(),
            ram_label: "12 GB".to_string(),
        })
    }

    /// A matching mid-range device.
    pub fn mid_range() -> Self {
        Self::new(SignalReading {
            vendor_match: true,
            tier_hint: TierHint::Mid,
            processor_name: "Snapdragon 778G".to_string(),
            device_model: "Xiaomi 13 Pro".to_string(),
            ram_label: "8 GB".to_string(),
        })
    }

    /// A device from another vendor.
    pub fn other_vendor() -> Self {
        Self::new(SignalReading {
            vendor_match: false,
            tier_hint: TierHint::Unknown,
            processor_name: "Exynos 2200".to_string(),
            device_model: "Pixel 7 Pro".to_string(),
            ram_label: "6 GB".to_string(),
        })
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_score_offset(mut self, offset: u32) -> Self {
        self.score_offset = offset;
        self
    }
}

#[async_trait]
impl SignalSource for FixedSignalSource {
    async fn read(&self) -> Result<SignalReading, SignalError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.outcome.clone()
    }

    fn score_offset(&self, _span: u32) -> u32 {
        self.score_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_simulated_source_draws_consistent_reading() {
        let source = SimulatedSignalSource::new(Duration::from_secs(2));

        for _ in 0..50 {
            let reading = source.read().await.unwrap();
            match reading.tier_hint {
                TierHint::High => {
                    assert!(reading.vendor_match);
                    assert!(HIGH_END_PROCESSORS.contains(&reading.processor_name.as_str()));
                }
                TierHint::Mid => {
                    assert!(reading.vendor_match);
                    assert!(MID_RANGE_PROCESSORS.contains(&reading.processor_name.as_str()));
                }
                TierHint::Unknown => {
                    assert!(!reading.vendor_match);
                    assert!(OTHER_PROCESSORS.contains(&reading.processor_name.as_str()));
                }
            }
            assert!(DEVICE_MODELS.contains(&reading.device_model.as_str()));
            assert!(RAM_SIZES.contains(&reading.ram_label.as_str()));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_source_waits_for_latency() {
        let source = SimulatedSignalSource::new(Duration::from_secs(2));
        let started = tokio::time::Instant::now();
        source.read().await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(2));
    }

    #[test]
    fn test_simulated_score_offset_in_span() {
        let source = SimulatedSignalSource::default();
        for _ in 0..100 {
            assert!(source.score_offset(15) < 15);
        }
        assert_eq!(source.score_offset(0), 0);
    }

    #[test]
    fn test_fixed_source_returns_outcome() {
        let source = FixedSignalSource::failing(SignalError::SourceUnavailable(
            "sensor offline".to_string(),
        ));
        let result = tokio_test::block_on(source.read());
        assert_eq!(
            result,
            Err(SignalError::SourceUnavailable("sensor offline".to_string()))
        );

        let source = FixedSignalSource::mid_range().with_score_offset(4);
        let reading = tokio_test::block_on(source.read()).unwrap();
        assert_eq!(reading.tier_hint, TierHint::Mid);
        assert_eq!(source.score_offset(20), 4);
    }
}
