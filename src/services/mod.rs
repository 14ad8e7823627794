//! Services module - Decision logic of the front-end core.
//!
//! Everything here is **UI-agnostic**: no rendering, no navigation, only the rules that
//! the screens consume.
//!
//! # Components
//!
//! - [`CompatibilityClassifier`]: Turns device signals into a [`DeviceProfile`](crate::models::DeviceProfile)
//!   and memoizes it in the process-wide [`DeviceProfileCache`]. At most one detection is
//!   ever in flight.
//! - [`SignalSource`]: Where device signals come from. [`SimulatedSignalSource`] is the
//!   production wiring (random, no real probing); [`FixedSignalSource`] is for tests.
//! - [`PresetNormalizer`]: Maps a preset's display strings onto canonical setting values.
//! - [`BootstrapSequencer`]: Joins the splash timer and the forced device check into a
//!   single ready transition.
//! - [`classify`]: Compatibility percentage → rating badge, shared by the game cards and
//!   the compatibility overview ([`compatibility`]).
//!
//! # Usage Example
//!
//! ```ignore
//! use optps2::services::{
//!     BootstrapSequencer, CompatibilityClassifier, DeviceProfileCache, SimulatedSignalSource,
//! };
//!
//! let classifier = Arc::new(CompatibilityClassifier::new(
//!     Arc::new(SimulatedSignalSource::default()),
//!     DeviceProfileCache::global(),
//!     Duration::from_secs(5),
//! ));
//!
//! let profile = BootstrapSequencer::new(classifier.clone(), Duration::from_secs(6))
//!     .launch()
//!     .await;
//!
//! // Later screens reuse the cached result
//! assert_eq!(classifier.check(false).await, profile);
//! ```

pub mod bootstrap;
pub mod cache;
pub mod classifier;
pub mod compatibility;
pub mod normalizer;
pub mod rating;
pub mod signal;

pub use bootstrap::{BootEvent, BootPhase, BootstrapSequencer};
pub use cache::{DetectionPermit, DeviceProfileCache};
pub use classifier::CompatibilityClassifier;
pub use compatibility::{CompatibilityEntry, bucket_counts, compatibility_list, filter_entries};
pub use normalizer::{PresetNormalizer, PresetSettings};
pub use rating::{RatingBadge, RatingLabel, classify};
pub use signal::{FixedSignalSource, SignalError, SignalSource, SimulatedSignalSource};
