//! Startup sequencing: splash → device check → ready.
//!
//! The splash screen has a minimum duration and the device check takes however long the
//! signal source takes. Neither is assumed to finish first. The sequencer runs both as
//! separate tasks and counts completions on a channel; the second completion moves it
//! to [`BootPhase::Ready`].
//!
//! ```text
//! Splash ──enter──▶ AwaitingBoth ──timer──▶ AwaitingCheck ──check──▶ Ready
//!                        │                                          ▲
//!                        └──────check──▶ AwaitingTimer ───timer─────┘
//! ```
//!
//! The profile is in the [`DeviceProfileCache`] before `Ready` is published, and `Ready`
//! is published once per sequencer. [`BootstrapSequencer::launch`] additionally makes sure
//! only one sequencer ever runs per process.

use super::cache::DeviceProfileCache;
use super::classifier::CompatibilityClassifier;
use crate::metrics;
use crate::models::DeviceProfile;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OnceCell, mpsc, watch};
use tokio::time::Instant;

/// Progress steps of the splash bar (10% each).
const PROGRESS_STEPS: u32 = 10;

/// Extra steps the full bar stays on screen before the splash may close.
const HOLD_STEPS: u32 = 2;

static SESSION: OnceCell<DeviceProfile> = OnceCell::const_new();

/// Phase of the startup state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BootPhase {
    Splash,
    /// Timer and device check both pending.
    AwaitingBoth,
    /// Timer elapsed, device check pending.
    AwaitingCheck,
    /// Device check done, timer pending.
    AwaitingTimer,
    Ready,
}

/// Completion events driving [`BootPhase`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootEvent {
    /// Leaving the splash: both tasks are launched.
    Enter,
    TimerElapsed,
    CheckCompleted,
}

impl BootPhase {
    /// Next phase after `event`. Events that do not apply leave the phase unchanged.
    pub fn next(self, event: BootEvent) -> BootPhase {
        use BootEvent::*;
        use BootPhase::*;

        match (self, event) {
            (Splash, Enter) => AwaitingBoth,
            (AwaitingBoth, TimerElapsed) => AwaitingCheck,
            (AwaitingBoth, CheckCompleted) => AwaitingTimer,
            (AwaitingCheck, CheckCompleted) => Ready,
            (AwaitingTimer, TimerElapsed) => Ready,
            (phase, _) => phase,
        }
    }

    pub fn is_ready(self) -> bool {
        self == BootPhase::Ready
    }
}

enum Completion {
    Timer,
    Check(DeviceProfile),
}

/// Orchestrates the splash timer and the forced device check into one ready transition.
pub struct BootstrapSequencer {
    classifier: Arc<CompatibilityClassifier>,
    min_duration: Duration,
    phase_tx: watch::Sender<BootPhase>,
    progress_tx: watch::Sender<u8>,
}

impl BootstrapSequencer {
    /// # Arguments
    /// * `classifier` - Runs the forced device check; its cache receives the profile
    /// * `min_duration` - Minimum time before the splash may close
    pub fn new(classifier: Arc<CompatibilityClassifier>, min_duration: Duration) -> Self {
        let (phase_tx, _) = watch::channel(BootPhase::Splash);
        let (progress_tx, _) = watch::channel(0);
        Self {
            classifier,
            min_duration,
            phase_tx,
            progress_tx,
        }
    }

    /// Watch the phase. A receiver that observes [`BootPhase::Ready`] will find the
    /// profile in the cache.
    pub fn subscribe(&self) -> watch::Receiver<BootPhase> {
        self.phase_tx.subscribe()
    }

    /// Watch splash progress, 0 to 100.
    pub fn progress(&self) -> watch::Receiver<u8> {
        self.progress_tx.subscribe()
    }

    pub fn cache(&self) -> &Arc<DeviceProfileCache> {
        self.classifier.cache()
    }

    /// Run this sequencer unless one already ran in this process.
    ///
    /// The first call drives the sequence to ready; every later call (including
    /// concurrent ones) returns the profile from that first run without starting anything.
    pub async fn launch(self) -> DeviceProfile {
        SESSION.get_or_init(|| self.run()).await.clone()
    }

    /// Drive the sequence to [`BootPhase::Ready`] and return the device profile.
    ///
    /// Never fails: if the check task is lost, the unknown-tier profile is published instead.
    pub async fn run(self) -> DeviceProfile {
        let started = Instant::now();
        let mut phase = BootPhase::Splash.next(BootEvent::Enter);
        self.phase_tx.send_replace(phase);
        tracing::info!(
            "Bootstrap started: splash for at least {:?}, device check running",
            self.min_duration
        );

        let (done_tx, mut done_rx) = mpsc::channel(2);

        let timer_tx = done_tx.clone();
        let progress_tx = self.progress_tx.clone();
        let min_duration = self.min_duration;
        tokio::spawn(async move {
            run_splash_timer(min_duration, &progress_tx).await;
            let _ = timer_tx.send(Completion::Timer).await;
        });

        let classifier = Arc::clone(&self.classifier);
        tokio::spawn(async move {
            let profile = classifier.check(true).await;
            let _ = done_tx.send(Completion::Check(profile)).await;
        });

        let mut profile = None;
        let mut timer_done = false;
        while !phase.is_ready() {
            let event = match done_rx.recv().await {
                Some(Completion::Timer) => {
                    timer_done = true;
                    BootEvent::TimerElapsed
                }
                Some(Completion::Check(checked)) => {
                    profile = Some(checked);
                    BootEvent::CheckCompleted
                }
                // Both senders gone without finishing: a task panicked.
                None => {
                    tracing::error!("Bootstrap task ended without reporting, finishing anyway");
                    if !timer_done {
                        self.progress_tx.send_replace(100);
                    }
                    break;
                }
            };

            phase = phase.next(event);
            if !phase.is_ready() {
                tracing::debug!("Bootstrap phase: {:?}", phase);
                self.phase_tx.send_replace(phase);
            }
        }

        let profile = match profile {
            Some(profile) => profile,
            None => {
                let fallback = DeviceProfile::unknown();
                self.cache().publish(fallback.clone());
                fallback
            }
        };

        if !self.cache().is_populated() {
            self.cache().publish(profile.clone());
        }

        self.phase_tx.send_replace(BootPhase::Ready);
        metrics::global().record_bootstrap_time(started.elapsed());
        tracing::info!(
            "Bootstrap ready after {:?}: {}",
            started.elapsed(),
            profile.headline()
        );

        profile
    }
}

/// Advance the splash bar to 100% and hold, taking `min_duration` in total.
async fn run_splash_timer(min_duration: Duration, progress_tx: &watch::Sender<u8>) {
    let step = min_duration / (PROGRESS_STEPS + HOLD_STEPS);
    let mut progress: u8 = 0;

    for _ in 0..PROGRESS_STEPS {
        tokio::time::sleep(step).await;
        progress = progress.saturating_add(100 / PROGRESS_STEPS as u8).min(100);
        progress_tx.send_replace(progress);
    }

    // Cover the remainder lost to integer division along with the hold.
    let elapsed_steps = step * PROGRESS_STEPS;
    tokio::time::sleep(min_duration.saturating_sub(elapsed_steps)).await;
}
