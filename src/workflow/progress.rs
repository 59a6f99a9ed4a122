//! Simulated progress indicator.
//!
//! The percentage is cosmetic; it advances on a timer while the request is
//! in flight and never reaches 100% until a response arrives.

use super::Shared;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressPhase {
    Uploading,
    RunningModel,
    Analyzing,
    Complete,
}

impl ProgressPhase {
    /// Phase shown for a simulated percentage
    pub fn for_percent(percent: u8) -> Self {
        if percent < 40 {
            ProgressPhase::Uploading
        } else if percent < 70 {
            ProgressPhase::RunningModel
        } else {
            ProgressPhase::Analyzing
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProgressPhase::Uploading => "Uploading and processing file...",
            ProgressPhase::RunningModel => "Running GMM model on transactions...",
            ProgressPhase::Analyzing => "Analyzing results and generating report...",
            ProgressPhase::Complete => "Analysis complete!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub percent: u8,
    pub phase: ProgressPhase,
}

impl Progress {
    pub fn at(percent: u8) -> Self {
        Self {
            percent,
            phase: ProgressPhase::for_percent(percent),
        }
    }

    pub fn complete() -> Self {
        Self {
            percent: 100,
            phase: ProgressPhase::Complete,
        }
    }
}

/// Ticker settings
#[derive(Debug, Clone, Copy)]
pub struct ProgressCadence {
    pub tick: Duration,
    pub step: u8,
    pub ceiling: u8,
}

impl Default for ProgressCadence {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(200),
            step: 5,
            ceiling: 90,
        }
    }
}

/// Advance the indicator until the ceiling, the response, or a reset.
///
/// Every write happens under the workflow lock after checking that the
/// submission is still current and still ticking, so a late tick can never
/// overwrite the completed state.
pub(super) async fn run_ticker(shared: Arc<Shared>, epoch: u64, cadence: ProgressCadence) {
    let mut interval = interval_at(Instant::now() + cadence.tick, cadence.tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let mut inner = shared.lock();
        if inner.epoch != epoch || !inner.ticking {
            break;
        }

        let current = inner.progress.map(|p| p.percent).unwrap_or(0);
        let next = current.saturating_add(cadence.step).min(cadence.ceiling);
        inner.progress = Some(Progress::at(next));
        shared.publish(&inner);
        trace!(percent = next, "Progress tick");

        if next >= cadence.ceiling {
            inner.ticking = false;
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_thresholds() {
        assert_eq!(ProgressPhase::for_percent(0), ProgressPhase::Uploading);
        assert_eq!(ProgressPhase::for_percent(35), ProgressPhase::Uploading);
        assert_eq!(ProgressPhase::for_percent(40), ProgressPhase::RunningModel);
        assert_eq!(ProgressPhase::for_percent(65), ProgressPhase::RunningModel);
        assert_eq!(ProgressPhase::for_percent(70), ProgressPhase::Analyzing);
        assert_eq!(ProgressPhase::for_percent(90), ProgressPhase::Analyzing);
        assert_eq!(Progress::complete().phase.label(), "Analysis complete!");
    }
}
