//! Delivered-frame rate tracking for console consumers.

use std::time::{Duration, Instant};

/// Snapshot emitted by [`FrameRate::record_at`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RateReport {
    /// Frames recorded since the tracker started.
    pub frames: u64,
    /// Average frames per second since the tracker started.
    pub fps: f64,
}

/// Counts frames and periodically reports the average frame rate.
#[derive(Debug)]
pub struct FrameRate {
    started_at: Instant,
    last_report: Instant,
    interval: Duration,
    frames: u64,
}

impl FrameRate {
    /// Start tracking at `now`, reporting at most once per `interval`.
    #[must_use]
    pub fn new(now: Instant, interval: Duration) -> Self {
        Self {
            started_at: now,
            last_report: now,
            interval,
            frames: 0,
        }
    }

    /// Frames recorded so far.
    #[must_use]
    pub const fn frames(&self) -> u64 { self.frames }

    /// Record one frame at `now`.
    ///
    /// Returns a report when at least `interval` has passed since the previous
    /// one.
    pub fn record_at(&mut self, now: Instant) -> Option<RateReport> {
        self.frames += 1;
        if now.saturating_duration_since(self.last_report) < self.interval {
            return None;
        }
        self.last_report = now;
        let secs = now
            .saturating_duration_since(self.started_at)
            .as_secs_f64()
            .max(1e-6);
        #[expect(
            clippy::cast_precision_loss,
            reason = "frame counts stay far below 2^52"
        )]
        let fps = self.frames as f64 / secs;
        Some(RateReport {
            frames: self.frames,
            fps,
        })
    }
}
