//! Loading timer feeding the resolver's elapsed input.

use std::time::{Duration, Instant};

/// Measures how long one load has been running.
///
/// The owning store restarts it whenever a load begins and stops it the
/// moment the load ends, so elapsed time always belongs to the current load.
/// Instants are passed in to keep the timer deterministic under test.
#[derive(Debug, Clone, Default)]
pub struct LoadingTimer {
    started_at: Option<Instant>,
}

impl LoadingTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A timer already running since `now`.
    pub fn started(now: Instant) -> Self {
        Self {
            started_at: Some(now),
        }
    }

    /// Begins a new load, discarding any previous start.
    pub fn restart(&mut self, now: Instant) {
        self.started_at = Some(now);
    }

    pub fn stop(&mut self) {
        self.started_at = None;
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Zero when stopped.
    pub fn elapsed(&self, now: Instant) -> Duration {
        self.started_at
            .map(|start| now.saturating_duration_since(start))
            .unwrap_or(Duration::ZERO)
    }

    /// When `timeout` will be reached, if running.
    pub fn deadline(&self, timeout: Duration) -> Option<Instant> {
        self.started_at.map(|start| start + timeout)
    }
}
