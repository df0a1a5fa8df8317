//! Playhead tracking for the active lesson

use std::time::Duration;
use tokio::time::Instant;

/// Position is anchored at the last play/seek and advanced by wall-clock time
/// while running. Always clamped to the duration when one is known.
#[derive(Clone, Debug)]
pub struct PlaybackClock {
    position: Duration,
    anchor: Option<Instant>,
    duration: Option<Duration>,
}

impl PlaybackClock {
    pub fn started(duration: Option<Duration>) -> Self {
        Self {
            position: Duration::ZERO,
            anchor: Some(Instant::now()),
            duration,
        }
    }

    pub fn position(&self) -> Duration {
        let raw = match self.anchor {
            Some(anchor) => self.position.saturating_add(anchor.elapsed()),
            None => self.position,
        };
        self.clamp(raw)
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    pub fn is_running(&self) -> bool {
        self.anchor.is_some()
    }

    pub fn reached_end(&self) -> bool {
        self.duration.is_some_and(|d| self.position() >= d)
    }

    pub fn pause(&mut self) {
        self.position = self.position();
        self.anchor = None;
    }

    pub fn resume(&mut self) {
        if !self.is_running() {
            self.anchor = Some(Instant::now());
        }
    }

    /// Move the playhead, returning the clamped position actually applied.
    pub fn seek(&mut self, target: Duration) -> Duration {
        let position = self.clamp(target);
        self.position = position;
        if self.is_running() {
            self.anchor = Some(Instant::now());
        }
        position
    }

    fn clamp(&self, position: Duration) -> Duration {
        match self.duration {
            Some(duration) => position.min(duration),
            None => position,
        }
    }
}
