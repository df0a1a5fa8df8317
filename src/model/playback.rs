//! Playback-related types for rendering the transport bar

use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::catalog::{Lesson, LessonId};
use crate::session::{PlaybackError, PlaybackStatus, SessionSnapshot};

/// Position interpolation between session ticks for a smooth progress bar
#[derive(Clone, Debug)]
pub struct PlaybackTiming {
    pub position: Duration,
    pub last_update: Instant,
    pub is_playing: bool,
    pub duration: Option<Duration>,
}

impl Default for PlaybackTiming {
    fn default() -> Self {
        Self {
            position: Duration::ZERO,
            last_update: Instant::now(),
            is_playing: false,
            duration: None,
        }
    }
}

impl PlaybackTiming {
    pub fn current_position(&self) -> Duration {
        let position = if self.is_playing {
            self.position.saturating_add(self.last_update.elapsed())
        } else {
            self.position
        };
        match self.duration {
            Some(duration) => position.min(duration),
            None => position,
        }
    }

    pub fn update(&mut self, snapshot: &SessionSnapshot) {
        self.position = snapshot.position;
        self.duration = snapshot.duration;
        self.is_playing = snapshot.status == PlaybackStatus::Playing;
        self.last_update = Instant::now();
    }
}

/// Complete playback information for rendering the UI
#[derive(Clone, Debug)]
pub struct PlaybackInfo {
    pub status: PlaybackStatus,
    pub lesson: Option<Arc<Lesson>>,
    pub position: Duration,
    pub duration: Option<Duration>,
    pub error: Option<PlaybackError>,
}

impl Default for PlaybackInfo {
    fn default() -> Self {
        Self {
            status: PlaybackStatus::Idle,
            lesson: None,
            position: Duration::ZERO,
            duration: None,
            error: None,
        }
    }
}

impl PlaybackInfo {
    pub fn from_snapshot(snapshot: &SessionSnapshot, timing: &PlaybackTiming) -> Self {
        Self {
            status: snapshot.status,
            lesson: snapshot.lesson.clone(),
            position: timing.current_position(),
            duration: snapshot.duration,
            error: snapshot.error.clone(),
        }
    }

    pub fn is_current(&self, id: &LessonId) -> bool {
        self.lesson.as_ref().is_some_and(|lesson| &lesson.id == id)
    }

    pub fn is_playing(&self) -> bool {
        self.status == PlaybackStatus::Playing
    }

    pub fn title(&self) -> &str {
        self.lesson
            .as_deref()
            .map(|lesson| lesson.title.as_str())
            .unwrap_or("Nothing playing")
    }

    /// Progress in `0.0..=1.0`; zero while the duration is unknown.
    pub fn ratio(&self) -> f64 {
        match self.duration {
            Some(duration) if !duration.is_zero() => {
                (self.position.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(status: PlaybackStatus, position: u64, duration: Option<u64>) -> SessionSnapshot {
        SessionSnapshot {
            status,
            position: Duration::from_secs(position),
            duration: duration.map(Duration::from_secs),
            ..SessionSnapshot::idle()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn interpolates_only_while_playing() {
        let mut timing = PlaybackTiming::default();
        timing.update(&snapshot(PlaybackStatus::Playing, 10, Some(300)));
        tokio::time::advance(Duration::from_millis(500)).await;
        assert_eq!(timing.current_position(), Duration::from_millis(10_500));

        timing.update(&snapshot(PlaybackStatus::Paused, 12, Some(300)));
        tokio::time::advance(Duration::from_secs(5)).await;
        assert_eq!(timing.current_position(), Duration::from_secs(12));
    }

    #[tokio::test(start_paused = true)]
    async fn interpolation_stops_at_duration() {
        let mut timing = PlaybackTiming::default();
        timing.update(&snapshot(PlaybackStatus::Playing, 299, Some(300)));
        tokio::time::advance(Duration::from_secs(3)).await;
        assert_eq!(timing.current_position(), Duration::from_secs(300));
    }

    #[test]
    fn ratio_handles_unknown_duration() {
        let info = PlaybackInfo {
            position: Duration::from_secs(30),
            ..PlaybackInfo::default()
        };
        assert_eq!(info.ratio(), 0.0);
        assert_eq!(info.title(), "Nothing playing");

        let info = PlaybackInfo {
            position: Duration::from_secs(75),
            duration: Some(Duration::from_secs(300)),
            ..PlaybackInfo::default()
        };
        assert!((info.ratio() - 0.25).abs() < f64::EPSILON);
    }
}
