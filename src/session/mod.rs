//! Playback session - the single authority over what is audible
//!
//! Exactly one lesson can be loaded at a time. Every command goes through the
//! session, which owns the audio output for the loaded lesson and notifies
//! subscribers of each transition:
//!
//! ```text
//! Idle --play_lesson--> Loading --ready--> Playing <--toggle--> Paused
//!                       Loading --error/timeout--> Failed
//! Playing --end of lesson / skip past end--> Ended
//! any --stop--> Idle        any --play_lesson--> Loading (previous released)
//! ```
//!
//! Loads are keyed by a monotonically increasing request number. A load that
//! completes after a newer `play_lesson` (or a `stop`) is discarded and its
//! output released without ever being started.

mod clock;
mod listeners;


use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::AbortHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::audio::{AudioBackend, AudioOutput};
use crate::catalog::{Lesson, LessonId};

use clock::PlaybackClock;
pub use listeners::Subscription;
use listeners::ListenerRegistry;

pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Clone, Copy, Debug)]
pub struct SessionConfig {
    /// Loads still pending after this long fail as unavailable.
    pub load_timeout: Duration,
    /// Cadence of position updates while playing.
    pub tick_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            load_timeout: DEFAULT_LOAD_TIMEOUT,
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackStatus {
    Idle,
    Loading,
    Playing,
    Paused,
    Ended,
    Failed,
}

impl fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlaybackStatus::Idle => "idle",
            PlaybackStatus::Loading => "loading",
            PlaybackStatus::Playing => "playing",
            PlaybackStatus::Paused => "paused",
            PlaybackStatus::Ended => "ended",
            PlaybackStatus::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("lesson {lesson} is unavailable: {reason}")]
    SourceUnavailable { lesson: LessonId, reason: String },
    #[error("no lesson is loaded")]
    NoActiveLesson,
    #[error("cannot {command} while {status}")]
    InvalidTransition {
        command: &'static str,
        status: PlaybackStatus,
    },
}

/// Read-only view of the session handed to subscribers and the UI.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionSnapshot {
    pub status: PlaybackStatus,
    pub lesson: Option<Arc<Lesson>>,
    pub position: Duration,
    pub duration: Option<Duration>,
    pub error: Option<PlaybackError>,
    pub request: u64,
}

impl SessionSnapshot {
    pub fn idle() -> Self {
        Self {
            status: PlaybackStatus::Idle,
            lesson: None,
            position: Duration::ZERO,
            duration: None,
            error: None,
            request: 0,
        }
    }

    pub fn position_secs(&self) -> f64 {
        self.position.as_secs_f64()
    }

    pub fn is_current(&self, id: &LessonId) -> bool {
        self.lesson.as_ref().is_some_and(|lesson| &lesson.id == id)
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self::idle()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    Status,
    Position,
}

#[derive(Clone, Debug)]
pub struct SessionEvent {
    pub kind: EventKind,
    pub snapshot: SessionSnapshot,
}

/// Aborts the load task when dropped, unless the task finished it itself.
struct InFlightLoad(Option<AbortHandle>);

impl InFlightLoad {
    fn disarm(mut self) {
        self.0.take();
    }
}

impl Drop for InFlightLoad {
    fn drop(&mut self) {
        if let Some(handle) = self.0.take() {
            handle.abort();
        }
    }
}

struct ActiveTrack {
    lesson: Arc<Lesson>,
    request: u64,
    output: Box<dyn AudioOutput>,
    clock: PlaybackClock,
}

/// Dropping a variant releases whatever it holds (output or in-flight load).
enum Transport {
    Idle,
    Loading {
        lesson: Arc<Lesson>,
        request: u64,
        task: Option<InFlightLoad>,
    },
    Playing(ActiveTrack),
    Paused(ActiveTrack),
    Ended {
        lesson: Arc<Lesson>,
        request: u64,
        position: Duration,
        duration: Option<Duration>,
    },
    Failed {
        lesson: Arc<Lesson>,
        request: u64,
        error: PlaybackError,
    },
}

impl Transport {
    fn status(&self) -> PlaybackStatus {
        match self {
            Transport::Idle => PlaybackStatus::Idle,
            Transport::Loading { .. } => PlaybackStatus::Loading,
            Transport::Playing(_) => PlaybackStatus::Playing,
            Transport::Paused(_) => PlaybackStatus::Paused,
            Transport::Ended { .. } => PlaybackStatus::Ended,
            Transport::Failed { .. } => PlaybackStatus::Failed,
        }
    }

    fn active_mut(&mut self) -> Option<&mut ActiveTrack> {
        match self {
            Transport::Playing(track) | Transport::Paused(track) => Some(track),
            _ => None,
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        let status = self.status();
        match self {
            Transport::Idle => SessionSnapshot::idle(),
            Transport::Loading { lesson, request, .. } => SessionSnapshot {
                status,
                lesson: Some(lesson.clone()),
                position: Duration::ZERO,
                duration: lesson.duration.length(),
                error: None,
                request: *request,
            },
            Transport::Playing(track) | Transport::Paused(track) => SessionSnapshot {
                status,
                lesson: Some(track.lesson.clone()),
                position: track.clock.position(),
                duration: track.clock.duration(),
                error: None,
                request: track.request,
            },
            Transport::Ended {
                lesson,
                request,
                position,
                duration,
            } => SessionSnapshot {
                status,
                lesson: Some(lesson.clone()),
                position: *position,
                duration: *duration,
                error: None,
                request: *request,
            },
            Transport::Failed {
                lesson,
                request,
                error,
            } => SessionSnapshot {
                status,
                lesson: Some(lesson.clone()),
                position: Duration::ZERO,
                duration: lesson.duration.length(),
                error: Some(error.clone()),
                request: *request,
            },
        }
    }
}

struct SessionInner {
    state: Mutex<Transport>,
    backend: Arc<dyn AudioBackend>,
    listeners: Arc<ListenerRegistry>,
    config: SessionConfig,
    last_request: std::sync::atomic::AtomicU64,
}

/// Cheap to clone; all clones drive the same session.
#[derive(Clone)]
pub struct PlaybackSession {
    inner: Arc<SessionInner>,
}

impl PlaybackSession {
    pub fn new(backend: Arc<dyn AudioBackend>, config: SessionConfig) -> Self {
        tracing::debug!(backend = backend.name(), ?config, "Playback session created");
        Self {
            inner: Arc::new(SessionInner {
                state: Mutex::new(Transport::Idle),
                backend,
                listeners: Arc::new(ListenerRegistry::default()),
                config,
                last_request: std::sync::atomic::AtomicU64::new(0),
            }),
        }
    }

    /// Make `lesson` the one audible track. Returns the request number of the
    /// load; the outcome (Playing or Failed) is reported to subscribers.
    pub async fn play_lesson(&self, lesson: Arc<Lesson>) -> u64 {
        let mut state = self.inner.state.lock().await;
        let request = self
            .inner
            .last_request
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst)
            + 1;

        let previous = std::mem::replace(
            &mut *state,
            Transport::Loading {
                lesson: lesson.clone(),
                request,
                task: None,
            },
        );
        if previous.status() != PlaybackStatus::Idle {
            tracing::debug!(previous = %previous.status(), "Releasing previous lesson");
        }
        drop(previous);

        tracing::info!(lesson_id = %lesson.id, title = %lesson.title, request, "Loading lesson");
        self.inner.emit(EventKind::Status, &state);

        let weak = Arc::downgrade(&self.inner);
        let backend = self.inner.backend.clone();
        let timeout = self.inner.config.load_timeout;
        let handle = tokio::spawn(async move {
            let result = match tokio::time::timeout(timeout, backend.open(&lesson)).await {
                Ok(opened) => opened.map_err(|e| e.to_string()),
                Err(_) => Err(format!("timed out after {}s", timeout.as_secs())),
            };
            if let Some(inner) = weak.upgrade() {
                inner.complete_load(request, result).await;
            }
        });

        if let Transport::Loading { task, .. } = &mut *state {
            *task = Some(InFlightLoad(Some(handle.abort_handle())));
        }
        request
    }

    pub async fn toggle_play_pause(&self) -> Result<PlaybackStatus, PlaybackError> {
        let mut state = self.inner.state.lock().await;
        let next = match std::mem::replace(&mut *state, Transport::Idle) {
            Transport::Playing(mut track) => {
                track.output.pause();
                track.clock.pause();
                Transport::Paused(track)
            }
            Transport::Paused(mut track) => {
                track.output.play();
                track.clock.resume();
                Transport::Playing(track)
            }
            other => {
                let status = other.status();
                *state = other;
                return Err(reject("toggle", status));
            }
        };
        *state = next;

        let status = state.status();
        tracing::debug!(%status, "Transport toggled");
        self.inner.emit(EventKind::Status, &state);
        Ok(status)
    }

    /// Move the playhead to `target_secs`, clamped to `[0, duration]`.
    pub async fn seek(&self, target_secs: f64) -> Result<Duration, PlaybackError> {
        let mut state = self.inner.state.lock().await;
        let status = state.status();
        let Some(track) = state.active_mut() else {
            return Err(reject("seek", status));
        };

        let fallback = track.clock.duration().unwrap_or_else(|| track.clock.position());
        let target = seconds_to_duration(target_secs, fallback);
        let position = apply_seek(track, target);

        self.inner.emit(EventKind::Position, &state);
        Ok(position)
    }

    pub async fn skip_forward(&self, delta: Duration) -> Result<Duration, PlaybackError> {
        self.skip(delta, true).await
    }

    pub async fn skip_back(&self, delta: Duration) -> Result<Duration, PlaybackError> {
        self.skip(delta, false).await
    }

    async fn skip(&self, delta: Duration, forward: bool) -> Result<Duration, PlaybackError> {
        let command = if forward { "skip forward" } else { "skip back" };
        let mut state = self.inner.state.lock().await;
        let status = state.status();
        let Some(track) = state.active_mut() else {
            return Err(reject(command, status));
        };

        let position = track.clock.position();
        if forward {
            let target = position.saturating_add(delta);
            if let Some(duration) = track.clock.duration().filter(|d| target >= *d) {
                self.inner.end_track(&mut state);
                return Ok(duration);
            }
            let position = apply_seek(track, target);
            self.inner.emit(EventKind::Position, &state);
            Ok(position)
        } else {
            let position = apply_seek(track, position.saturating_sub(delta));
            self.inner.emit(EventKind::Position, &state);
            Ok(position)
        }
    }

    /// Release the output and unload the lesson, whatever the current state.
    pub async fn stop(&self) {
        let mut state = self.inner.state.lock().await;
        if matches!(*state, Transport::Idle) {
            return;
        }
        let previous = std::mem::replace(&mut *state, Transport::Idle);
        tracing::info!(previous = %previous.status(), "Playback stopped");
        drop(previous);
        self.inner.emit(EventKind::Status, &state);
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.inner.state.lock().await.snapshot()
    }

    /// Register a listener for every status change and position update.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&SessionEvent) + Send + Sync + 'static,
    {
        let id = self.inner.listeners.add(Arc::new(listener));
        Subscription::new(id, Arc::downgrade(&self.inner.listeners))
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.listeners.len()
    }
}

impl SessionInner {
    /// Listeners run under the state lock so they observe transitions in order.
    fn emit(&self, kind: EventKind, state: &Transport) {
        let event = SessionEvent {
            kind,
            snapshot: state.snapshot(),
        };
        self.listeners.emit(&event);
    }

    async fn complete_load(
        self: &Arc<Self>,
        request: u64,
        result: Result<Box<dyn AudioOutput>, String>,
    ) {
        let mut state = self.state.lock().await;
        let current = matches!(&*state, Transport::Loading { request: r, .. } if *r == request);
        if !current {
            tracing::debug!(request, ok = result.is_ok(), "Stale load result ignored");
            return;
        }

        let Transport::Loading { lesson, task, .. } = std::mem::replace(&mut *state, Transport::Idle)
        else {
            return;
        };
        if let Some(task) = task {
            task.disarm();
        }

        match result {
            Ok(mut output) => {
                let duration = lesson.duration.length().or_else(|| output.duration());
                output.play();
                tracing::info!(lesson_id = %lesson.id, request, ?duration, "Lesson playing");
                *state = Transport::Playing(ActiveTrack {
                    lesson,
                    request,
                    output,
                    clock: PlaybackClock::started(duration),
                });
                self.emit(EventKind::Status, &state);
                self.spawn_ticker(request);
            }
            Err(reason) => {
                tracing::warn!(lesson_id = %lesson.id, request, %reason, "Lesson source unavailable");
                let error = PlaybackError::SourceUnavailable {
                    lesson: lesson.id.clone(),
                    reason,
                };
                *state = Transport::Failed {
                    lesson,
                    request,
                    error,
                };
                self.emit(EventKind::Status, &state);
            }
        }
    }

    fn spawn_ticker(self: &Arc<Self>, request: u64) {
        let weak = Arc::downgrade(self);
        let period = self.config.tick_interval;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let Some(inner) = weak.upgrade() else {
                    break;
                };
                if !inner.on_tick(request).await {
                    break;
                }
            }
            tracing::trace!(request, "Position ticker stopped");
        });
    }

    /// Returns false once the ticker for `request` should stop.
    async fn on_tick(&self, request: u64) -> bool {
        let mut state = self.state.lock().await;
        let finished = match &*state {
            Transport::Playing(track) if track.request == request => {
                track.clock.reached_end() || track.output.is_finished()
            }
            Transport::Paused(track) if track.request == request => return true,
            _ => return false,
        };

        if finished {
            self.end_track(&mut state);
            false
        } else {
            self.emit(EventKind::Position, &state);
            true
        }
    }

    fn end_track(&self, state: &mut Transport) {
        match std::mem::replace(state, Transport::Idle) {
            Transport::Playing(track) | Transport::Paused(track) => {
                let duration = track.clock.duration();
                let position = duration.unwrap_or_else(|| track.clock.position());
                tracing::info!(lesson_id = %track.lesson.id, request = track.request, "Lesson ended");
                *state = Transport::Ended {
                    lesson: track.lesson.clone(),
                    request: track.request,
                    position,
                    duration,
                };
            }
            other => *state = other,
        }
        self.emit(EventKind::Status, state);
    }
}

fn reject(command: &'static str, status: PlaybackStatus) -> PlaybackError {
    match status {
        PlaybackStatus::Idle => PlaybackError::NoActiveLesson,
        status => PlaybackError::InvalidTransition { command, status },
    }
}

fn apply_seek(track: &mut ActiveTrack, target: Duration) -> Duration {
    let position = track.clock.seek(target);
    if let Err(e) = track.output.seek(position) {
        tracing::warn!(lesson_id = %track.lesson.id, error = %e, "Output seek failed");
    }
    position
}

/// Negative and NaN targets clamp to zero; targets too large to represent use
/// `overflow` (the duration, when known).
fn seconds_to_duration(seconds: f64, overflow: Duration) -> Duration {
    if seconds.is_nan() || seconds <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(seconds).unwrap_or(overflow)
}
