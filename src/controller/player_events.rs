//! Playback session events flowing into the model

use tokio::sync::mpsc;

use crate::session::{EventKind, PlaybackStatus, SessionEvent};
use super::AppController;

const EVENT_QUEUE_CAPACITY: usize = 256;

impl AppController {
    /// Subscribe to the session and mirror its snapshots into the model.
    /// Calling it again replaces the previous subscription.
    pub fn start_session_listener(&self) -> tokio::task::JoinHandle<()> {
        let (tx, mut rx) = mpsc::channel::<SessionEvent>(EVENT_QUEUE_CAPACITY);

        // Listeners run under the session lock, so only hand the event off here
        let subscription = self.session.subscribe(move |event| {
            if let Err(e) = tx.try_send(event.clone()) {
                tracing::warn!(error = %e, kind = ?event.kind, "Dropping session event");
            }
        });
        // Dropping the old subscription unsubscribes it
        *self.session_subscription.lock() = Some(subscription);

        let model = self.model.clone();
        tracing::info!("Starting playback session listener");

        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                let model_guard = model.lock().await;

                if model_guard.should_quit().await {
                    tracing::debug!("Session listener shutting down");
                    break;
                }

                let snapshot = event.snapshot;
                match event.kind {
                    EventKind::Status => {
                        tracing::debug!(
                            status = %snapshot.status,
                            request = snapshot.request,
                            lesson_id = ?snapshot.lesson.as_ref().map(|l| l.id.as_str()),
                            "Session status changed"
                        );
                        // Surface load failures as a toast
                        if snapshot.status == PlaybackStatus::Failed {
                            if let Some(error) = &snapshot.error {
                                model_guard.set_error(AppController::format_error(error)).await;
                            }
                        }
                    }
                    EventKind::Position => {
                        tracing::trace!(position = snapshot.position_secs(), "Session position");
                    }
                }
                model_guard.apply_snapshot(snapshot).await;
            }
        })
    }
}
