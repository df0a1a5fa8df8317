//! Transport commands forwarded to the playback session

use crate::session::{PlaybackError, PlaybackStatus};
use super::AppController;

impl AppController {
    /// Play the lesson under the cursor. Also retries a lesson that failed.
    pub async fn play_selected(&self) {
        // Take the selection and release the model before talking to the session
        let selected = self.model.lock().await.get_selected_lesson().await;
        if let Some(lesson) = selected {
            let current = self.session.snapshot().await;
            if current.is_current(&lesson.id) && current.status == PlaybackStatus::Failed {
                tracing::info!(lesson_id = %lesson.id, "Retrying failed lesson");
            }
            // Supersedes any load still in flight
            let request = self.session.play_lesson(lesson.clone()).await;
            tracing::debug!(lesson_id = %lesson.id, request, "Play requested");
        }
    }

    /// Space: pause or resume; replays the current lesson once it has ended or failed.
    pub async fn toggle_playback(&self) {
        match self.session.toggle_play_pause().await {
            Ok(status) => tracing::debug!(%status, "Playback toggled"),
            Err(PlaybackError::InvalidTransition {
                status: PlaybackStatus::Ended | PlaybackStatus::Failed,
                ..
            }) => {
                // Ended and Failed keep the lesson, so it can be started again
                let snapshot = self.session.snapshot().await;
                if let Some(lesson) = snapshot.lesson {
                    tracing::info!(lesson_id = %lesson.id, "Replaying lesson");
                    self.session.play_lesson(lesson).await;
                }
            }
            // Nothing loaded yet, or still loading
            Err(e) => tracing::debug!(error = %e, "Toggle ignored"),
        }
    }

    pub async fn skip_forward(&self) {
        match self.session.skip_forward(self.skip).await {
            Ok(position) => tracing::debug!(position = position.as_secs_f64(), "Skipped forward"),
            Err(e) => tracing::debug!(error = %e, "Skip forward ignored"),
        }
    }

    pub async fn skip_back(&self) {
        match self.session.skip_back(self.skip).await {
            Ok(position) => tracing::debug!(position = position.as_secs_f64(), "Skipped back"),
            Err(e) => tracing::debug!(error = %e, "Skip back ignored"),
        }
    }

    /// Back to the start of the current lesson.
    pub async fn restart_lesson(&self) {
        if let Err(e) = self.session.seek(0.0).await {
            tracing::debug!(error = %e, "Restart ignored");
        }
    }

    pub async fn stop_playback(&self) {
        self.session.stop().await;
    }
}
