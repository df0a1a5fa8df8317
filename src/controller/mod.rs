//! Controller module - Application logic and event handling
//!
//! - `input`: key event handling
//! - `playback`: transport commands forwarded to the playback session
//! - `navigation`: catalog loading, favorites and theme changes
//! - `player_events`: playback session events flowing into the model

mod input;
mod playback;
mod navigation;
mod player_events;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::catalog::CatalogSource;
use crate::config::Settings;
use crate::model::AppModel;
use crate::session::{PlaybackError, PlaybackSession, Subscription};

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: Arc<Mutex<AppModel>>,
    pub(crate) session: PlaybackSession,
    pub(crate) catalog: Arc<dyn CatalogSource>,
    settings: Arc<Mutex<Settings>>,
    settings_path: PathBuf,
    pub(crate) skip: Duration,
    session_subscription: Arc<parking_lot::Mutex<Option<Subscription>>>,
}

impl AppController {
    pub fn new(
        model: Arc<Mutex<AppModel>>,
        session: PlaybackSession,
        catalog: Arc<dyn CatalogSource>,
        settings: Settings,
        settings_path: PathBuf,
        skip: Duration,
    ) -> Self {
        Self {
            model,
            session,
            catalog,
            settings: Arc::new(Mutex::new(settings)),
            settings_path,
            skip,
            session_subscription: Arc::new(parking_lot::Mutex::new(None)),
        }
    }

    /// Release the session's audio and stop listening for its events.
    pub async fn shutdown(&self) {
        self.session.stop().await;
        // Take it out first so the slot lock is not held while unsubscribing
        let subscription = self.session_subscription.lock().take();
        if let Some(subscription) = subscription {
            subscription.unsubscribe();
        }
        tracing::debug!(listeners = self.session.subscriber_count(), "Session released");
    }

    pub(crate) fn format_error(error: &PlaybackError) -> String {
        match error {
            PlaybackError::SourceUnavailable { reason, .. } => {
                format!("This lesson could not be played: {}", reason)
            }
            PlaybackError::NoActiveLesson => "Select a lesson and press Enter first.".to_string(),
            other => format!("Error: {}", other),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use crate::audio::{AudioBackend, AudioError, AudioOutput};
    use crate::catalog::{CatalogError, CatalogLocation, CatalogSource, Lesson, LessonDuration, LessonId};
    use crate::config::Settings;
    use crate::model::{AppModel, FavoritesStore};
    use crate::session::{PlaybackSession, SessionConfig};
    use crate::theme::Theme;

    use super::AppController;

    pub fn lesson(id: &str) -> Arc<Lesson> {
        Arc::new(Lesson {
            id: LessonId::from(id),
            title: format!("Lesson {id}"),
            duration: LessonDuration::from_label("5:00"),
            audio: None,
        })
    }

    /// Catalog that serves a fixed list, or fails while `fail` is set.
    pub struct StaticCatalog {
        pub lessons: Vec<Arc<Lesson>>,
        pub fail: parking_lot::Mutex<bool>,
        location: CatalogLocation,
    }

    impl StaticCatalog {
        pub fn new(lessons: Vec<Arc<Lesson>>) -> Self {
            Self {
                lessons,
                fail: parking_lot::Mutex::new(false),
                location: CatalogLocation::Local("lessons.json".into()),
            }
        }
    }

    #[async_trait]
    impl CatalogSource for StaticCatalog {
        async fn fetch(&self) -> Result<Vec<Arc<Lesson>>, CatalogError> {
            if *self.fail.lock() {
                let error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
                return Err(CatalogError::Io {
                    path: "lessons.json".into(),
                    source: error,
                });
            }
            Ok(self.lessons.clone())
        }

        fn location(&self) -> &CatalogLocation {
            &self.location
        }
    }

    /// Backend whose lessons play forever, except ids listed as broken.
    #[derive(Default)]
    pub struct EndlessBackend {
        pub broken: HashSet<String>,
    }

    struct EndlessOutput;

    impl AudioOutput for EndlessOutput {
        fn play(&mut self) {}
        fn pause(&mut self) {}
        fn seek(&mut self, _position: Duration) -> Result<(), AudioError> {
            Ok(())
        }
        fn duration(&self) -> Option<Duration> {
            None
        }
        fn is_finished(&self) -> bool {
            false
        }
    }

    #[async_trait]
    impl AudioBackend for EndlessBackend {
        async fn open(&self, lesson: &Lesson) -> Result<Box<dyn AudioOutput>, AudioError> {
            if self.broken.contains(lesson.id.as_str()) {
                return Err(AudioError::MissingSource);
            }
            Ok(Box::new(EndlessOutput))
        }

        fn name(&self) -> &'static str {
            "endless"
        }
    }

    pub fn controller(
        dir: &tempfile::TempDir,
        catalog: Arc<dyn CatalogSource>,
        backend: EndlessBackend,
    ) -> AppController {
        let model = AppModel::new(
            Theme::default(),
            Duration::from_secs(10),
            FavoritesStore::new(dir.path().join("favorites.json")),
        );
        let session = PlaybackSession::new(Arc::new(backend), SessionConfig::default());
        AppController::new(
            Arc::new(Mutex::new(model)),
            session,
            catalog,
            Settings::default(),
            dir.path().join("settings.toml"),
            Duration::from_secs(10),
        )
    }
}
