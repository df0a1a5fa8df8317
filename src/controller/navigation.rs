//! Catalog loading, favorites and theme changes

use crate::model::SettingsRow;
use crate::theme::Theme;
use super::AppController;

impl AppController {
    /// Fetch the catalog into the model. Failures become the empty-list message.
    pub async fn load_catalog(&self) {
        self.model.lock().await.set_catalog_loading().await;
        self.fetch_catalog().await;
    }

    async fn fetch_catalog(&self) {
        tracing::debug!(location = %self.catalog.location(), "Loading catalog");

        // Fetch on its own task so a panic still leaves the model out of Loading
        let catalog = self.catalog.clone();
        let result = tokio::spawn(async move { catalog.fetch().await }).await;

        let model = self.model.lock().await;
        match result {
            Ok(Ok(lessons)) => {
                tracing::info!(count = lessons.len(), "Catalog loaded");
                model.set_catalog_loaded(lessons).await;
            }
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Catalog fetch failed");
                model.set_catalog_failed(e.to_string()).await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Catalog task aborted");
                model
                    .set_catalog_failed("The catalog could not be read".to_string())
                    .await;
            }
        }
    }

    /// Load the catalog in the background unless a load is already running.
    pub async fn reload_catalog(&self) {
        // Check and mark under one lock so two presses cannot both start a fetch
        {
            let model = self.model.lock().await;
            if model.is_catalog_loading().await {
                tracing::debug!("Catalog load already in progress");
                return;
            }
            model.set_catalog_loading().await;
        }
        // Keep the input loop responsive while the fetch runs
        let controller = self.clone();
        tokio::spawn(async move {
            controller.fetch_catalog().await;
        });
    }

    pub async fn load_favorites(&self) {
        let model = self.model.lock().await;
        if let Err(e) = model.load_favorites().await {
            tracing::warn!(error = %e, "Could not load favorites");
        }
    }

    pub async fn toggle_selected_favorite(&self) {
        let model = self.model.lock().await;
        let Some(lesson) = model.get_selected_lesson().await else {
            return;
        };
        match model.toggle_favorite(&lesson.id).await {
            Ok(favorite) => tracing::info!(lesson_id = %lesson.id, favorite, "Favorite toggled"),
            Err(e) => {
                tracing::error!(lesson_id = %lesson.id, error = %e, "Could not save favorites");
                model.set_error(format!("Could not save favorites: {}", e)).await;
            }
        }
    }

    pub async fn toggle_dark_mode(&self) {
        let mut theme = self.model.lock().await.get_theme().await;
        theme.dark_mode = !theme.dark_mode;
        self.apply_theme(theme).await;
    }

    pub async fn cycle_accent(&self) {
        let mut theme = self.model.lock().await.get_theme().await;
        theme.accent = theme.accent.next();
        self.apply_theme(theme).await;
    }

    /// Enter on the settings screen.
    pub async fn activate_setting(&self) {
        let row = self.model.lock().await.get_selected_setting().await;
        match row {
            SettingsRow::DarkMode => self.toggle_dark_mode().await,
            SettingsRow::Accent => self.cycle_accent().await,
            // Read-only, set from the command line or settings.toml
            SettingsRow::SkipIncrement => {}
        }
    }

    /// Show the theme and persist it to settings.toml.
    async fn apply_theme(&self, theme: Theme) {
        // Screen first, so a failed save still shows the change
        self.model.lock().await.set_theme(theme).await;

        let mut settings = self.settings.lock().await;
        settings.theme = theme;
        if let Err(e) = settings.save_to_path(&self.settings_path) {
            tracing::error!(error = %e, "Could not save settings");
            let model = self.model.lock().await;
            model.set_error(format!("Could not save settings: {}", e)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::super::test_support::{controller, lesson, EndlessBackend, StaticCatalog};
    use crate::catalog::{Catalog, CatalogError, CatalogLocation, CatalogSource, Lesson};
    use crate::config::Settings;
    use crate::model::{CatalogState, Tab};
    use crate::theme::AccentColor;

    struct PanickingCatalog {
        location: CatalogLocation,
    }

    #[async_trait]
    impl CatalogSource for PanickingCatalog {
        async fn fetch(&self) -> Result<Vec<Arc<Lesson>>, CatalogError> {
            panic!("feed parser blew up");
        }

        fn location(&self) -> &CatalogLocation {
            &self.location
        }
    }

    #[tokio::test]
    async fn oversized_durations_still_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lessons.json");
        std::fs::write(
            &path,
            r#"[{"id": 1, "title": "A", "duration": 1e30},
                {"id": 2, "title": "B", "duration": "18446744073709551615:59"}]"#,
        )
        .unwrap();
        let catalog = Arc::new(Catalog::new(
            reqwest::Client::new(),
            CatalogLocation::Local(path),
        ));
        let controller = controller(&dir, catalog, EndlessBackend::default());

        controller.load_catalog().await;

        let content = controller.model.lock().await.get_content_state().await;
        let lessons = content.catalog.lessons();
        assert_eq!(lessons.len(), 2);
        assert!(lessons.iter().all(|l| l.duration.length().is_none()));
    }

    #[tokio::test]
    async fn panicking_fetch_leaves_a_retryable_failure() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Arc::new(PanickingCatalog {
            location: CatalogLocation::Local("lessons.json".into()),
        });
        let controller = controller(&dir, catalog, EndlessBackend::default());

        controller.load_catalog().await;

        let model = controller.model.lock().await;
        assert!(!model.is_catalog_loading().await);
        let content = model.get_content_state().await;
        assert!(matches!(content.catalog, CatalogState::Failed(_)));
    }

    #[tokio::test]
    async fn failed_catalog_can_be_retried() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Arc::new(StaticCatalog::new(vec![lesson("ihram"), lesson("tawaf")]));
        *catalog.fail.lock() = true;
        let controller = controller(&dir, catalog.clone(), EndlessBackend::default());

        controller.load_catalog().await;
        let content = controller.model.lock().await.get_content_state().await;
        assert!(matches!(content.catalog, CatalogState::Failed(_)));

        *catalog.fail.lock() = false;
        controller.load_catalog().await;
        let content = controller.model.lock().await.get_content_state().await;
        assert_eq!(content.catalog.lessons().len(), 2);
    }

    #[tokio::test]
    async fn theme_changes_are_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Arc::new(StaticCatalog::new(Vec::new()));
        let controller = controller(&dir, catalog, EndlessBackend::default());

        controller.toggle_dark_mode().await;
        controller.cycle_accent().await;

        let ui_state = controller.model.lock().await.get_ui_state().await;
        assert!(!ui_state.theme.dark_mode);
        assert_eq!(ui_state.theme.accent, AccentColor::Teal);
        assert_eq!(ui_state.status_bar_color, "#0d9488");

        let saved = Settings::load_from_path(&dir.path().join("settings.toml")).unwrap();
        assert_eq!(saved.theme, ui_state.theme);
    }

    #[tokio::test]
    async fn favorites_follow_the_selection() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Arc::new(StaticCatalog::new(vec![lesson("ihram"), lesson("tawaf")]));
        let controller = controller(&dir, catalog, EndlessBackend::default());
        controller.load_catalog().await;

        controller.model.lock().await.move_selection_down().await;
        controller.toggle_selected_favorite().await;

        let model = controller.model.lock().await;
        model.set_active_tab(Tab::Favorites).await;
        let selected = model.get_selected_lesson().await.unwrap();
        assert_eq!(selected.id.as_str(), "tawaf");
    }
}
