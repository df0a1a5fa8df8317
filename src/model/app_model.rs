//! Main application model with state management

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use anyhow::Result;

use crate::catalog::{Lesson, LessonId};
use crate::session::SessionSnapshot;
use crate::theme::{Theme, accent_hex};

use super::content::{CatalogState, ContentState};
use super::favorites::FavoritesStore;
use super::playback::{PlaybackInfo, PlaybackTiming};
use super::types::{SettingsRow, Tab, UiState};

const ERROR_DISPLAY_SECS: u64 = 5;

/// Main application model containing all state
pub struct AppModel {
    snapshot: Arc<Mutex<SessionSnapshot>>,
    playback_timing: Arc<Mutex<PlaybackTiming>>,
    pub ui_state: Arc<Mutex<UiState>>,
    pub content_state: Arc<Mutex<ContentState>>,
    favorites: FavoritesStore,
    pub should_quit: Arc<Mutex<bool>>,
}

impl AppModel {
    pub fn new(theme: Theme, skip_increment: Duration, favorites: FavoritesStore) -> Self {
        Self {
            snapshot: Arc::new(Mutex::new(SessionSnapshot::idle())),
            playback_timing: Arc::new(Mutex::new(PlaybackTiming::default())),
            ui_state: Arc::new(Mutex::new(UiState::new(theme, skip_increment))),
            content_state: Arc::new(Mutex::new(ContentState::default())),
            favorites,
            should_quit: Arc::new(Mutex::new(false)),
        }
    }

    // ========================================================================
    // Playback
    // ========================================================================

    pub async fn apply_snapshot(&self, snapshot: SessionSnapshot) {
        self.playback_timing.lock().await.update(&snapshot);
        *self.snapshot.lock().await = snapshot;
    }

    pub async fn get_playback_info(&self) -> PlaybackInfo {
        let snapshot = self.snapshot.lock().await;
        let timing = self.playback_timing.lock().await;
        PlaybackInfo::from_snapshot(&snapshot, &timing)
    }

    pub async fn should_quit(&self) -> bool {
        *self.should_quit.lock().await
    }

    pub async fn set_should_quit(&self, quit: bool) {
        *self.should_quit.lock().await = quit;
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    pub async fn get_ui_state(&self) -> UiState {
        self.ui_state.lock().await.clone()
    }

    pub async fn active_tab(&self) -> Tab {
        self.ui_state.lock().await.active_tab()
    }

    pub async fn set_active_tab(&self, tab: Tab) {
        let mut state = self.ui_state.lock().await;
        if state.navigation.active_tab != tab {
            tracing::debug!(tab = tab.label(), "Tab changed");
        }
        state.navigation.active_tab = tab;
    }

    pub async fn next_tab(&self) {
        let tab = self.active_tab().await.next();
        self.set_active_tab(tab).await;
    }

    pub async fn prev_tab(&self) {
        let tab = self.active_tab().await.prev();
        self.set_active_tab(tab).await;
    }

    /// Number of selectable rows on the active tab.
    async fn row_count(&self, tab: Tab) -> usize {
        match tab {
            Tab::Home | Tab::Favorites => self.content_state.lock().await.lessons_for(tab).len(),
            Tab::Settings => SettingsRow::ALL.len(),
            Tab::About => 0,
        }
    }

    pub async fn move_selection_up(&self) {
        let mut state = self.ui_state.lock().await;
        if let Some(selected) = state.selected_index_mut() {
            *selected = selected.saturating_sub(1);
        }
    }

    pub async fn move_selection_down(&self) {
        let tab = self.active_tab().await;
        let rows = self.row_count(tab).await;
        let mut state = self.ui_state.lock().await;
        if let Some(selected) = state.selected_index_mut() {
            if *selected + 1 < rows {
                *selected += 1;
            }
        }
    }

    /// Lesson under the cursor on Home or Favorites.
    pub async fn get_selected_lesson(&self) -> Option<Arc<Lesson>> {
        let state = self.ui_state.lock().await;
        let tab = state.active_tab();
        if !tab.lists_lessons() {
            return None;
        }
        let lessons = self.content_state.lock().await.lessons_for(tab);
        lessons.get(state.selected_index()).cloned()
    }

    pub async fn get_selected_setting(&self) -> SettingsRow {
        self.ui_state.lock().await.selected_setting()
    }

    // ========================================================================
    // Catalog & favorites
    // ========================================================================

    pub async fn get_content_state(&self) -> ContentState {
        self.content_state.lock().await.clone()
    }

    pub async fn set_catalog_loading(&self) {
        self.content_state.lock().await.catalog = CatalogState::Loading;
    }

    pub async fn set_catalog_loaded(&self, lessons: Vec<Arc<Lesson>>) {
        self.content_state.lock().await.catalog = CatalogState::Loaded(lessons);
        self.clamp_selections().await;
    }

    pub async fn set_catalog_failed(&self, message: String) {
        self.content_state.lock().await.catalog = CatalogState::Failed(message);
        self.clamp_selections().await;
    }

    pub async fn is_catalog_loading(&self) -> bool {
        matches!(self.content_state.lock().await.catalog, CatalogState::Loading)
    }

    pub async fn load_favorites(&self) -> Result<()> {
        self.favorites.load_from_disk().await?;
        self.content_state.lock().await.favorites = self.favorites.ids().await;
        Ok(())
    }

    /// Toggle and persist; returns whether the lesson is now a favorite.
    pub async fn toggle_favorite(&self, id: &LessonId) -> Result<bool> {
        let favorite = self.favorites.toggle(id).await;
        if let Err(e) = self.favorites.save_to_disk().await {
            // Not persisted, so the list on screen must not change either
            self.favorites.toggle(id).await;
            return Err(e);
        }
        self.content_state.lock().await.favorites = self.favorites.ids().await;
        self.clamp_selections().await;
        Ok(favorite)
    }

    async fn clamp_selections(&self) {
        let content = self.content_state.lock().await;
        let home = content.lessons_for(Tab::Home).len();
        let favorites = content.lessons_for(Tab::Favorites).len();
        drop(content);

        let mut state = self.ui_state.lock().await;
        state.home_selected = state.home_selected.min(home.saturating_sub(1));
        state.favorites_selected = state.favorites_selected.min(favorites.saturating_sub(1));
    }

    // ========================================================================
    // Theme
    // ========================================================================

    pub async fn get_theme(&self) -> Theme {
        self.ui_state.lock().await.theme
    }

    /// Apply a theme and push its accent into the status bar.
    pub async fn set_theme(&self, theme: Theme) {
        let mut state = self.ui_state.lock().await;
        state.theme = theme;
        state.status_bar_color = accent_hex(theme.accent);
        tracing::debug!(
            dark_mode = theme.dark_mode,
            accent = theme.accent.name(),
            status_bar = state.status_bar_color,
            "Theme applied"
        );
    }

    // ========================================================================
    // Errors & popups
    // ========================================================================

    pub async fn set_error(&self, message: String) {
        let mut state = self.ui_state.lock().await;
        state.error_message = Some(message);
        state.error_timestamp = Some(Instant::now());
    }

    pub async fn clear_error(&self) {
        let mut state = self.ui_state.lock().await;
        state.error_message = None;
        state.error_timestamp = None;
    }

    pub async fn has_error(&self) -> bool {
        self.ui_state.lock().await.error_message.is_some()
    }

    pub async fn auto_clear_old_errors(&self) {
        let mut state = self.ui_state.lock().await;
        if let Some(timestamp) = state.error_timestamp {
            if timestamp.elapsed().as_secs() > ERROR_DISPLAY_SECS {
                state.error_message = None;
                state.error_timestamp = None;
            }
        }
    }

    pub async fn show_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = true;
    }

    pub async fn hide_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = false;
    }

    pub async fn is_help_popup_open(&self) -> bool {
        self.ui_state.lock().await.show_help_popup
    }
}
