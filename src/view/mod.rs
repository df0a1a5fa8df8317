//! View module - UI rendering
//!
//! - `utils`: shared helpers (formatting, scrollable lists, popups)
//! - `layout`: status bar and bottom tab bar
//! - `content`: the active tab's screen
//! - `progress`: transport bar
//! - `overlays`: error and help popups

mod utils;
mod layout;
mod content;
mod progress;
mod overlays;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    widgets::Block,
    Frame,
};

use crate::model::{ContentState, PlaybackInfo, UiState};

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, playback: &PlaybackInfo, ui_state: &UiState, content_state: &ContentState) {
        frame.render_widget(Block::default().style(ui_state.theme.base_style()), frame.area());

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Status bar
                Constraint::Min(0),    // Active screen
                Constraint::Length(3), // Transport
                Constraint::Length(3), // Tab bar
            ])
            .split(frame.area());

        layout::render_status_bar(frame, chunks[0], ui_state, playback);
        content::render_main_content(frame, chunks[1], ui_state, content_state, playback);
        progress::render_progress_bar(frame, chunks[2], playback, ui_state);
        layout::render_tab_bar(frame, chunks[3], ui_state);

        if ui_state.error_message.is_some() {
            overlays::render_error_notification(frame, ui_state);
        }

        if ui_state.show_help_popup {
            overlays::render_help_popup(frame, ui_state);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use ratatui::{backend::TestBackend, Terminal};

    use super::*;
    use crate::catalog::{Lesson, LessonDuration, LessonId};
    use crate::model::{CatalogState, Tab};
    use crate::session::PlaybackStatus;

    fn lesson(id: &str, title: &str) -> Arc<Lesson> {
        Arc::new(Lesson {
            id: LessonId::from(id),
            title: title.to_string(),
            duration: LessonDuration::from_label("5:00"),
            audio: None,
        })
    }

    fn draw(playback: &PlaybackInfo, ui_state: &UiState, content: &ContentState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal
            .draw(|f| AppView::render(f, playback, ui_state, content))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn home_lists_lesson_titles_and_tabs() {
        let content = ContentState {
            catalog: CatalogState::Loaded(vec![
                lesson("ihram", "Entering Ihram"),
                lesson("tawaf", "Performing Tawaf"),
            ]),
            ..ContentState::default()
        };
        let text = draw(&PlaybackInfo::default(), &UiState::default(), &content);

        assert!(text.contains("Umrah Guide"));
        assert!(text.contains("Entering Ihram"));
        assert!(text.contains("Performing Tawaf"));
        assert!(text.contains("5:00"));
        for tab in Tab::ALL {
            assert!(text.contains(tab.label()), "missing tab {}", tab.label());
        }
        assert!(text.contains("Nothing playing"));
    }

    #[test]
    fn failed_catalog_shows_empty_message() {
        let content = ContentState {
            catalog: CatalogState::Failed("HTTP 503".into()),
            ..ContentState::default()
        };
        let text = draw(&PlaybackInfo::default(), &UiState::default(), &content);

        assert!(text.contains("No lessons available."));
        assert!(text.contains("Press r to retry."));
    }

    #[test]
    fn failed_lesson_offers_retry() {
        let tawaf = lesson("tawaf", "Performing Tawaf");
        let content = ContentState {
            catalog: CatalogState::Loaded(vec![tawaf.clone()]),
            ..ContentState::default()
        };
        let playback = PlaybackInfo {
            status: PlaybackStatus::Failed,
            lesson: Some(tawaf),
            ..PlaybackInfo::default()
        };
        let text = draw(&playback, &UiState::default(), &content);

        assert!(text.contains("failed, Enter to retry"));
        assert!(text.contains("(unavailable)"));
    }

    #[test]
    fn settings_screen_shows_theme() {
        let mut ui_state = UiState::default();
        ui_state.navigation.active_tab = Tab::Settings;
        ui_state.skip_increment = Duration::from_secs(15);
        let text = draw(&PlaybackInfo::default(), &ui_state, &ContentState::default());

        assert!(text.contains("Dark mode"));
        assert!(text.contains("emerald (bg-emerald-600 / text-emerald-600)"));
        assert!(text.contains("15 s"));
    }
}
