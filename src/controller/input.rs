//! Key event handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::model::Tab;
use super::AppController;

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        // Ignore release and repeat events
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        let model = self.model.lock().await;

        // Handle error message first (blocks all other interactions)
        if model.has_error().await {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                model.clear_error().await;
            }
            return Ok(());
        }

        // Handle help popup
        if model.is_help_popup_open().await {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('H')) {
                model.hide_help_popup().await;
            }
            return Ok(());
        }

        let tab = model.active_tab().await;

        match key.code {
            // Quit
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                model.set_should_quit(true).await;
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                model.set_should_quit(true).await;
            }
            // Tab navigation
            KeyCode::Char(digit @ '1'..='4') => {
                if let Some(tab) = Tab::from_digit(digit) {
                    model.set_active_tab(tab).await;
                }
            }
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    model.prev_tab().await;
                } else {
                    model.next_tab().await;
                }
            }
            KeyCode::BackTab => {
                model.prev_tab().await;
            }
            // List navigation
            KeyCode::Up | KeyCode::Char('k') => {
                model.move_selection_up().await;
            }
            KeyCode::Down | KeyCode::Char('j') => {
                model.move_selection_down().await;
            }
            // Enter acts on whatever the active screen shows
            KeyCode::Enter => {
                drop(model);
                match tab {
                    Tab::Home | Tab::Favorites => self.play_selected().await,
                    Tab::Settings => self.activate_setting().await,
                    Tab::About => {}
                }
            }
            // Playback controls (the model lock is released before the session is touched)
            KeyCode::Char(' ') => {
                drop(model);
                self.toggle_playback().await;
            }
            KeyCode::Right => {
                drop(model);
                self.skip_forward().await;
            }
            KeyCode::Left => {
                drop(model);
                self.skip_back().await;
            }
            KeyCode::Home => {
                drop(model);
                self.restart_lesson().await;
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                drop(model);
                self.stop_playback().await;
            }
            // Library
            KeyCode::Char('f') | KeyCode::Char('F') => {
                drop(model);
                // Settings and About have no lesson selected
                if tab.lists_lessons() {
                    self.toggle_selected_favorite().await;
                }
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                drop(model);
                self.reload_catalog().await;
            }
            // Theme
            KeyCode::Char('d') | KeyCode::Char('D') => {
                drop(model);
                self.toggle_dark_mode().await;
            }
            KeyCode::Char('a') | KeyCode::Char('A') => {
                drop(model);
                self.cycle_accent().await;
            }
            // Help
            KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => {
                model.show_help_popup().await;
            }
            _ => {}
        }

        Ok(())
    }
}
