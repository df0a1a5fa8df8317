//! Core type definitions for the application

use std::time::{Duration, Instant};

use crate::theme::{Theme, accent_hex};

/// Tabs of the bottom navigation bar
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Home,
    Favorites,
    Settings,
    About,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Home, Tab::Favorites, Tab::Settings, Tab::About];

    pub fn next(self) -> Self {
        match self {
            Tab::Home => Tab::Favorites,
            Tab::Favorites => Tab::Settings,
            Tab::Settings => Tab::About,
            Tab::About => Tab::Home,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Tab::Home => Tab::About,
            Tab::Favorites => Tab::Home,
            Tab::Settings => Tab::Favorites,
            Tab::About => Tab::Settings,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tab::Home => "Home",
            Tab::Favorites => "Favorites",
            Tab::Settings => "Settings",
            Tab::About => "About",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::Home => 0,
            Tab::Favorites => 1,
            Tab::Settings => 2,
            Tab::About => 3,
        }
    }

    /// Tab for a number key (`1` is Home).
    pub fn from_digit(digit: char) -> Option<Self> {
        let n = digit.to_digit(10)? as usize;
        Self::ALL.get(n.checked_sub(1)?).copied()
    }

    /// Whether the tab shows a playable lesson list.
    pub fn lists_lessons(self) -> bool {
        matches!(self, Tab::Home | Tab::Favorites)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NavigationState {
    pub active_tab: Tab,
}

/// Rows of the settings screen
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsRow {
    DarkMode,
    Accent,
    SkipIncrement,
}

impl SettingsRow {
    pub const ALL: [SettingsRow; 3] = [
        SettingsRow::DarkMode,
        SettingsRow::Accent,
        SettingsRow::SkipIncrement,
    ];
}

/// UI state for the application
#[derive(Clone, Debug)]
pub struct UiState {
    pub navigation: NavigationState,
    pub theme: Theme,
    /// Accent hex mirrored into the top status bar.
    pub status_bar_color: &'static str,
    pub skip_increment: Duration,
    pub home_selected: usize,
    pub favorites_selected: usize,
    pub settings_selected: usize,
    pub error_message: Option<String>,
    pub error_timestamp: Option<Instant>,
    pub show_help_popup: bool,
}

impl UiState {
    pub fn new(theme: Theme, skip_increment: Duration) -> Self {
        Self {
            navigation: NavigationState::default(),
            theme,
            status_bar_color: accent_hex(theme.accent),
            skip_increment,
            home_selected: 0,
            favorites_selected: 0,
            settings_selected: 0,
            error_message: None,
            error_timestamp: None,
            show_help_popup: false,
        }
    }

    pub fn active_tab(&self) -> Tab {
        self.navigation.active_tab
    }

    /// Selected row of the active tab.
    pub fn selected_index(&self) -> usize {
        match self.active_tab() {
            Tab::Home => self.home_selected,
            Tab::Favorites => self.favorites_selected,
            Tab::Settings => self.settings_selected,
            Tab::About => 0,
        }
    }

    pub(crate) fn selected_index_mut(&mut self) -> Option<&mut usize> {
        match self.active_tab() {
            Tab::Home => Some(&mut self.home_selected),
            Tab::Favorites => Some(&mut self.favorites_selected),
            Tab::Settings => Some(&mut self.settings_selected),
            Tab::About => None,
        }
    }

    pub fn selected_setting(&self) -> SettingsRow {
        SettingsRow::ALL
            .get(self.settings_selected)
            .copied()
            .unwrap_or(SettingsRow::DarkMode)
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new(Theme::default(), Duration::from_secs(crate::config::DEFAULT_SKIP_SECONDS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tabs_cycle_both_ways() {
        for tab in Tab::ALL {
            assert_eq!(tab.next().prev(), tab);
        }
        assert_eq!(Tab::About.next(), Tab::Home);
        assert_eq!(Tab::Home.prev(), Tab::About);
    }

    #[test]
    fn number_keys_pick_tabs() {
        assert_eq!(Tab::from_digit('1'), Some(Tab::Home));
        assert_eq!(Tab::from_digit('4'), Some(Tab::About));
        assert_eq!(Tab::from_digit('0'), None);
        assert_eq!(Tab::from_digit('5'), None);
        assert_eq!(Tab::from_digit('x'), None);
    }

    #[test]
    fn status_bar_follows_initial_accent() {
        let theme = Theme {
            dark_mode: false,
            accent: crate::theme::AccentColor::Indigo,
        };
        let state = UiState::new(theme, Duration::from_secs(10));
        assert_eq!(state.status_bar_color, "#4f46e5");
        assert_eq!(state.active_tab(), Tab::Home);
    }
}
