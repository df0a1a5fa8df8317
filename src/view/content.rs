//! Main content area rendering (lesson lists, settings, about)

use std::sync::Arc;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, ListItem, Padding, Paragraph, Wrap},
    Frame,
};

use crate::catalog::Lesson;
use crate::model::{CatalogState, ContentState, PlaybackInfo, SettingsRow, Tab, UiState};
use crate::session::PlaybackStatus;
use crate::theme::{accent_class, accent_text_class};
use super::layout::APP_TITLE;
use super::utils::{calculate_num_width, render_scrollable_list, truncate_string};

pub fn render_main_content(
    frame: &mut Frame,
    area: Rect,
    ui_state: &UiState,
    content_state: &ContentState,
    playback: &PlaybackInfo,
) {
    match ui_state.active_tab() {
        Tab::Home => render_lesson_tab(frame, area, Tab::Home, ui_state, content_state, playback),
        Tab::Favorites => {
            render_lesson_tab(frame, area, Tab::Favorites, ui_state, content_state, playback)
        }
        Tab::Settings => render_settings(frame, area, ui_state),
        Tab::About => render_about(frame, area, ui_state),
    }
}

fn content_block(ui_state: &UiState, title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title))
        .title_style(ui_state.theme.accent_style().add_modifier(Modifier::BOLD))
        .padding(Padding::horizontal(1))
        .border_style(ui_state.theme.muted_style())
}

fn render_message(frame: &mut Frame, area: Rect, ui_state: &UiState, title: &str, message: String, style: Style) {
    let paragraph = Paragraph::new(message)
        .style(style)
        .wrap(Wrap { trim: false })
        .block(content_block(ui_state, title));
    frame.render_widget(paragraph, area);
}

fn render_lesson_tab(
    frame: &mut Frame,
    area: Rect,
    tab: Tab,
    ui_state: &UiState,
    content_state: &ContentState,
    playback: &PlaybackInfo,
) {
    let title = match tab {
        Tab::Favorites => "Favorite lessons",
        _ => "Lessons",
    };
    let muted = ui_state.theme.muted_style();

    // The catalog state decides whether there is a list to draw at all
    match &content_state.catalog {
        CatalogState::Loading => {
            render_message(
                frame,
                area,
                ui_state,
                title,
                "Loading lessons...".to_string(),
                Style::default().fg(Color::Yellow),
            );
            return;
        }
        CatalogState::Failed(reason) => {
            render_message(
                frame,
                area,
                ui_state,
                title,
                format!("No lessons available.\n\n{}\n\nPress r to retry.", reason),
                muted,
            );
            return;
        }
        CatalogState::Loaded(_) => {}
    }

    // Loaded, but nothing to show on this tab
    let lessons = content_state.lessons_for(tab);
    if lessons.is_empty() {
        let message = match tab {
            Tab::Favorites => "No favorites yet.\n\nPress f on a lesson to add it here.",
            _ => "No lessons available.\n\nPress r to reload the catalog.",
        };
        render_message(frame, area, ui_state, title, message.to_string(), muted);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Lesson cards
        ])
        .split(area);

    let header = Paragraph::new(format!(
        "{} lessons | Enter: Play | f: Favorite | r: Reload",
        lessons.len()
    ))
    .style(ui_state.theme.accent_style())
    .block(content_block(ui_state, title));
    frame.render_widget(header, chunks[0]);

    // Account for borders and padding
    let content_width = chunks[1].width.saturating_sub(4) as usize;
    let selected = ui_state.selected_index();
    let items = lesson_items(&lessons, selected, ui_state, content_state, playback, content_width);
    let block = Block::default()
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1))
        .border_style(muted);

    render_scrollable_list(frame, chunks[1], items, selected, block);
}

/// Transport tag shown on the current lesson's card.
fn status_tag(status: PlaybackStatus) -> &'static str {
    match status {
        PlaybackStatus::Idle => "",
        PlaybackStatus::Loading => "loading",
        PlaybackStatus::Playing => "playing",
        PlaybackStatus::Paused => "paused",
        PlaybackStatus::Ended => "finished",
        PlaybackStatus::Failed => "failed, Enter to retry",
    }
}

fn lesson_items(
    lessons: &[Arc<Lesson>],
    selected_index: usize,
    ui_state: &UiState,
    content_state: &ContentState,
    playback: &PlaybackInfo,
    content_width: usize,
) -> Vec<ListItem<'static>> {
    let theme = ui_state.theme;
    let num_width = calculate_num_width(lessons.len());
    let duration_width = 8;
    let tag_width = 24;
    // marker, number, star, tag and duration columns with their separators
    let fixed_width = 1 + num_width + 3 + 2 + 3 + 3 + tag_width + 3 + duration_width;
    let title_width = content_width.saturating_sub(fixed_width).max(10);

    lessons
        .iter()
        .enumerate()
        .map(|(i, lesson)| {
            let is_current = playback.is_current(&lesson.id);
            let failed = is_current && playback.status == PlaybackStatus::Failed;

            // Selection wins over the playback highlight
            let style = if i == selected_index {
                theme.selected_style()
            } else if failed {
                Style::default().fg(Color::Red)
            } else if is_current {
                theme.accent_style()
            } else {
                Style::default().fg(theme.text())
            };

            let marker = if is_current && playback.is_playing() { "▶" } else { " " };
            let favorite = if content_state.is_favorite(&lesson.id) { "★ " } else { "  " };
            let tag = if is_current { status_tag(playback.status) } else { "" };

            ListItem::new(format!(
                "{}{:<num_width$}   {}   {}   {:<tag_width$}   {:>duration_width$}",
                marker,
                i + 1,
                favorite,
                truncate_string(&lesson.title, title_width),
                tag,
                lesson.duration.label(),
            ))
            .style(style)
        })
        .collect()
}

fn render_settings(frame: &mut Frame, area: Rect, ui_state: &UiState) {
    let theme = ui_state.theme;
    let items: Vec<ListItem> = SettingsRow::ALL
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let (label, value) = match row {
                SettingsRow::DarkMode => (
                    "Dark mode",
                    if theme.dark_mode { "on" } else { "off" }.to_string(),
                ),
                SettingsRow::Accent => (
                    "Accent color",
                    format!(
                        "{} ({} / {})",
                        theme.accent.name(),
                        accent_class(theme.accent),
                        accent_text_class(theme.accent)
                    ),
                ),
                SettingsRow::SkipIncrement => (
                    "Skip increment",
                    format!("{} s", ui_state.skip_increment.as_secs()),
                ),
            };
            let style = if i == ui_state.settings_selected {
                theme.selected_style()
            } else {
                Style::default().fg(theme.text())
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<18}", label), style),
                Span::styled(value, style),
            ]))
        })
        .collect();

    // Key hints along the bottom border
    let block = content_block(ui_state, "Settings")
        .title_bottom(Line::from(" Enter: change | d: dark mode | a: accent ").right_aligned());
    render_scrollable_list(frame, area, items, ui_state.settings_selected, block);
}

fn render_about(frame: &mut Frame, area: Rect, ui_state: &UiState) {
    let theme = ui_state.theme;
    let lines = vec![
        Line::from(Span::styled(
            APP_TITLE,
            theme.accent_style().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))),
        Line::from(""),
        Line::from("Short audio lessons for the Umrah journey."),
        Line::from(""),
        Line::from(Span::styled("Press h for the list of keys.", theme.muted_style())),
    ];

    let about = Paragraph::new(lines)
        .style(Style::default().fg(theme.text()))
        .block(content_block(ui_state, "About"));
    frame.render_widget(about, area);
}
