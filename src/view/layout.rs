//! Layout rendering (status bar, bottom tab bar)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Tabs},
    Frame,
};

use crate::model::{PlaybackInfo, Tab, UiState};
use crate::theme::hex_to_color;

pub const APP_TITLE: &str = "Umrah Guide";

/// Top bar tinted with the accent hex carried in the UI state.
pub fn render_status_bar(frame: &mut Frame, area: Rect, ui_state: &UiState, playback: &PlaybackInfo) {
    // Fall back to plain green if the hex does not parse
    let bar_color = hex_to_color(ui_state.status_bar_color).unwrap_or(Color::Green);
    let bar_style = Style::default().bg(bar_color).fg(Color::White);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(24)]) // title | playback status
        .split(area);

    let title = Paragraph::new(Line::from(vec![
        Span::styled(format!(" {} ", APP_TITLE), bar_style.add_modifier(Modifier::BOLD)),
        Span::styled(format!("· {}", ui_state.active_tab().label()), bar_style),
    ]))
    .style(bar_style);
    frame.render_widget(title, chunks[0]);

    let status = Paragraph::new(format!("{} ", playback.status))
        .style(bar_style)
        .right_aligned();
    frame.render_widget(status, chunks[1]);
}

/// Bottom navigation with the active tab in the accent color.
pub fn render_tab_bar(frame: &mut Frame, area: Rect, ui_state: &UiState) {
    let theme = ui_state.theme;
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| Line::from(format!("{} {}", i + 1, tab.label())))
        .collect();

    let tabs = Tabs::new(titles)
        .select(ui_state.active_tab().index())
        .style(theme.muted_style())
        .highlight_style(theme.selected_style().add_modifier(Modifier::UNDERLINED))
        .divider(" │ ")
        .block(
            Block::default()
                .borders(Borders::ALL)
                .padding(Padding::horizontal(1))
                .border_style(theme.muted_style()),
        );
    frame.render_widget(tabs, area);
}
