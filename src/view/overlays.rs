//! Overlay rendering (error notification, help popup)

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::model::UiState;
use super::utils::centered_rect;

pub fn render_error_notification(frame: &mut Frame, ui_state: &UiState) {
    if let Some(ref error_msg) = ui_state.error_message {
        let area = frame.area();

        // Keep a margin on narrow terminals
        let popup_width = 52.min(area.width.saturating_sub(4));
        // Account for borders and padding
        let inner_width = popup_width.saturating_sub(4).max(1) as usize;

        // Wrapped line count of the message
        let error_line_count = error_msg.chars().count().div_ceil(inner_width) as u16;
        let popup_area = centered_rect(area, popup_width, 2 + error_line_count.max(1));

        // Clear the area behind the popup first
        frame.render_widget(Clear, popup_area);

        let error_widget = Paragraph::new(error_msg.to_string())
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red))
                    .title(" Error (Esc to dismiss) ")
                    .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
                    .style(Style::default().bg(ui_state.theme.background())),
            );

        frame.render_widget(error_widget, popup_area);
    }
}

const KEYBINDINGS: &[(&str, &str)] = &[
    ("", "── Navigation ──"),
    ("1-4", "Home / Favorites / Settings / About"),
    ("Tab / Shift+Tab", "Next / previous tab"),
    ("↑ / ↓", "Move selection"),
    ("Enter", "Play lesson / change setting"),
    ("", ""),
    ("", "── Playback ──"),
    ("Space", "Play / Pause"),
    ("← / →", "Skip back / forward"),
    ("Home", "Restart lesson"),
    ("S", "Stop"),
    ("", ""),
    ("", "── Library ──"),
    ("F", "Add / remove favorite"),
    ("R", "Reload lessons"),
    ("D", "Toggle dark mode"),
    ("A", "Next accent color"),
    ("", ""),
    ("", "── General ──"),
    ("H", "Toggle this help"),
    ("Q", "Quit"),
];

pub fn render_help_popup(frame: &mut Frame, ui_state: &UiState) {
    let theme = ui_state.theme;
    // One row per binding plus borders
    let popup_area = centered_rect(frame.area(), 62, KEYBINDINGS.len() as u16 + 2);

    // Clear the area behind the popup first
    frame.render_widget(Clear, popup_area);

    let lines: Vec<Line> = KEYBINDINGS
        .iter()
        .map(|(key, desc)| {
            if key.is_empty() {
                // Section header or empty line
                Line::from(Span::styled(
                    format!("{:^56}", desc),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ))
            } else {
                // Right-aligned key, then its description
                Line::from(vec![
                    Span::styled(
                        format!("{:>18}", key),
                        theme.accent_style().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(desc.to_string(), Style::default().fg(theme.text())),
                ])
            }
        })
        .collect();

    let help_text = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.accent_style())
            .title(" Help (H or Esc to close) ")
            .title_style(theme.accent_style().add_modifier(Modifier::BOLD))
            .style(Style::default().bg(theme.background())),
    );

    frame.render_widget(help_text, popup_area);
}
