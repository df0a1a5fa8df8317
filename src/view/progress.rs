//! Transport bar rendering

use ratatui::{
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Block, Borders, Gauge},
    Frame,
};

use crate::model::{PlaybackInfo, UiState};
use crate::session::PlaybackStatus;
use super::utils::format_duration;

pub fn render_progress_bar(frame: &mut Frame, area: Rect, playback: &PlaybackInfo, ui_state: &UiState) {
    let theme = ui_state.theme;

    // Title line depends on the session status
    let status_text = match playback.status {
        PlaybackStatus::Idle => " Nothing playing".to_string(),
        PlaybackStatus::Loading => format!(" … {} (loading)", playback.title()),
        PlaybackStatus::Playing => format!(" ▶ {}", playback.title()),
        PlaybackStatus::Paused => format!(" ⏸ {}", playback.title()),
        PlaybackStatus::Ended => format!(" ■ {} (finished)", playback.title()),
        PlaybackStatus::Failed => format!(" ✗ {} (unavailable)", playback.title()),
    };

    let time_str = format!(
        "{} / {}",
        format_duration(Some(playback.position)),
        format_duration(playback.duration)
    );

    let skip = ui_state.skip_increment.as_secs();
    let controls_info = format!(" Space play/pause | ←/→ {}s | s stop ", skip);

    // Red gauge while the current lesson is unavailable
    let gauge_color = if playback.status == PlaybackStatus::Failed {
        ratatui::style::Color::Red
    } else {
        theme.accent_color()
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.muted_style())
                .title(format!("{} ", status_text))
                .title_style(Style::default().fg(theme.text()))
                .title_bottom(Line::from(controls_info).right_aligned()),
        )
        .gauge_style(Style::default().fg(gauge_color).bg(theme.background()))
        .ratio(playback.ratio())
        .label(time_str);

    frame.render_widget(gauge, area);
}
