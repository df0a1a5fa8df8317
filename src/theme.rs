//! Theme context: dark mode, accent color and the tokens derived from them

use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccentColor {
    #[default]
    Emerald,
    Teal,
    Blue,
    Indigo,
    Rose,
    Amber,
}

impl AccentColor {
    pub const ALL: [AccentColor; 6] = [
        AccentColor::Emerald,
        AccentColor::Teal,
        AccentColor::Blue,
        AccentColor::Indigo,
        AccentColor::Rose,
        AccentColor::Amber,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AccentColor::Emerald => "emerald",
            AccentColor::Teal => "teal",
            AccentColor::Blue => "blue",
            AccentColor::Indigo => "indigo",
            AccentColor::Rose => "rose",
            AccentColor::Amber => "amber",
        }
    }

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }
}

/// Background style class for the accent.
pub fn accent_class(accent: AccentColor) -> String {
    format!("bg-{}-600", accent.name())
}

/// Text style class for the accent.
pub fn accent_text_class(accent: AccentColor) -> String {
    format!("text-{}-600", accent.name())
}

/// Hex color used to tint the status bar.
pub fn accent_hex(accent: AccentColor) -> &'static str {
    match accent {
        AccentColor::Emerald => "#059669",
        AccentColor::Teal => "#0d9488",
        AccentColor::Blue => "#2563eb",
        AccentColor::Indigo => "#4f46e5",
        AccentColor::Rose => "#e11d48",
        AccentColor::Amber => "#d97706",
    }
}

/// Parse `#rrggbb` into a terminal color.
pub fn hex_to_color(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub dark_mode: bool,
    pub accent: AccentColor,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            dark_mode: true,
            accent: AccentColor::default(),
        }
    }
}

impl Theme {
    pub fn accent_color(&self) -> Color {
        hex_to_color(accent_hex(self.accent)).unwrap_or(Color::Green)
    }

    pub fn background(&self) -> Color {
        if self.dark_mode { Color::Black } else { Color::Rgb(249, 250, 251) }
    }

    pub fn text(&self) -> Color {
        if self.dark_mode { Color::White } else { Color::Rgb(17, 24, 39) }
    }

    pub fn muted(&self) -> Color {
        if self.dark_mode { Color::DarkGray } else { Color::Gray }
    }

    pub fn base_style(&self) -> Style {
        Style::default().fg(self.text()).bg(self.background())
    }

    pub fn accent_style(&self) -> Style {
        Style::default().fg(self.accent_color())
    }

    pub fn selected_style(&self) -> Style {
        Style::default()
            .fg(self.accent_color())
            .add_modifier(Modifier::BOLD)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accent_derivations() {
        assert_eq!(accent_class(AccentColor::Emerald), "bg-emerald-600");
        assert_eq!(accent_text_class(AccentColor::Rose), "text-rose-600");
        assert_eq!(accent_hex(AccentColor::Blue), "#2563eb");
    }

    #[test]
    fn every_accent_hex_is_a_valid_color() {
        for accent in AccentColor::ALL {
            assert!(hex_to_color(accent_hex(accent)).is_some(), "{:?}", accent);
        }
        assert_eq!(hex_to_color("#0d9488"), Some(Color::Rgb(13, 148, 136)));
        assert_eq!(hex_to_color("0d9488"), None);
    }

    #[test]
    fn accent_cycle_wraps() {
        let mut accent = AccentColor::Emerald;
        for _ in 0..AccentColor::ALL.len() {
            accent = accent.next();
        }
        assert_eq!(accent, AccentColor::Emerald);
    }
}
