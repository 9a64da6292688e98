// Theme support for the TUI
//
// Two fixed palettes: "dark" uses the terminal's ANSI colors, "light" uses
// true color tuned for light backgrounds. Unknown names fall back to dark.

use ratatui::style::Color;
use ratatui::widgets::BorderType;

/// Color palette for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    // Base
    pub foreground: Color,
    pub background: Color,
    pub muted: Color,
    pub border: Color,
    pub border_type: BorderType,
    pub highlight: Color,
    pub selection: Color,
    pub selection_fg: Color,
    pub title: Color,
    pub status_bar: Color,

    // Semantic
    pub error: Color,
    pub warning: Color,
    pub success: Color,
    pub link: Color,

    // Rule severities
    pub essential: Color,
    pub recommended: Color,
    pub unranked: Color,

    // Panel identity colors (used when focused)
    pub panel_search: Color,
    pub panel_parts: Color,
    pub panel_datasheet: Color,
    pub panel_rules: Color,
    pub panel_pins: Color,
    pub panel_logs: Color,
}

impl Theme {
    /// Load theme by name
    pub fn by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Dark theme - uses terminal's ANSI palette
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            foreground: Color::White,
            background: Color::Reset,
            muted: Color::DarkGray,
            border: Color::Gray,
            border_type: BorderType::Rounded,
            highlight: Color::Yellow,
            selection: Color::Blue,
            selection_fg: Color::White,
            title: Color::Cyan,
            status_bar: Color::Green,
            error: Color::Red,
            warning: Color::Yellow,
            success: Color::Green,
            link: Color::LightBlue,
            essential: Color::Red,
            recommended: Color::Yellow,
            unranked: Color::Gray,
            panel_search: Color::Yellow,
            panel_parts: Color::Cyan,
            panel_datasheet: Color::LightBlue,
            panel_rules: Color::Magenta,
            panel_pins: Color::Green,
            panel_logs: Color::DarkGray,
        }
    }

    /// Light theme - true color for light terminal backgrounds
    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            foreground: Color::Rgb(0x24, 0x29, 0x2e),
            background: Color::Rgb(0xff, 0xff, 0xff),
            muted: Color::Rgb(0x6a, 0x73, 0x7d),
            border: Color::Rgb(0xd1, 0xd5, 0xda),
            border_type: BorderType::Plain,
            highlight: Color::Rgb(0xb0, 0x88, 0x00),
            selection: Color::Rgb(0x03, 0x66, 0xd6),
            selection_fg: Color::Rgb(0xff, 0xff, 0xff),
            title: Color::Rgb(0x03, 0x66, 0xd6),
            status_bar: Color::Rgb(0x22, 0x86, 0x3a),
            error: Color::Rgb(0xcb, 0x24, 0x31),
            warning: Color::Rgb(0xb0, 0x88, 0x00),
            success: Color::Rgb(0x22, 0x86, 0x3a),
            link: Color::Rgb(0x03, 0x66, 0xd6),
            essential: Color::Rgb(0xcb, 0x24, 0x31),
            recommended: Color::Rgb(0xb0, 0x88, 0x00),
            unranked: Color::Rgb(0x6a, 0x73, 0x7d),
            panel_search: Color::Rgb(0xb0, 0x88, 0x00),
            panel_parts: Color::Rgb(0x03, 0x66, 0xd6),
            panel_datasheet: Color::Rgb(0x03, 0x66, 0xd6),
            panel_rules: Color::Rgb(0x6f, 0x42, 0xc1),
            panel_pins: Color::Rgb(0x22, 0x86, 0x3a),
            panel_logs: Color::Rgb(0x6a, 0x73, 0x7d),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn by_name_falls_back_to_dark() {
        assert_eq!(Theme::by_name("light").name, "light");
        assert_eq!(Theme::by_name("LIGHT").name, "light");
        assert_eq!(Theme::by_name("dark").name, "dark");
        assert_eq!(Theme::by_name("solarized").name, "dark");
    }
}
