use ratatui::style::Color;

/// Color theme for the TUI.
#[derive(Debug, Clone)]
pub struct Theme {
    pub primary: Color,
    pub secondary: Color,
    pub background: Color,
    pub text: Color,
    pub highlight: Color,
    pub error: Color,
    pub success: Color,
    pub border: Color,
    pub selected_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Color::Cyan,
            secondary: Color::Blue,
            background: Color::Reset,
            text: Color::White,
            highlight: Color::Yellow,
            error: Color::Red,
            success: Color::Green,
            border: Color::Gray,
            selected_bg: Color::DarkGray,
        }
    }
}
