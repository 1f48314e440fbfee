//! Catppuccin color palette and host style overrides for the chat pane.

use ratatui::style::Color;

/// Theme color palette.
#[derive(Debug, Clone)]
pub struct Theme {
    // Backgrounds
    pub base: Color,
    pub surface: Color,

    // Foregrounds
    pub text: Color,
    pub subtext: Color,
    pub muted: Color,

    // Accents
    pub primary: Color,
    pub accent: Color,

    // Message attribution
    pub bot: Color,
    pub user: Color,

    // Borders
    pub border: Color,
    pub border_focused: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::mocha()
    }
}

impl Theme {
    /// Catppuccin Mocha theme (default dark theme).
    pub fn mocha() -> Self {
        Self {
            base: Color::Rgb(30, 30, 46),       // #1e1e2e
            surface: Color::Rgb(49, 50, 68),    // #313244
            text: Color::Rgb(205, 214, 244),    // #cdd6f4
            subtext: Color::Rgb(166, 173, 200), // #a6adc8
            muted: Color::Rgb(108, 112, 134),   // #6c7086
            primary: Color::Rgb(180, 190, 254), // #b4befe (lavender)
            accent: Color::Rgb(148, 226, 213),  // #94e2d5 (teal)
            bot: Color::Rgb(250, 179, 135),     // #fab387 (peach)
            user: Color::Rgb(137, 180, 250),    // #89b4fa (blue)
            border: Color::Rgb(69, 71, 90),     // #45475a
            border_focused: Color::Rgb(180, 190, 254), // #b4befe (lavender)
        }
    }

    /// Catppuccin Latte theme (light theme).
    pub fn latte() -> Self {
        Self {
            base: Color::Rgb(239, 241, 245),    // #eff1f5
            surface: Color::Rgb(230, 233, 239), // #e6e9ef
            text: Color::Rgb(76, 79, 105),      // #4c4f69
            subtext: Color::Rgb(92, 95, 119),   // #5c5f77
            muted: Color::Rgb(140, 143, 161),   // #8c8fa1
            primary: Color::Rgb(114, 135, 253), // #7287fd (lavender)
            accent: Color::Rgb(23, 146, 153),   // #179299 (teal)
            bot: Color::Rgb(254, 100, 11),      // #fe640b (peach)
            user: Color::Rgb(30, 102, 245),     // #1e66f5 (blue)
            border: Color::Rgb(188, 192, 204),  // #bcc0cc
            border_focused: Color::Rgb(114, 135, 253), // #7287fd (lavender)
        }
    }
}

/// Per-host color overrides layered over the theme. Unset fields fall back
/// to the theme's defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct StyleOverrides {
    /// Color for bot message text.
    pub bot_message_box: Option<Color>,
    /// Color for user message text.
    pub user_message_box: Option<Color>,
    /// Accent color for the input prompt.
    pub accent: Option<Color>,
}

impl StyleOverrides {
    /// Effective bot message color.
    pub fn bot_color(&self, theme: &Theme) -> Color {
        self.bot_message_box.unwrap_or(theme.bot)
    }

    /// Effective user message color.
    pub fn user_color(&self, theme: &Theme) -> Color {
        self.user_message_box.unwrap_or(theme.user)
    }

    /// Effective input accent color.
    pub fn accent_color(&self, theme: &Theme) -> Color {
        self.accent.unwrap_or(theme.accent)
    }
}
