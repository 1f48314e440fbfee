//! Single-line text input for the chat pane.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

/// State for the input box: the transient input value plus a cursor.
///
/// Created empty, mutated per keystroke, and reset only after a valid
/// submission (the caller clears it on [`chatpane_core::SubmitOutcome::Submitted`]).
#[derive(Debug, Clone, Default)]
pub struct InputState {
    content: String,
    /// Cursor position as a character index.
    cursor: usize,
}

impl InputState {
    /// Create a new empty input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Get the cursor position (character index).
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Check if the content is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Clear content and cursor.
    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// Take the content, leaving the input empty.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.content)
    }

    /// Insert a character at the cursor position.
    pub fn insert(&mut self, ch: char) {
        let at = self.byte_index(self.cursor);
        self.content.insert(at, ch);
        self.cursor += 1;
    }

    /// Insert a string at the cursor position.
    pub fn insert_str(&mut self, s: &str) {
        let at = self.byte_index(self.cursor);
        self.content.insert_str(at, s);
        self.cursor += s.chars().count();
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index(self.cursor);
            self.content.remove(at);
        }
    }

    /// Delete the character at the cursor.
    pub fn delete(&mut self) {
        if self.cursor < self.content.chars().count() {
            let at = self.byte_index(self.cursor);
            self.content.remove(at);
        }
    }

    /// Move cursor left.
    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move cursor right.
    pub fn move_right(&mut self) {
        if self.cursor < self.content.chars().count() {
            self.cursor += 1;
        }
    }

    /// Move cursor to start.
    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    /// Move cursor to end.
    pub fn move_end(&mut self) {
        self.cursor = self.content.chars().count();
    }

    /// Byte offset for a character index.
    fn byte_index(&self, char_index: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_index)
            .map_or(self.content.len(), |(i, _)| i)
    }
}

/// Input box widget: prompt, content with inline cursor, placeholder when
/// empty.
pub struct InputBox<'a> {
    state: &'a InputState,
    placeholder: &'a str,
    accent: Color,
    text: Color,
    muted: Color,
    focused: bool,
}

impl<'a> InputBox<'a> {
    /// Create an input box over the given state.
    pub fn new(state: &'a InputState) -> Self {
        Self {
            state,
            placeholder: "",
            accent: Color::Reset,
            text: Color::Reset,
            muted: Color::DarkGray,
            focused: true,
        }
    }

    /// Set the placeholder shown while the input is empty.
    #[must_use]
    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Set prompt, text, and placeholder colors.
    #[must_use]
    pub fn colors(mut self, accent: Color, text: Color, muted: Color) -> Self {
        self.accent = accent;
        self.text = text;
        self.muted = muted;
        self
    }

    /// Set whether the input is focused (shows the cursor).
    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

const PROMPT: &str = "> ";

impl Widget for InputBox<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 || area.width < 1 {
            return;
        }

        let mut spans = vec![Span::styled(PROMPT, Style::default().fg(self.accent))];

        if self.state.is_empty() {
            if self.focused {
                spans.push(Span::styled("_", Style::default().fg(self.text)));
            }
            spans.push(Span::styled(
                self.placeholder.to_string(),
                Style::default().fg(self.muted),
            ));
            Paragraph::new(Line::from(spans)).render(area, buf);
            return;
        }

        let mut shown = String::new();
        let mut cursor_drawn = false;
        for (i, ch) in self.state.content().chars().enumerate() {
            if self.focused && i == self.state.cursor() && !cursor_drawn {
                shown.push('|');
                cursor_drawn = true;
            }
            shown.push(ch);
        }
        if self.focused && !cursor_drawn {
            shown.push('_');
        }

        // Keep the tail visible when the content outgrows the box
        let budget = (area.width as usize).saturating_sub(PROMPT.width());
        while shown.width() > budget {
            shown.remove(0);
        }

        spans.push(Span::styled(shown, Style::default().fg(self.text)));
        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
