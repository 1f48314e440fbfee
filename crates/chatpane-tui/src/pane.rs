//! Chat pane widget.
//!
//! Combines the header, the transcript (scrollable history), and the input
//! box at the bottom.
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Conversation with HelpBot            │
//! ├──────────────────────────────────────┤
//! │ ● HelpBot  09:12                     │
//! │   Hi, how can I help?                │
//! │                                      │
//! │                      what's pricing? │
//! ├──────────────────────────────────────┤
//! │ > Write your message here            │
//! └──────────────────────────────────────┘
//! ```

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    symbols::line,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, StatefulWidget, Widget},
};

use chatpane_core::{ChatConfig, ConversationState, ScrollHandle};

use crate::input::{InputBox, InputState};
use crate::registry::{CustomComponents, WidgetRegistry};
use crate::theme::{StyleOverrides, Theme};
use crate::transcript::{TranscriptState, TranscriptWidget};

/// Height of the header area (in lines).
const HEADER_HEIGHT: u16 = 1;

/// Height of the input area (in lines).
const INPUT_HEIGHT: u16 = 1;

/// Height of each divider line.
const DIVIDER_HEIGHT: u16 = 1;

/// Composite chat pane: header, transcript, input. Stateful: rendering
/// writes the resolved transcript scroll offset back.
pub struct ChatPane<'a, A, R> {
    conversation: &'a ConversationState,
    input: &'a InputState,
    components: &'a CustomComponents<A>,
    registry: &'a R,
    action_provider: &'a A,
    scroll: &'a ScrollHandle,
    config: &'a ChatConfig,
    theme: &'a Theme,
    styles: StyleOverrides,
    focused: bool,
}

impl<'a, A, R: WidgetRegistry> ChatPane<'a, A, R> {
    /// Create a chat pane. All collaborators are passed explicitly.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        conversation: &'a ConversationState,
        input: &'a InputState,
        components: &'a CustomComponents<A>,
        registry: &'a R,
        action_provider: &'a A,
        scroll: &'a ScrollHandle,
        config: &'a ChatConfig,
        theme: &'a Theme,
    ) -> Self {
        Self {
            conversation,
            input,
            components,
            registry,
            action_provider,
            scroll,
            config,
            theme,
            styles: StyleOverrides::default(),
            focused: true,
        }
    }

    /// Apply host color overrides.
    #[must_use]
    pub fn styles(mut self, styles: StyleOverrides) -> Self {
        self.styles = styles;
        self
    }

    /// Set whether this pane is focused.
    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Resolve the header line: custom renderer, then text override, then
    /// the default interpolating the bot name.
    fn header_line(&self) -> Line<'static> {
        if let Some(header) = &self.components.header {
            return header(self.action_provider);
        }
        Line::from(Span::styled(
            self.config.header(),
            Style::default().fg(self.theme.text),
        ))
    }

    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.header_line())
            .style(Style::default().bg(self.theme.surface))
            .render(area, buf);
    }

    fn render_divider(&self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 {
            return;
        }
        let divider = line::HORIZONTAL.repeat(area.width as usize);
        Paragraph::new(Line::from(Span::styled(
            divider,
            Style::default().fg(self.theme.border),
        )))
        .render(area, buf);
    }

    fn render_input(&self, area: Rect, buf: &mut Buffer) {
        InputBox::new(self.input)
            .placeholder(self.config.input_placeholder())
            .colors(
                self.styles.accent_color(self.theme),
                self.theme.text,
                self.theme.muted,
            )
            .focused(self.focused)
            .render(area, buf);
    }
}

impl<A, R: WidgetRegistry> StatefulWidget for ChatPane<'_, A, R> {
    type State = TranscriptState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut TranscriptState) {
        let border_style = if self.focused {
            Style::default().fg(self.theme.border_focused)
        } else {
            Style::default().fg(self.theme.border)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Style::default().bg(self.theme.base));

        let inner = block.inner(area);
        block.render(area, buf);

        let chrome = HEADER_HEIGHT + 2 * DIVIDER_HEIGHT + INPUT_HEIGHT;
        if inner.height < chrome + 1 {
            // Not enough space - just show the input
            self.render_input(inner, buf);
            return;
        }

        let transcript_height = inner.height - chrome;
        let header_area = Rect::new(inner.x, inner.y, inner.width, HEADER_HEIGHT);
        let top_divider_area = Rect::new(
            inner.x,
            inner.y + HEADER_HEIGHT,
            inner.width,
            DIVIDER_HEIGHT,
        );
        let transcript_area = Rect::new(
            inner.x,
            inner.y + HEADER_HEIGHT + DIVIDER_HEIGHT,
            inner.width,
            transcript_height,
        );
        let bottom_divider_area = Rect::new(
            inner.x,
            transcript_area.y + transcript_height,
            inner.width,
            DIVIDER_HEIGHT,
        );
        let input_area = Rect::new(
            inner.x,
            bottom_divider_area.y + DIVIDER_HEIGHT,
            inner.width,
            INPUT_HEIGHT,
        );

        self.render_header(header_area, buf);
        self.render_divider(top_divider_area, buf);

        TranscriptWidget::new(
            self.conversation,
            self.components,
            self.registry,
            self.action_provider,
            self.scroll,
            self.config,
            self.theme,
        )
        .styles(self.styles)
        .render(transcript_area, buf, state);

        self.render_divider(bottom_divider_area, buf);
        self.render_input(input_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::NoWidgets;
    use chatpane_core::Message;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    struct Harness {
        conversation: ConversationState,
        transcript: TranscriptState,
        input: InputState,
        components: CustomComponents<()>,
        scroll: ScrollHandle,
        config: ChatConfig,
        theme: Theme,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                conversation: ConversationState::new(),
                transcript: TranscriptState::new(),
                input: InputState::new(),
                components: CustomComponents::new(),
                scroll: ScrollHandle::new(),
                config: ChatConfig::new("HelpBot"),
                theme: Theme::default(),
            }
        }

        fn render(&mut self, width: u16, height: u16) -> String {
            let backend = TestBackend::new(width, height);
            let mut terminal = Terminal::new(backend).unwrap();
            terminal
                .draw(|frame| {
                    let pane = ChatPane::new(
                        &self.conversation,
                        &self.input,
                        &self.components,
                        &NoWidgets,
                        &(),
                        &self.scroll,
                        &self.config,
                        &self.theme,
                    );
                    frame.render_stateful_widget(pane, frame.area(), &mut self.transcript);
                })
                .unwrap();
            terminal
                .backend()
                .buffer()
                .content()
                .iter()
                .map(ratatui::buffer::Cell::symbol)
                .collect()
        }
    }

    #[test]
    fn test_default_header_interpolates_bot_name() {
        let mut harness = Harness::new();
        let content = harness.render(50, 12);
        assert!(content.contains("Conversation with HelpBot"));
    }

    #[test]
    fn test_header_text_override() {
        let mut harness = Harness::new();
        harness.config.header_text = Some("Support desk".into());
        let content = harness.render(50, 12);
        assert!(content.contains("Support desk"));
        assert!(!content.contains("Conversation with"));
    }

    #[test]
    fn test_custom_header_renderer_wins_over_override() {
        let mut harness = Harness::new();
        harness.config.header_text = Some("Support desk".into());
        harness.components =
            CustomComponents::new().with_header(|_action: &()| Line::from("All systems nominal"));
        let content = harness.render(50, 12);
        assert!(content.contains("All systems nominal"));
        assert!(!content.contains("Support desk"));
    }

    #[test]
    fn test_pane_shows_messages_and_placeholder() {
        let mut harness = Harness::new();
        harness.conversation.push(Message::bot("Hi, how can I help?"));
        let content = harness.render(50, 12);
        assert!(content.contains("Hi, how can I help?"));
        assert!(content.contains("Write your message here"));
    }

    #[test]
    fn test_placeholder_override() {
        let mut harness = Harness::new();
        harness.config.placeholder = Some("Ask away...".into());
        let content = harness.render(50, 12);
        assert!(content.contains("Ask away..."));
    }

    #[test]
    fn test_minimum_size_does_not_panic() {
        let mut harness = Harness::new();
        harness.conversation.push(Message::bot("hello"));
        let content = harness.render(20, 4);
        // Degrades to the input box only
        assert!(content.contains('>'));
    }
}
