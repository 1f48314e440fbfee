//! Transcript widget: renders the message history.
//!
//! Each message classifies into bot, user, or custom treatment; anything
//! else is omitted. Bot bubbles carry the avatar rule and the loading gate
//! for attached widgets, user bubbles render right-aligned, custom kinds go
//! through host render functions.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span, Text},
    widgets::{Paragraph, StatefulWidget, Widget},
};
use unicode_width::UnicodeWidthStr;

use chatpane_core::{
    classify, shows_avatar, ChatConfig, ConversationState, Message, ScrollHandle, Variant,
};

use crate::registry::{CustomComponents, RenderContext, WidgetContext, WidgetRegistry};
use crate::theme::{StyleOverrides, Theme};
use crate::transcript::TranscriptState;

/// Left indent for message content under an avatar line.
const INDENT: &str = "  ";

/// Transcript pane widget. Stateful: rendering writes the resolved scroll
/// offset back into the [`TranscriptState`].
pub struct TranscriptWidget<'a, A, R> {
    conversation: &'a ConversationState,
    components: &'a CustomComponents<A>,
    registry: &'a R,
    action_provider: &'a A,
    scroll: &'a ScrollHandle,
    config: &'a ChatConfig,
    theme: &'a Theme,
    styles: StyleOverrides,
}

impl<'a, A, R: WidgetRegistry> TranscriptWidget<'a, A, R> {
    /// Create a transcript widget. All collaborators are passed explicitly;
    /// the widget holds no state of its own.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        conversation: &'a ConversationState,
        components: &'a CustomComponents<A>,
        registry: &'a R,
        action_provider: &'a A,
        scroll: &'a ScrollHandle,
        config: &'a ChatConfig,
        theme: &'a Theme,
    ) -> Self {
        Self {
            conversation,
            components,
            registry,
            action_provider,
            scroll,
            config,
            theme,
            styles: StyleOverrides::default(),
        }
    }

    /// Apply host color overrides.
    #[must_use]
    pub fn styles(mut self, styles: StyleOverrides) -> Self {
        self.styles = styles;
        self
    }

    fn render_context<'b>(&'b self, message: &'b Message) -> RenderContext<'b, A> {
        RenderContext {
            state: self.conversation,
            message,
            scroll: self.scroll,
            action_provider: self.action_provider,
        }
    }

    /// Resolve a named widget to its lines. Unknown names yield nothing.
    fn widget_lines(&self, name: &str) -> Vec<Line<'static>> {
        let ctx = WidgetContext {
            state: self.conversation,
            scroll: self.scroll,
        };
        match self.registry.get_widget(name, &ctx) {
            Some(text) => text.lines,
            None => {
                tracing::debug!(%name, "widget not resolved by registry");
                Vec::new()
            }
        }
    }

    fn bot_lines(&self, message: &Message, index: usize, width: usize) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        if shows_avatar(self.conversation.messages(), index) {
            lines.push(Line::from(vec![
                Span::styled("\u{25cf} ", Style::default().fg(self.styles.bot_color(self.theme))),
                Span::styled(
                    self.config.bot_name.clone(),
                    Style::default().fg(self.theme.subtext),
                ),
                Span::raw("  "),
                Span::styled(message.time_str(), Style::default().fg(self.theme.muted)),
            ]));
        }

        if message.loading {
            // Placeholder awaiting async completion
            lines.push(Line::from(vec![
                Span::raw(INDENT),
                Span::styled("...", Style::default().fg(self.theme.muted)),
            ]));
        } else if let Some(render) = &self.components.bot_message {
            lines.extend(render(&self.render_context(message)).lines);
        } else if let Some(text) = &message.text {
            for wrapped in textwrap::wrap(text, wrap_width(width)) {
                lines.push(Line::from(vec![
                    Span::raw(INDENT),
                    Span::styled(
                        wrapped.to_string(),
                        Style::default().fg(self.styles.bot_color(self.theme)),
                    ),
                ]));
            }
        }

        // Widgets stay hidden until the message finishes loading
        if !message.loading {
            if let Some(name) = &message.widget {
                lines.extend(self.widget_lines(name));
            }
        }

        lines
    }

    fn user_lines(&self, message: &Message, width: usize) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        if let Some(render) = &self.components.user_message {
            lines.extend(render(&self.render_context(message)).lines);
        } else if let Some(text) = &message.text {
            for wrapped in textwrap::wrap(text, wrap_width(width)) {
                let pad = width.saturating_sub(UnicodeWidthStr::width(wrapped.as_ref()) + 2);
                lines.push(Line::from(vec![
                    Span::raw(" ".repeat(pad)),
                    Span::styled(
                        wrapped.to_string(),
                        Style::default().fg(self.styles.user_color(self.theme)),
                    ),
                ]));
            }
        }

        if let Some(name) = &message.widget {
            lines.extend(self.widget_lines(name));
        }

        lines
    }

    fn custom_lines(&self, message: &Message) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        if let Some(render) = self.components.message(message.kind.tag()) {
            lines.extend(render(&self.render_context(message)).lines);
        }

        if let Some(name) = &message.widget {
            lines.extend(self.widget_lines(name));
        }

        lines
    }

    /// Build the full transcript as lines, in canonical display order.
    /// Messages matching no variant contribute nothing.
    fn build_lines(&self, width: usize) -> Vec<Line<'static>> {
        let mut lines: Vec<Line<'static>> = Vec::new();

        for (index, message) in self.conversation.messages().iter().enumerate() {
            let variant = classify(message, |tag| self.components.has_message(tag));
            let Some(variant) = variant else { continue };

            let message_lines = match variant {
                Variant::Bot => self.bot_lines(message, index, width),
                Variant::User => self.user_lines(message, width),
                Variant::Custom => self.custom_lines(message),
            };

            if message_lines.is_empty() {
                continue;
            }
            if !lines.is_empty() {
                lines.push(Line::default());
            }
            lines.extend(message_lines);
        }

        lines
    }
}

/// Wrap budget inside a viewport of the given width.
fn wrap_width(width: usize) -> usize {
    width.saturating_sub(4).max(1)
}

impl<A, R: WidgetRegistry> StatefulWidget for TranscriptWidget<'_, A, R> {
    type State = TranscriptState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut TranscriptState) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        if self.conversation.is_empty() {
            let empty = Line::from(Span::styled(
                "No messages yet",
                Style::default().fg(self.theme.muted),
            ));
            Paragraph::new(empty).render(
                Rect::new(area.x + 2, area.y + area.height / 2, area.width.saturating_sub(4), 1),
                buf,
            );
            return;
        }

        let lines = self.build_lines(area.width as usize);
        let offset = state.resolve(lines.len(), area.height as usize);
        let offset = u16::try_from(offset).unwrap_or(u16::MAX);

        Paragraph::new(Text::from(lines))
            .scroll((offset, 0))
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::NoWidgets;
    use crate::transcript::SCROLL_SPEED;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    struct OptionsRegistry;

    impl WidgetRegistry for OptionsRegistry {
        fn get_widget(&self, name: &str, _ctx: &WidgetContext<'_>) -> Option<Text<'static>> {
            (name == "options").then(|| Text::raw("[1] Pricing  [2] Docs"))
        }
    }

    fn render_to_string<A, R: WidgetRegistry>(
        widget: TranscriptWidget<'_, A, R>,
        transcript: &mut TranscriptState,
        width: u16,
        height: u16,
    ) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| frame.render_stateful_widget(widget, frame.area(), transcript))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    fn harness() -> (
        TranscriptState,
        CustomComponents<()>,
        ScrollHandle,
        ChatConfig,
        Theme,
    ) {
        (
            TranscriptState::new(),
            CustomComponents::new(),
            ScrollHandle::new(),
            ChatConfig::new("HelpBot"),
            Theme::default(),
        )
    }

    #[test]
    fn test_messages_render_in_order_and_unmatched_are_omitted() {
        let (mut transcript, mut components, scroll, config, theme) = harness();
        components.register_message("notice", |_| Text::raw("maintenance tonight"));

        let mut conversation = ConversationState::new();
        conversation.push(Message::user("first"));
        conversation.push(Message::bot("second"));
        conversation.push(Message::custom("notice"));
        conversation.push(Message::custom("mystery").with_text("should vanish"));

        let widget = TranscriptWidget::new(
            &conversation,
            &components,
            &NoWidgets,
            &(),
            &scroll,
            &config,
            &theme,
        );
        let content = render_to_string(widget, &mut transcript, 40, 15);

        let first = content.find("first").unwrap();
        let second = content.find("second").unwrap();
        let notice = content.find("maintenance tonight").unwrap();
        assert!(first < second && second < notice);
        assert!(!content.contains("should vanish"));
        assert_eq!(content.matches("second").count(), 1);
    }

    #[test]
    fn test_loading_gates_bot_widget() {
        let (mut transcript, components, scroll, config, theme) = harness();

        let mut conversation = ConversationState::new();
        conversation.push(Message::bot("pick a topic").with_widget("options").loading(true));

        let widget = TranscriptWidget::new(
            &conversation,
            &components,
            &OptionsRegistry,
            &(),
            &scroll,
            &config,
            &theme,
        );
        let content = render_to_string(widget, &mut transcript, 40, 10);
        assert!(!content.contains("[1] Pricing"));
        assert!(content.contains("..."));

        let mut conversation = ConversationState::new();
        conversation.push(Message::bot("pick a topic").with_widget("options"));
        let (mut transcript, components, scroll, config, theme) = harness();
        let widget = TranscriptWidget::new(
            &conversation,
            &components,
            &OptionsRegistry,
            &(),
            &scroll,
            &config,
            &theme,
        );
        let content = render_to_string(widget, &mut transcript, 40, 10);
        assert!(content.contains("[1] Pricing"));
        assert!(content.contains("pick a topic"));
    }

    #[test]
    fn test_user_widget_has_no_loading_gate() {
        let (mut transcript, components, scroll, config, theme) = harness();

        let mut conversation = ConversationState::new();
        conversation.push(Message::user("show me").with_widget("options").loading(true));

        let widget = TranscriptWidget::new(
            &conversation,
            &components,
            &OptionsRegistry,
            &(),
            &scroll,
            &config,
            &theme,
        );
        let content = render_to_string(widget, &mut transcript, 40, 10);
        assert!(content.contains("[1] Pricing"));
    }

    #[test]
    fn test_consecutive_plain_bot_messages_share_one_avatar() {
        let (mut transcript, components, scroll, config, theme) = harness();

        let mut conversation = ConversationState::new();
        conversation.push(Message::bot("hello"));
        conversation.push(Message::bot("how can I help?"));

        let widget = TranscriptWidget::new(
            &conversation,
            &components,
            &NoWidgets,
            &(),
            &scroll,
            &config,
            &theme,
        );
        let content = render_to_string(widget, &mut transcript, 40, 10);
        assert_eq!(content.matches('\u{25cf}').count(), 1);
        assert!(content.contains("HelpBot"));
    }

    #[test]
    fn test_bot_after_widget_message_regains_avatar() {
        let (mut transcript, components, scroll, config, theme) = harness();

        let mut conversation = ConversationState::new();
        conversation.push(Message::bot("pick one").with_widget("options"));
        conversation.push(Message::bot("anything else?"));

        let widget = TranscriptWidget::new(
            &conversation,
            &components,
            &OptionsRegistry,
            &(),
            &scroll,
            &config,
            &theme,
        );
        let content = render_to_string(widget, &mut transcript, 40, 12);
        assert_eq!(content.matches('\u{25cf}').count(), 2);
    }

    #[test]
    fn test_empty_conversation_placeholder() {
        let (mut transcript, components, scroll, config, theme) = harness();
        let conversation = ConversationState::new();

        let widget = TranscriptWidget::new(
            &conversation,
            &components,
            &NoWidgets,
            &(),
            &scroll,
            &config,
            &theme,
        );
        let content = render_to_string(widget, &mut transcript, 30, 6);
        assert!(content.contains("No messages yet"));
    }

    #[test]
    fn test_custom_renderer_receives_action_provider() {
        let (mut transcript, _, scroll, config, theme) = harness();
        let mut components: CustomComponents<&str> = CustomComponents::new();
        components.register_message("notice", |ctx| {
            Text::raw(format!("provider={}", ctx.action_provider))
        });

        let mut conversation = ConversationState::new();
        conversation.push(Message::custom("notice"));

        let provider = "acme";
        let widget = TranscriptWidget::new(
            &conversation,
            &components,
            &NoWidgets,
            &provider,
            &scroll,
            &config,
            &theme,
        );
        let content = render_to_string(widget, &mut transcript, 40, 6);
        assert!(content.contains("provider=acme"));
    }

    #[test]
    fn test_follow_mode_shows_newest_messages() {
        let (mut transcript, components, scroll, config, theme) = harness();

        let mut conversation = ConversationState::new();
        for i in 0..30 {
            conversation.push(Message::user(format!("message {i}")));
        }

        let widget = TranscriptWidget::new(
            &conversation,
            &components,
            &NoWidgets,
            &(),
            &scroll,
            &config,
            &theme,
        );
        let content = render_to_string(widget, &mut transcript, 40, 8);
        assert!(content.contains("message 29"));
        assert!(!content.contains("message 0 "));
    }

    #[test]
    fn test_scroll_up_reveals_older_messages_near_the_bottom() {
        let (mut transcript, components, scroll, config, theme) = harness();

        let mut conversation = ConversationState::new();
        for i in 0..30 {
            conversation.push(Message::user(format!("message {i}")));
        }

        let widget = TranscriptWidget::new(
            &conversation,
            &components,
            &NoWidgets,
            &(),
            &scroll,
            &config,
            &theme,
        );
        let _ = render_to_string(widget, &mut transcript, 40, 8);

        // One wheel tick up from the bottom, not a jump to the top
        transcript.scroll_up(SCROLL_SPEED);
        let widget = TranscriptWidget::new(
            &conversation,
            &components,
            &NoWidgets,
            &(),
            &scroll,
            &config,
            &theme,
        );
        let content = render_to_string(widget, &mut transcript, 40, 8);
        assert!(content.contains("message 27"));
        assert!(!content.contains("message 29"));
        assert!(!content.contains("message 0 "));
    }
}
