//! chatpane demo: a small echo assistant hosting the chat pane.
//!
//! Exercises the full widget kit: an echo parser and action provider, an
//! "options" widget registry, a custom "notice" message kind, validator-gated
//! submission, and loading placeholders completed on a tick.

use std::io::{self, stdout};
use std::time::Duration;

use clap::Parser as ClapParser;
use crossterm::{
    cursor::Show as ShowCursor,
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
        KeyModifiers, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, style::Style, text::{Line, Span, Text}, Terminal};
use tracing_subscriber::EnvFilter;

use chatpane_core::{
    ChatConfig, ChatSession, Message, MessageParser, ScrollHandle, SharedConversation,
    SubmitOutcome,
};
use chatpane_tui::{
    ChatPane, CustomComponents, InputState, RenderContext, StyleOverrides, Theme, TranscriptState,
    WidgetContext, WidgetRegistry, SCROLL_SPEED,
};

/// Echo assistant demo for the chatpane widget kit
#[derive(ClapParser)]
#[command(name = "chatpane-demo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Bot display name
    #[arg(long, default_value = "EchoBot")]
    bot_name: String,

    /// Header text override
    #[arg(long)]
    header: Option<String>,

    /// Input placeholder override
    #[arg(long)]
    placeholder: Option<String>,

    /// Use the light theme
    #[arg(long)]
    light: bool,
}

/// Ticks a loading reply stays pending before completing.
const REPLY_DELAY_TICKS: u8 = 3;

/// Action provider: appends bot replies in response to parsed intent.
struct EchoActions {
    state: SharedConversation,
    scroll: ScrollHandle,
    /// Loading placeholders awaiting completion: (message id, reply, ticks left).
    pending: Vec<(u64, String, u8)>,
}

impl EchoActions {
    fn new(state: SharedConversation, scroll: ScrollHandle) -> Self {
        Self {
            state,
            scroll,
            pending: Vec::new(),
        }
    }

    fn greet(&self) {
        self.state.update(|s| {
            s.push(Message::bot("Hello! Type `help` to see what I can do."));
        });
        self.scroll.request();
    }

    fn help(&mut self) {
        let id = self.state.update(|s| {
            s.push(Message::bot("").loading(true).with_widget("options"))
        });
        self.pending
            .push((id, "Here is what I can do:".into(), REPLY_DELAY_TICKS));
        self.scroll.request();
    }

    fn echo(&mut self, text: &str) {
        let id = self.state.update(|s| s.push(Message::bot("").loading(true)));
        self.pending
            .push((id, format!("You said: {text}"), REPLY_DELAY_TICKS));
        self.scroll.request();
    }

    /// Advance pending replies by one tick, completing any that are due.
    fn tick(&mut self) {
        let mut due = Vec::new();
        self.pending.retain_mut(|(id, reply, ticks)| {
            *ticks = ticks.saturating_sub(1);
            if *ticks == 0 {
                due.push((*id, std::mem::take(reply)));
                false
            } else {
                true
            }
        });

        if due.is_empty() {
            return;
        }
        self.state.update(|s| {
            for (id, reply) in due {
                if let Some(message) = s.get_mut(id) {
                    message.text = Some(reply);
                    message.loading = false;
                }
            }
        });
        self.scroll.request();
    }
}

/// Parser turning submitted text into echo actions.
struct EchoParser {
    actions: EchoActions,
}

impl EchoParser {
    fn new(state: SharedConversation, scroll: ScrollHandle) -> Self {
        Self {
            actions: EchoActions::new(state, scroll),
        }
    }
}

impl MessageParser for EchoParser {
    fn parse(&mut self, text: &str) {
        tracing::debug!(%text, "parsing submission");
        match text.trim().to_lowercase().as_str() {
            "hello" | "hi" => self.actions.greet(),
            "help" => self.actions.help(),
            other => self.actions.echo(other),
        }
    }
}

/// Registry resolving the "options" widget to a hint list.
struct DemoRegistry;

impl WidgetRegistry for DemoRegistry {
    fn get_widget(&self, name: &str, _ctx: &WidgetContext<'_>) -> Option<Text<'static>> {
        match name {
            "options" => Some(Text::from(vec![
                Line::from("    [hello]  say hi"),
                Line::from("    [help]   show this menu"),
                Line::from("    [other]  get echoed back"),
            ])),
            _ => None,
        }
    }
}

/// Opaque collaborator forwarded to custom renderers.
struct DemoProvider {
    session_name: String,
}

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen, ShowCursor);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let mut config = ChatConfig::new(cli.bot_name);
    config.header_text = cli.header;
    config.placeholder = cli.placeholder;
    let theme = if cli.light { Theme::latte() } else { Theme::mocha() };

    let shared = SharedConversation::default();
    shared.update(|s| {
        s.push(Message::custom("notice").with_text("session started"));
        s.push(Message::bot("Hi! I repeat what you say. Try `help`."));
    });

    let scroll = ScrollHandle::new();
    let mut session = ChatSession::new(
        shared.clone(),
        EchoParser::new(shared.clone(), scroll.clone()),
    )
    .with_scroll_handle(scroll.clone())
    .with_validator(|input| !input.trim().is_empty());

    let provider = DemoProvider {
        session_name: "demo".into(),
    };
    let mut components: CustomComponents<DemoProvider> = CustomComponents::new();
    components.register_message("notice", |ctx: &RenderContext<'_, DemoProvider>| {
        let body = ctx.message.text.clone().unwrap_or_default();
        Text::from(Line::from(Span::styled(
            format!("-- {} ({}) --", body, ctx.action_provider.session_name),
            Style::default().fg(ratatui::style::Color::DarkGray),
        )))
    });

    enable_raw_mode()?;
    let _guard = TerminalGuard;
    execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    let mut transcript = TranscriptState::new();
    let mut input = InputState::new();
    let registry = DemoRegistry;
    let styles = StyleOverrides::default();

    loop {
        transcript.sync(&scroll);

        shared.read(|conversation| {
            terminal
                .draw(|frame| {
                    let pane = ChatPane::new(
                        conversation,
                        &input,
                        &components,
                        &registry,
                        &provider,
                        &scroll,
                        &config,
                        &theme,
                    )
                    .styles(styles);
                    frame.render_stateful_widget(pane, frame.area(), &mut transcript);
                })
                .map(|_| ())
        })?;

        // Poll with a tick timeout; ticks complete pending bot replies
        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if key.modifiers.contains(KeyModifiers::CONTROL)
                        && key.code == KeyCode::Char('c')
                    {
                        break;
                    }
                    match key.code {
                        KeyCode::Esc => break,
                        KeyCode::Enter => {
                            if session.submit(input.content()) == SubmitOutcome::Submitted {
                                input.clear();
                            }
                        }
                        KeyCode::Char(c) => input.insert(c),
                        KeyCode::Backspace => input.backspace(),
                        KeyCode::Delete => input.delete(),
                        KeyCode::Left => input.move_left(),
                        KeyCode::Right => input.move_right(),
                        KeyCode::Home => input.move_home(),
                        KeyCode::End => input.move_end(),
                        KeyCode::Up => transcript.scroll_up(1),
                        KeyCode::Down => transcript.scroll_down(1),
                        KeyCode::PageUp => transcript.scroll_up(10),
                        KeyCode::PageDown => transcript.scroll_down(10),
                        _ => {}
                    }
                }
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollUp => transcript.scroll_up(SCROLL_SPEED),
                    MouseEventKind::ScrollDown => transcript.scroll_down(SCROLL_SPEED),
                    _ => {}
                },
                _ => {}
            }
        } else {
            session.parser_mut().actions.tick();
        }
    }

    terminal.show_cursor()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatpane_core::MessageKind;

    fn parser() -> (SharedConversation, ScrollHandle, EchoParser) {
        let shared = SharedConversation::default();
        let scroll = ScrollHandle::new();
        let parser = EchoParser::new(shared.clone(), scroll.clone());
        (shared, scroll, parser)
    }

    #[test]
    fn test_greeting_appends_bot_reply() {
        let (shared, scroll, mut parser) = parser();
        parser.parse("hello");

        shared.read(|s| {
            assert_eq!(s.len(), 1);
            assert_eq!(s.messages()[0].kind, MessageKind::Bot);
            assert!(!s.messages()[0].loading);
        });
        assert!(scroll.is_requested());
    }

    #[test]
    fn test_help_attaches_options_widget_after_loading() {
        let (shared, _scroll, mut parser) = parser();
        parser.parse("help");

        shared.read(|s| {
            let msg = s.last().unwrap();
            assert!(msg.loading);
            assert_eq!(msg.widget.as_deref(), Some("options"));
        });

        for _ in 0..REPLY_DELAY_TICKS {
            parser.actions.tick();
        }

        shared.read(|s| {
            let msg = s.last().unwrap();
            assert!(!msg.loading);
            assert_eq!(msg.text.as_deref(), Some("Here is what I can do:"));
        });
    }

    #[test]
    fn test_echo_completes_with_submitted_text() {
        let (shared, _scroll, mut parser) = parser();
        parser.parse("anything goes");

        for _ in 0..REPLY_DELAY_TICKS {
            parser.actions.tick();
        }

        shared.read(|s| {
            assert_eq!(s.last().unwrap().text.as_deref(), Some("You said: anything goes"));
        });
    }

    #[test]
    fn test_registry_resolves_only_known_names() {
        let state = chatpane_core::ConversationState::new();
        let scroll = ScrollHandle::new();
        let ctx = WidgetContext {
            state: &state,
            scroll: &scroll,
        };
        assert!(DemoRegistry.get_widget("options", &ctx).is_some());
        assert!(DemoRegistry.get_widget("nonsense", &ctx).is_none());
    }
}
