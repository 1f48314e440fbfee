//! Widget registry and host render overrides.
//!
//! Widgets are named interactive elements attached to messages; the host
//! resolves them to renderable text through the [`WidgetRegistry`] contract.
//! [`CustomComponents`] collects everything else the host can plug in:
//! render functions for custom message kinds, bot/user bubble overrides, and
//! a header renderer that fully replaces the default header line.

use std::collections::HashMap;

use ratatui::text::{Line, Text};

use chatpane_core::{ConversationState, Message, ScrollHandle};

/// Context handed to widget resolution: the whole conversation plus the
/// scroll-request handle, so interactive elements can pin the viewport back
/// to the newest message.
pub struct WidgetContext<'a> {
    /// The conversation being rendered.
    pub state: &'a ConversationState,
    /// Scroll-to-newest request signal.
    pub scroll: &'a ScrollHandle,
}

/// Resolves named widgets to renderable elements.
///
/// Absent or unknown names resolve to `None`, never a failure.
pub trait WidgetRegistry {
    /// Resolve a widget by name.
    fn get_widget(&self, name: &str, ctx: &WidgetContext<'_>) -> Option<Text<'static>>;
}

/// Registry that resolves nothing. For hosts without interactive widgets.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoWidgets;

impl WidgetRegistry for NoWidgets {
    fn get_widget(&self, _name: &str, _ctx: &WidgetContext<'_>) -> Option<Text<'static>> {
        None
    }
}

/// Context handed to message render functions. `A` is the host's opaque
/// action provider, forwarded untouched.
pub struct RenderContext<'a, A> {
    /// The conversation being rendered.
    pub state: &'a ConversationState,
    /// The message being rendered, including its extension fields.
    pub message: &'a Message,
    /// Scroll-to-newest request signal.
    pub scroll: &'a ScrollHandle,
    /// The host's action provider.
    pub action_provider: &'a A,
}

/// Render function for a message.
pub type RenderFn<A> = Box<dyn Fn(&RenderContext<'_, A>) -> Text<'static>>;

/// Render function for the header. Receives the action provider and fully
/// replaces the default header line.
pub type HeaderFn<A> = Box<dyn Fn(&A) -> Line<'static>>;

/// Host render overrides and custom message kinds.
pub struct CustomComponents<A> {
    /// Render functions keyed by custom message tag.
    messages: HashMap<String, RenderFn<A>>,
    /// Replacement for the default header.
    pub header: Option<HeaderFn<A>>,
    /// Override for bot message bubbles.
    pub bot_message: Option<RenderFn<A>>,
    /// Override for user message bubbles.
    pub user_message: Option<RenderFn<A>>,
}

impl<A> Default for CustomComponents<A> {
    fn default() -> Self {
        Self {
            messages: HashMap::new(),
            header: None,
            bot_message: None,
            user_message: None,
        }
    }
}

impl<A> CustomComponents<A> {
    /// Create an empty set of overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a render function for a custom message tag.
    pub fn register_message(
        &mut self,
        tag: impl Into<String>,
        render: impl Fn(&RenderContext<'_, A>) -> Text<'static> + 'static,
    ) {
        self.messages.insert(tag.into(), Box::new(render));
    }

    /// Check whether a tag has a registered render function.
    pub fn has_message(&self, tag: &str) -> bool {
        self.messages.contains_key(tag)
    }

    /// Look up the render function for a tag.
    pub fn message(&self, tag: &str) -> Option<&RenderFn<A>> {
        self.messages.get(tag)
    }

    /// Set the header renderer.
    #[must_use]
    pub fn with_header(mut self, header: impl Fn(&A) -> Line<'static> + 'static) -> Self {
        self.header = Some(Box::new(header));
        self
    }
}
