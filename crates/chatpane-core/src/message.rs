//! Message records and classification.
//!
//! A conversation is an ordered sequence of [`Message`] records. Each record
//! carries a closed kind tag: bot and user messages are built in, and any
//! other tag must be registered by the host with a matching render function.
//! Records whose tag matches nothing are omitted from output rather than
//! surfaced as errors.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kind tag for a conversation entry.
///
/// `Bot` and `User` are the built-in variants. `Custom` carries a
/// host-registered tag; whether it renders depends on the host having
/// registered a render function under the same tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Originated by the automated side.
    Bot,
    /// Originated by the human operator.
    User,
    /// Host-registered kind with a bespoke render function.
    #[serde(untagged)]
    Custom(String),
}

impl MessageKind {
    /// Get the tag string for this kind.
    pub fn tag(&self) -> &str {
        match self {
            Self::Bot => "bot",
            Self::User => "user",
            Self::Custom(tag) => tag,
        }
    }
}

/// A single conversation entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique, monotonically increasing identifier. Assigned when the
    /// message is appended to a [`crate::ConversationState`].
    pub id: u64,

    /// Kind tag deciding the visual treatment.
    pub kind: MessageKind,

    /// Textual payload. Absent for pure-widget messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Name of a registry-resolved element to render alongside this message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget: Option<String>,

    /// Explicit avatar override. When unset, avatar display is computed from
    /// the message's position (see [`shows_avatar`]).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub with_avatar: Option<bool>,

    /// Placeholder awaiting async completion. Suppresses widget rendering on
    /// bot messages until cleared.
    #[serde(default)]
    pub loading: bool,

    /// When the message was created (UTC).
    pub timestamp: DateTime<Utc>,

    /// Free-form host fields, passed through to bot and custom presentation.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl Message {
    fn new(kind: MessageKind, text: Option<String>) -> Self {
        Self {
            id: 0,
            kind,
            text,
            widget: None,
            with_avatar: None,
            loading: false,
            timestamp: Utc::now(),
            extra: Map::new(),
        }
    }

    /// Create a bot message with the given text.
    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(MessageKind::Bot, Some(text.into()))
    }

    /// Create a user message with the given text.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageKind::User, Some(text.into()))
    }

    /// Create a custom-kind message. It renders only if the host registers a
    /// render function under the same tag.
    pub fn custom(tag: impl Into<String>) -> Self {
        Self::new(MessageKind::Custom(tag.into()), None)
    }

    /// Set the textual payload.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Attach a named widget.
    #[must_use]
    pub fn with_widget(mut self, name: impl Into<String>) -> Self {
        self.widget = Some(name.into());
        self
    }

    /// Force avatar display on or off, overriding the positional rule.
    #[must_use]
    pub fn with_avatar(mut self, show: bool) -> Self {
        self.with_avatar = Some(show);
        self
    }

    /// Mark the message as a loading placeholder.
    #[must_use]
    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    /// Attach a free-form host field.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Check if this is a bot message.
    pub fn is_bot(&self) -> bool {
        self.kind == MessageKind::Bot
    }

    /// Check if this is a user message.
    pub fn is_user(&self) -> bool {
        self.kind == MessageKind::User
    }

    /// Get the timestamp formatted for display (HH:MM in local time).
    pub fn time_str(&self) -> String {
        let local: DateTime<Local> = self.timestamp.into();
        local.format("%H:%M").to_string()
    }
}

/// Presentation variant a message classifies into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Bot bubble with the avatar rule applied.
    Bot,
    /// User bubble.
    User,
    /// Host-registered render function.
    Custom,
}

/// Classify a message into its presentation variant.
///
/// First match wins: bot, then user, then a custom tag the host has
/// registered (`is_registered` checks the render table). Messages matching
/// nothing return `None` and are omitted from output; a debug trace is the
/// only diagnostic.
pub fn classify(message: &Message, is_registered: impl Fn(&str) -> bool) -> Option<Variant> {
    match &message.kind {
        MessageKind::Bot => Some(Variant::Bot),
        MessageKind::User => Some(Variant::User),
        MessageKind::Custom(tag) if is_registered(tag) => Some(Variant::Custom),
        MessageKind::Custom(tag) => {
            tracing::debug!(id = message.id, %tag, "omitting message with unregistered kind");
            None
        }
    }
}

/// Decide avatar display for the message at `index`.
///
/// The first message always shows its avatar. After that, the avatar is
/// hidden only when the immediately preceding message is a bot message that
/// carried no widget, grouping consecutive plain bot replies. An explicit
/// [`Message::with_avatar`] override wins over the positional rule.
pub fn shows_avatar(messages: &[Message], index: usize) -> bool {
    let Some(message) = messages.get(index) else {
        return false;
    };

    if let Some(explicit) = message.with_avatar {
        return explicit;
    }

    if index == 0 {
        return true;
    }

    let prev = &messages[index - 1];
    !(prev.is_bot() && prev.widget.is_none())
}
