//! Conversation state and the shared handle the renderer reads it through.
//!
//! The state is owned by the host application for the life of the widget
//! session. The rendering layer reads it wholesale and appends exactly one
//! user message per submission; it never reorders or deletes. Hosts (action
//! providers in particular) are free to mutate it further through the same
//! shared handle.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::message::Message;

/// Ordered message sequence plus arbitrary host-defined fields.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConversationState {
    /// Messages in canonical display order.
    #[serde(default)]
    messages: Vec<Message>,

    /// Host-defined fields carried alongside the message list.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl ConversationState {
    /// Create an empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all messages in display order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Mutable access for hosts that need to complete loading placeholders
    /// or otherwise rework their own entries.
    pub fn messages_mut(&mut self) -> &mut [Message] {
        &mut self.messages
    }

    /// Get the number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if the conversation is empty.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Get the last message, if any.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Find a message by id.
    pub fn get(&self, id: u64) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// Find a message by id, mutably.
    pub fn get_mut(&mut self, id: u64) -> Option<&mut Message> {
        self.messages.iter_mut().find(|m| m.id == id)
    }

    /// Append a message, assigning the next id. Returns the assigned id.
    ///
    /// Ids stay unique and increasing even across a [`ConversationState`]
    /// loaded from disk, since the next id derives from the current tail.
    pub fn push(&mut self, mut message: Message) -> u64 {
        let id = self.messages.last().map_or(0, |m| m.id) + 1;
        message.id = id;
        self.messages.push(message);
        id
    }

    /// Load a conversation transcript from a JSON file.
    pub fn load(path: &Path) -> Result<Self, TranscriptError> {
        let content = std::fs::read_to_string(path).map_err(TranscriptError::Io)?;
        serde_json::from_str(&content).map_err(TranscriptError::Parse)
    }

    /// Save the conversation transcript to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), TranscriptError> {
        let content = serde_json::to_string_pretty(self).map_err(TranscriptError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(TranscriptError::Io)?;
        }
        std::fs::write(path, content).map_err(TranscriptError::Io)
    }
}

/// Errors that can occur when persisting a conversation transcript.
#[derive(Debug, Error)]
pub enum TranscriptError {
    /// I/O error reading or writing the transcript.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing transcript JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing the transcript to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Shared handle to a [`ConversationState`].
///
/// This is the sole mutation channel between the rendering layer and the
/// host-owned state. Single-threaded by construction; callers must not
/// re-enter `read` or `update` from within the closure.
#[derive(Debug, Clone, Default)]
pub struct SharedConversation(Rc<RefCell<ConversationState>>);

impl SharedConversation {
    /// Wrap an existing state in a shared handle.
    pub fn new(state: ConversationState) -> Self {
        Self(Rc::new(RefCell::new(state)))
    }

    /// Read the state through a closure.
    pub fn read<R>(&self, f: impl FnOnce(&ConversationState) -> R) -> R {
        f(&self.0.borrow())
    }

    /// Update the state through a closure.
    pub fn update<R>(&self, f: impl FnOnce(&mut ConversationState) -> R) -> R {
        f(&mut self.0.borrow_mut())
    }

    /// Get the number of messages.
    pub fn len(&self) -> usize {
        self.read(ConversationState::len)
    }

    /// Check if the conversation is empty.
    pub fn is_empty(&self) -> bool {
        self.read(ConversationState::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageKind;

    #[test]
    fn test_push_assigns_increasing_ids() {
        let mut state = ConversationState::new();
        let a = state.push(Message::user("one"));
        let b = state.push(Message::bot("two"));
        let c = state.push(Message::user("three"));
        assert_eq!((a, b, c), (1, 2, 3));
        assert_eq!(state.len(), 3);
        assert_eq!(state.messages()[0].text.as_deref(), Some("one"));
    }

    #[test]
    fn test_get_by_id() {
        let mut state = ConversationState::new();
        let id = state.push(Message::bot("hello"));
        assert_eq!(state.get(id).map(|m| &m.kind), Some(&MessageKind::Bot));
        assert!(state.get(999).is_none());
    }

    #[test]
    fn test_loading_placeholder_completion() {
        let mut state = ConversationState::new();
        let id = state.push(Message::bot("").loading(true).with_widget("options"));

        let msg = state.get_mut(id).unwrap();
        msg.text = Some("Here are your options".into());
        msg.loading = false;

        let msg = state.get(id).unwrap();
        assert!(!msg.loading);
        assert_eq!(msg.widget.as_deref(), Some("options"));
    }

    #[test]
    fn test_shared_conversation_update() {
        let shared = SharedConversation::default();
        shared.update(|s| {
            s.push(Message::user("hi"));
        });
        assert_eq!(shared.len(), 1);
        let kind = shared.read(|s| s.messages()[0].kind.clone());
        assert_eq!(kind, MessageKind::User);
    }

    #[test]
    fn test_transcript_round_trip() {
        let mut state = ConversationState::new();
        state.push(Message::user("hello"));
        state.push(Message::bot("hi").with_widget("options"));
        state.extra.insert("session".into(), serde_json::json!("abc"));

        let json = serde_json::to_string_pretty(&state).unwrap();
        let mut parsed: ConversationState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed.extra.get("session"), Some(&serde_json::json!("abc")));

        // Ids keep increasing after a reload
        let id = parsed.push(Message::user("again"));
        assert_eq!(id, 3);
    }
}
