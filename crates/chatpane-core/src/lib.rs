//! chatpane-core: headless conversation model for the chatpane widget kit
//!
//! This crate provides everything below the rendering layer:
//! - Message records with a closed kind tag and classification rules
//! - Host-owned conversation state behind a narrow shared handle
//! - The input-submission flow (validator, append, parse)
//! - The scroll-follow request signal
//! - Presentation configuration (bot name, header, placeholder)
//!
//! The ratatui presentation lives in `chatpane-tui`; collaborators like the
//! message parser and action provider are host-supplied.

pub mod config;
pub mod message;
pub mod session;
pub mod state;

// Re-export commonly used types
pub use config::ChatConfig;
pub use message::{classify, shows_avatar, Message, MessageKind, Variant};
pub use session::{ChatSession, MessageParser, NullParser, ScrollHandle, SubmitOutcome, Validator};
pub use state::{ConversationState, SharedConversation, TranscriptError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
