//! Presentation configuration for the chat pane.

use serde::{Deserialize, Serialize};

/// Presentation configuration: bot display name plus optional header and
/// placeholder overrides. Visual styling lives in the rendering layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Display name of the automated side.
    #[serde(default = "default_bot_name")]
    pub bot_name: String,

    /// Header text override. When unset, the header interpolates the bot
    /// name. A custom header renderer, when configured, replaces both.
    #[serde(default)]
    pub header_text: Option<String>,

    /// Input placeholder override.
    #[serde(default)]
    pub placeholder: Option<String>,
}

fn default_bot_name() -> String {
    "Bot".into()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            bot_name: default_bot_name(),
            header_text: None,
            placeholder: None,
        }
    }
}

impl ChatConfig {
    /// Create a config for the given bot name.
    pub fn new(bot_name: impl Into<String>) -> Self {
        Self {
            bot_name: bot_name.into(),
            ..Default::default()
        }
    }

    /// Resolve the header text: the override when present, otherwise a
    /// default interpolating the bot name.
    pub fn header(&self) -> String {
        self.header_text
            .clone()
            .unwrap_or_else(|| format!("Conversation with {}", self.bot_name))
    }

    /// Resolve the input placeholder.
    pub fn input_placeholder(&self) -> &str {
        self.placeholder.as_deref().unwrap_or("Write your message here")
    }
}
