//! chatpane-tui: ratatui presentation layer for the chatpane widget kit
//!
//! This crate provides the mountable UI element and its collaborator
//! contracts:
//! - [`ChatPane`] - composite widget (header, transcript, input box)
//! - [`TranscriptWidget`] / [`TranscriptState`] - scrollable history
//! - [`InputBox`] / [`InputState`] - the text input
//! - [`WidgetRegistry`] and [`CustomComponents`] - host plug-in points
//! - [`Theme`] / [`StyleOverrides`] - colors
//!
//! The host owns the terminal, the event loop, and the conversation state;
//! this crate only draws.

mod input;
mod pane;
mod registry;
mod theme;
mod transcript;

pub use input::{InputBox, InputState};
pub use pane::ChatPane;
pub use registry::{
    CustomComponents, HeaderFn, NoWidgets, RenderContext, RenderFn, WidgetContext, WidgetRegistry,
};
pub use theme::{StyleOverrides, Theme};
pub use transcript::{TranscriptState, TranscriptWidget, SCROLL_SPEED};

pub use chatpane_core;

/// Returns the TUI crate version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
