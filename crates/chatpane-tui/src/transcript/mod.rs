//! Transcript pane: the scrollable message history.
//!
//! Split into:
//! - `state`: scroll position and follow mode
//! - `widget`: classification-driven message rendering

mod state;
mod widget;

pub use state::{TranscriptState, SCROLL_SPEED};
pub use widget::TranscriptWidget;
