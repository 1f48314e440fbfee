//! Transcript scroll state.
//!
//! The viewport follows the newest message by default. Scrolling up hands
//! control to the user; a scroll request (raised on every submission, or by
//! any collaborator holding the handle) pins it back to the bottom.

use chatpane_core::ScrollHandle;

/// Lines scrolled per mouse wheel tick.
pub const SCROLL_SPEED: usize = 3;

/// Scroll position and follow mode for the transcript viewport.
#[derive(Debug, Clone)]
pub struct TranscriptState {
    /// First visible line, as of the last render pass.
    offset: usize,
    /// Whether to stay pinned to the newest message.
    follow: bool,
}

impl Default for TranscriptState {
    fn default() -> Self {
        Self {
            offset: 0,
            follow: true, // Start pinned to the newest message
        }
    }
}

impl TranscriptState {
    /// Create a new state in follow mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if follow mode is enabled.
    pub fn is_following(&self) -> bool {
        self.follow
    }

    /// Get the scroll offset as of the last render pass.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Scroll up by `amount` lines. Disables follow mode.
    pub fn scroll_up(&mut self, amount: usize) {
        self.follow = false;
        self.offset = self.offset.saturating_sub(amount);
    }

    /// Scroll down by `amount` lines.
    pub fn scroll_down(&mut self, amount: usize) {
        self.offset += amount;
    }

    /// Jump to the oldest message. Disables follow mode.
    pub fn jump_to_start(&mut self) {
        self.follow = false;
        self.offset = 0;
    }

    /// Jump to the newest message and re-enable follow mode.
    pub fn jump_to_end(&mut self) {
        self.follow = true;
    }

    /// Drain the scroll-request signal; a pending request re-enables follow
    /// mode. Call once per frame before rendering.
    pub fn sync(&mut self, scroll: &ScrollHandle) {
        if scroll.take() {
            self.follow = true;
        }
    }

    /// Resolve the first visible line for the given content height and
    /// viewport height, writing it back so a later scroll starts from the
    /// position actually shown. While following this is the maximum extent;
    /// a zero-height viewport is a no-op.
    pub fn resolve(&mut self, total_lines: usize, viewport_height: usize) -> usize {
        if viewport_height == 0 {
            return 0;
        }
        let max = total_lines.saturating_sub(viewport_height);
        self.offset = if self.follow { max } else { self.offset.min(max) };
        self.offset
    }
}
