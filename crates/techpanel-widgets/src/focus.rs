//! Keyboard focus cycling across a screen's fields.

/// Tracks which of `len` focusable slots has focus. The slot count can
/// change at runtime (the edit screen shows fields the new screen hides).
#[derive(Debug, Clone, Default)]
pub struct FocusRing {
    focused: usize,
    len: usize,
}

impl FocusRing {
    pub fn new(len: usize) -> Self {
        Self { focused: 0, len }
    }

    pub fn focused(&self) -> usize {
        self.focused
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Change the slot count, keeping focus in range.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        self.focused = self.focused.min(len.saturating_sub(1));
    }

    pub fn focus_next(&mut self) {
        if self.len > 0 {
            self.focused = (self.focused + 1) % self.len;
        }
    }

    pub fn focus_prev(&mut self) {
        if self.len > 0 {
            self.focused = (self.focused + self.len - 1) % self.len;
        }
    }

    /// Clamped to the last slot.
    pub fn focus(&mut self, index: usize) {
        self.focused = index.min(self.len.saturating_sub(1));
    }

    pub fn is_focused(&self, index: usize) -> bool {
        self.len > 0 && self.focused == index
    }
}
