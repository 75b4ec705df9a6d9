use crate::constants::WINDOW_SIZE;

/// Scroll position of the visible history window.
///
/// `offset` is the first visible history index. Scrolling never moves the
/// window before index 0 or past the last valid entry. The window always
/// shows at least one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    offset: usize,
    window_size: usize,
}

impl Viewport {
    pub fn new(window_size: usize) -> Self {
        Self {
            offset: 0,
            window_size: window_size.max(1),
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Move one entry towards newer messages. Returns whether the offset changed.
    pub fn scroll_up(&mut self) -> bool {
        if self.offset > 0 {
            self.offset -= 1;
            true
        } else {
            false
        }
    }

    /// Move one entry towards older messages, given `count` valid entries
    pub fn scroll_down(&mut self, count: usize) -> bool {
        if self.has_more_below(count) {
            self.offset += 1;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.offset = 0;
    }

    pub fn has_more_above(&self) -> bool {
        self.offset > 0
    }

    pub fn has_more_below(&self, count: usize) -> bool {
        self.offset + self.window_size < count
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(WINDOW_SIZE)
    }
}
