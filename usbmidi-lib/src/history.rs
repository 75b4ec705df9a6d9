use crate::constants::HISTORY_CAPACITY;
use crate::message::DecodedMessage;

/// Fixed-capacity, newest-first store of decoded messages.
///
/// Index 0 always holds the most recent message. Inserting into a full buffer
/// shifts everything down one slot and drops the oldest entry.
#[derive(Debug, Clone)]
pub struct History<const N: usize = { HISTORY_CAPACITY }> {
    slots: [Option<DecodedMessage>; N],
    count: usize,
}

impl<const N: usize> History<N> {
    pub fn new() -> Self {
        Self {
            slots: [None; N],
            count: 0,
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_full(&self) -> bool {
        self.count == N
    }

    /// Place `message` at index 0, evicting the oldest entry once full
    pub fn insert(&mut self, message: DecodedMessage) {
        if N == 0 {
            return;
        }
        self.slots.rotate_right(1);
        self.slots[0] = Some(message);
        self.count = (self.count + 1).min(N);
    }

    /// Forget all entries. Slots are left as-is; nothing past `count` is ever read.
    pub fn clear(&mut self) {
        self.count = 0;
    }

    pub fn get(&self, index: usize) -> Option<&DecodedMessage> {
        self.valid().get(index)?.as_ref()
    }

    pub fn newest(&self) -> Option<&DecodedMessage> {
        self.get(0)
    }

    /// Entries `[offset, offset + size)` clipped to the valid range, newest first
    pub fn window(&self, offset: usize, size: usize) -> impl Iterator<Item = &DecodedMessage> + '_ {
        self.valid().iter().skip(offset).take(size).flatten()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DecodedMessage> + '_ {
        self.valid().iter().flatten()
    }

    fn valid(&self) -> &[Option<DecodedMessage>] {
        &self.slots[..self.count]
    }
}

impl<const N: usize> Default for History<N> {
    fn default() -> Self {
        Self::new()
    }
}
