//! Bounded history of submitted lines with a navigation cursor.

use std::collections::VecDeque;

/// What [`HistoryBuffer::record`] did with a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recorded {
    /// The line was blank and ignored.
    Skipped,
    /// The line was appended.
    Appended,
    /// The line was appended and the oldest entry (index 0) was evicted.
    Evicted(String),
}

/// Bounded, ordered log of submitted lines.
///
/// The cursor always points at a valid entry while the buffer is non-empty
/// and rests at `0` when it is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryBuffer {
    entries: VecDeque<String>,
    position: usize,
    capacity: usize,
}

impl HistoryBuffer {
    /// Create an empty buffer holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            position: 0,
            capacity,
        }
    }

    /// Record a submitted line.
    ///
    /// Blank lines are skipped. Otherwise the line is appended, the oldest
    /// entry is evicted when over capacity, and the cursor moves to the
    /// newest entry.
    pub fn record(&mut self, line: &str) -> Recorded {
        if line.trim().is_empty() {
            return Recorded::Skipped;
        }

        self.entries.push_back(line.to_string());

        let outcome = if self.entries.len() > self.capacity {
            self.entries
                .pop_front()
                .map_or(Recorded::Appended, Recorded::Evicted)
        } else {
            Recorded::Appended
        };

        self.position = self.entries.len().saturating_sub(1);
        outcome
    }

    /// Move the cursor one entry older and return that entry.
    ///
    /// Returns `None` only when the buffer is empty.
    pub fn back(&mut self) -> Option<&str> {
        self.navigate(-1)
    }

    /// Move the cursor one entry newer and return that entry.
    ///
    /// Returns `None` only when the buffer is empty.
    pub fn forward(&mut self) -> Option<&str> {
        self.navigate(1)
    }

    fn navigate(&mut self, delta: isize) -> Option<&str> {
        let last = self.entries.len().checked_sub(1)?;
        self.position = self.position.saturating_add_signed(delta).min(last);
        self.entries.get(self.position).map(String::as_str)
    }

    /// Remove every entry and reset the cursor.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.position = 0;
    }

    /// Current cursor index.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Maximum number of entries.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get an entry by index (0 is oldest).
    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    /// Iterate from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Get the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
