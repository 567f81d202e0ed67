//! Sequence state.

use serde::{Deserialize, Serialize};

/// Persistent state of a sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceState {
    /// Sequence name.
    pub name: String,

    /// Next value to be allocated.
    pub current_value: u64,

    /// Bumped on every change.
    pub version: u64,

    /// Last update timestamp (milliseconds since epoch).
    pub updated_at: i64,
}

impl SequenceState {
    /// Create a new sequence state.
    #[must_use]
    pub fn new(name: String, start_value: u64) -> Self {
        Self {
            name,
            current_value: start_value,
            version: 0,
            updated_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Hand out the next value and advance the counter past it.
    ///
    /// Returns `None` if the counter would overflow.
    pub fn allocate(&mut self) -> Option<u64> {
        let value = self.current_value;
        self.current_value = value.checked_add(1)?;
        self.touch();
        Some(value)
    }

    /// Raise the counter to at least `floor`. Never moves it backwards.
    ///
    /// Returns whether the counter changed.
    pub fn advance_to(&mut self, floor: u64) -> bool {
        if floor <= self.current_value {
            return false;
        }
        self.current_value = floor;
        self.touch();
        true
    }

    fn touch(&mut self) {
        self.version += 1;
        self.updated_at = chrono::Utc::now().timestamp_millis();
    }
}
