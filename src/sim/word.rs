//! Word buffer: the text the player is typing, read one char per lane

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordBuffer {
    chars: Vec<char>,
}

impl WordBuffer {
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
        }
    }

    /// Replace the buffer with the latest input
    pub fn set(&mut self, text: &str) {
        self.chars = text.chars().collect();
        log::debug!("word set to {:?}", text);
    }

    /// Letter sitting in a lane. Past the end, or whitespace, reads as no letter.
    pub fn letter_at(&self, lane: usize) -> Option<char> {
        self.chars
            .get(lane)
            .copied()
            .filter(|ch| !ch.is_whitespace())
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn as_string(&self) -> String {
        self.chars.iter().collect()
    }
}

impl From<&str> for WordBuffer {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}
