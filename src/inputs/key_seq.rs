use std::time::{Duration, Instant};

const KEY_SEQUENCE_TIMEOUT: Duration = Duration::from_millis(1000);

/// Tracks the last two pressed characters so chorded motions like `gg`
/// can be recognized. A pause longer than the timeout starts a fresh
/// sequence. Time is passed in by the caller.
pub struct KeySeq {
    key_sequence: Vec<char>,
    last_key_time: Option<Instant>,
}

impl Default for KeySeq {
    fn default() -> Self {
        Self::new()
    }
}

impl KeySeq {
    pub fn new() -> Self {
        Self {
            key_sequence: Vec::new(),
            last_key_time: None,
        }
    }

    /// Record a key press and return the current sequence.
    pub fn handle_key(&mut self, key_char: char, now: Instant) -> String {
        let stale = self
            .last_key_time
            .is_some_and(|last| now.duration_since(last) > KEY_SEQUENCE_TIMEOUT);
        if stale {
            self.key_sequence.clear();
        }

        if self.key_sequence.len() == 2 {
            self.key_sequence.remove(0);
        }

        self.key_sequence.push(key_char);
        self.last_key_time = Some(now);

        self.key_sequence.iter().collect()
    }

    pub fn clear(&mut self) {
        self.key_sequence.clear();
        self.last_key_time = None;
    }

    pub fn current_sequence(&self) -> String {
        self.key_sequence.iter().collect()
    }
}
