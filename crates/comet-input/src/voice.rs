//! Recognized-phrase tracker.
//!
//! Speech recognition lives behind the platform poller; this tracker receives
//! the per-tick list of recognized phrases and answers "was phrase P heard
//! this frame".

use std::collections::HashMap;

/// Per-tick recognized phrases plus per-phrase consumption stamps.
#[derive(Debug, Default)]
pub struct VoiceTracker {
    current: Vec<String>,
    consumed: HashMap<String, u64>,
}

impl VoiceTracker {
    /// Creates a tracker with no phrases.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces this frame's phrase list. Call once per tick.
    pub fn update(&mut self, phrases: Vec<String>) {
        self.current = phrases;
    }

    /// Whether `phrase` was recognized this frame (exact match).
    #[must_use]
    pub fn recognized(&self, phrase: &str) -> bool {
        self.current.iter().any(|p| p == phrase)
    }

    /// Stamps `phrase` as consumed for `frame`.
    pub fn consume(&mut self, phrase: &str, frame: u64) {
        self.consumed.insert(phrase.to_string(), frame);
    }

    /// Whether `phrase` was consumed on `frame`.
    #[must_use]
    pub fn is_consumed(&self, phrase: &str, frame: u64) -> bool {
        self.consumed.get(phrase) == Some(&frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phrases_are_per_frame() {
        let mut voice = VoiceTracker::new();
        voice.update(vec!["open map".to_string()]);
        assert!(voice.recognized("open map"));
        assert!(!voice.recognized("close map"));

        voice.update(Vec::new());
        assert!(!voice.recognized("open map"));
    }

    #[test]
    fn test_consumption_scoped_to_single_frame() {
        let mut voice = VoiceTracker::new();
        voice.consume("open map", 9);
        assert!(voice.is_consumed("open map", 9));
        assert!(!voice.is_consumed("open map", 10));
        assert!(!voice.is_consumed("close map", 9));
    }
}
