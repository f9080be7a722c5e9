//! Typewriter effect: type a phrase, hold it, delete it, move on.

use serde::{Deserialize, Serialize};

/// Phrases shown when none are configured.
pub const DEFAULT_PHRASES: &[&str] = &[
    "STRATEGY \u{d7} IMPLEMENTATION",
    "BUSINESS \u{d7} SYSTEM BRIDGE",
    "COACHING \u{d7} CONSULTING \u{d7} ENGINEERING",
];

/// Delays between typewriter steps, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypewriterTiming {
    /// After typing a character.
    pub type_ms: u64,
    /// After deleting a character.
    pub delete_ms: u64,
    /// With a phrase fully typed.
    pub hold_ms: u64,
    /// With the line empty, before the next phrase.
    pub pause_ms: u64,
}

impl Default for TypewriterTiming {
    fn default() -> Self {
        Self {
            type_ms: 80,
            delete_ms: 40,
            hold_ms: 2500,
            pause_ms: 500,
        }
    }
}

/// Cycles through phrases one character at a time.
#[derive(Debug, Clone)]
pub struct Typewriter {
    phrases: Vec<String>,
    timing: TypewriterTiming,
    /// Index of the current phrase.
    phrase: usize,
    /// Visible characters of the current phrase.
    chars: usize,
    deleting: bool,
    /// Host time of the next step; `None` before the first tick.
    next_due_ms: Option<u64>,
    frozen: bool,
}

impl Typewriter {
    pub fn new(phrases: Vec<String>, timing: TypewriterTiming) -> Self {
        Self {
            phrases,
            timing,
            phrase: 0,
            chars: 0,
            deleting: false,
            next_due_ms: None,
            frozen: false,
        }
    }

    /// Show the first phrase in full and stop stepping.
    pub fn freeze(&mut self) {
        self.frozen = true;
        self.phrase = 0;
        self.deleting = false;
        self.chars = self.phrases.first().map_or(0, |p| p.chars().count());
    }

    /// Type or delete one character. Returns the delay before the next
    /// step.
    pub fn step(&mut self) -> u64 {
        let Some(current) = self.phrases.get(self.phrase) else {
            return self.timing.pause_ms;
        };
        let len = current.chars().count();

        if self.deleting {
            self.chars = self.chars.saturating_sub(1);
        } else {
            self.chars = (self.chars + 1).min(len);
        }

        if !self.deleting && self.chars == len {
            self.deleting = true;
            self.timing.hold_ms
        } else if self.deleting && self.chars == 0 {
            self.deleting = false;
            self.phrase = (self.phrase + 1) % self.phrases.len();
            self.timing.pause_ms
        } else if self.deleting {
            self.timing.delete_ms
        } else {
            self.timing.type_ms
        }
    }

    /// Run every step due at host time `now_ms`. The first call steps
    /// immediately.
    pub fn tick(&mut self, now_ms: u64) {
        if self.frozen || self.phrases.is_empty() {
            return;
        }
        let mut due = match self.next_due_ms {
            Some(due) => due,
            None => now_ms,
        };
        while due <= now_ms {
            due += self.step().max(1);
        }
        self.next_due_ms = Some(due);
    }

    /// Currently visible text.
    pub fn text(&self) -> &str {
        let Some(current) = self.phrases.get(self.phrase) else {
            return "";
        };
        let end = current
            .char_indices()
            .nth(self.chars)
            .map_or(current.len(), |(i, _)| i);
        &current[..end]
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting
    }

    pub fn phrase_index(&self) -> usize {
        self.phrase
    }
}

impl Default for Typewriter {
    fn default() -> Self {
        Self::new(
            DEFAULT_PHRASES.iter().map(|p| p.to_string()).collect(),
            TypewriterTiming::default(),
        )
    }
}
