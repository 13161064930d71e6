//! Alphabet catalogs and per-alphabet scheduling profiles
//!
//! Each alphabet is a fixed table of characters plus the knobs that set it
//! apart from the others: pattern length, promotion policy and beat tempo.

pub mod data;

use std::time::Duration;

use crate::types::{Alphabet, PromotionPolicy};

pub use data::Entry;

/// Everything the scheduler needs to run one alphabet
#[derive(Debug, Clone)]
pub struct AlphabetProfile {
    /// Which alphabet this is, if it is one of the built-ins
    pub alphabet: Option<Alphabet>,
    /// Characters in catalog order
    pub entries: Vec<(String, String)>,
    /// Beats per pattern
    pub pattern_length: usize,
    /// How completed rounds promote characters
    pub promotion: PromotionPolicy,
    /// Time the learner gets per beat
    pub beat_duration: Duration,
}

impl AlphabetProfile {
    /// Built-in profile for an alphabet
    pub fn for_alphabet(alphabet: Alphabet) -> Self {
        let (table, pattern_length, promotion, beat_ms) = match alphabet {
            Alphabet::Hiragana => (data::HIRAGANA, 8, PromotionPolicy::Unrestricted, 800),
            Alphabet::Katakana => (data::KATAKANA, 8, PromotionPolicy::Unrestricted, 800),
            Alphabet::Cyrillic => (data::CYRILLIC, 16, PromotionPolicy::Throttled, 1000),
        };

        Self {
            alphabet: Some(alphabet),
            entries: table
                .iter()
                .map(|(symbol, romanization)| (symbol.to_string(), romanization.to_string()))
                .collect(),
            pattern_length,
            promotion,
            beat_duration: Duration::from_millis(beat_ms),
        }
    }

    /// Ad-hoc profile over an arbitrary table
    pub fn custom(entries: &[Entry], pattern_length: usize, promotion: PromotionPolicy) -> Self {
        Self {
            alphabet: None,
            entries: entries
                .iter()
                .map(|(symbol, romanization)| (symbol.to_string(), romanization.to_string()))
                .collect(),
            pattern_length,
            promotion,
            beat_duration: Duration::from_millis(800),
        }
    }

    /// Override the pattern length
    pub fn with_pattern_length(mut self, pattern_length: usize) -> Self {
        self.pattern_length = pattern_length;
        self
    }

    /// Override the promotion policy
    pub fn with_promotion(mut self, promotion: PromotionPolicy) -> Self {
        self.promotion = promotion;
        self
    }

    /// Display name
    pub fn name(&self) -> &str {
        self.alphabet.map(|a| a.as_str()).unwrap_or("custom")
    }
}
