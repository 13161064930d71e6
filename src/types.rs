//! Shared types used across modules
//!
//! This module contains types that are used by the catalog, the scheduler
//! and the configuration layer, to avoid circular dependencies.

use serde::{Deserialize, Serialize};

use crate::error::SchedulerError;

/// A script the trainer can drill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alphabet {
    Hiragana,
    Katakana,
    #[serde(alias = "russian")]
    Cyrillic,
}

impl Alphabet {
    /// All alphabets in menu order
    pub fn all() -> &'static [Alphabet] {
        &[Alphabet::Hiragana, Alphabet::Katakana, Alphabet::Cyrillic]
    }

    /// Lower-case configuration name
    pub fn as_str(&self) -> &'static str {
        match self {
            Alphabet::Hiragana => "hiragana",
            Alphabet::Katakana => "katakana",
            Alphabet::Cyrillic => "cyrillic",
        }
    }

    /// Parse from a configuration or command-line name
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "hiragana" => Some(Alphabet::Hiragana),
            "katakana" => Some(Alphabet::Katakana),
            "cyrillic" | "russian" => Some(Alphabet::Cyrillic),
            _ => None,
        }
    }
}

impl std::str::FromStr for Alphabet {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Alphabet::from_name(s).ok_or_else(|| SchedulerError::UnknownAlphabet(s.to_string()))
    }
}

impl std::fmt::Display for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How many characters a completed round may promote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromotionPolicy {
    /// Every character with a perfect round is promoted
    Unrestricted,
    /// At most one perfect character is promoted per round
    Throttled,
}

impl std::fmt::Display for PromotionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PromotionPolicy::Unrestricted => write!(f, "unrestricted"),
            PromotionPolicy::Throttled => write!(f, "throttled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphabet_names() {
        assert_eq!(Alphabet::from_name("Hiragana"), Some(Alphabet::Hiragana));
        assert_eq!(Alphabet::from_name(" russian "), Some(Alphabet::Cyrillic));
        assert_eq!(Alphabet::from_name("greek"), None);
        assert_eq!(Alphabet::Katakana.to_string(), "katakana");
    }

    #[test]
    fn test_alphabet_from_str_error() {
        let err = "klingon".parse::<Alphabet>().unwrap_err();
        assert_eq!(err, SchedulerError::UnknownAlphabet("klingon".to_string()));
    }
}
