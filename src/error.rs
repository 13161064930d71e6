//! Scheduler error types
//!
//! The scheduler degrades silently wherever a fallback exists. These are the
//! conditions that have no fallback and must reach the caller.

use thiserror::Error;

/// Errors surfaced by the scheduling engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// The catalog has no characters, so no position can ever be resolved
    #[error("catalog is empty; at least one character is required to build a pattern")]
    EmptyCatalog,

    /// Pattern lengths must be even and at least two beats
    #[error("invalid pattern length {0}: must be an even number of beats, at least 2")]
    InvalidPatternLength(usize),

    /// A pattern position survived the gap-fill pass unresolved
    #[error("pattern position {0} is unresolved after gap fill")]
    UnresolvedPosition(usize),

    /// `next_character` was called before `initialize_system`
    #[error("session has not been initialized")]
    NotInitialized,

    /// An answer was submitted before any character was served
    #[error("no character has been served yet")]
    NothingServed,

    /// Alphabet name not recognised
    #[error("unknown alphabet '{0}' (expected hiragana, katakana or cyrillic)")]
    UnknownAlphabet(String),
}

/// Result alias for scheduler operations
pub type Result<T> = std::result::Result<T, SchedulerError>;
