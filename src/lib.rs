//! Tempo - Rhythm-Paced Alphabet Trainer Library
//!
//! Teaches a writing system one character per beat:
//! - Built-in hiragana, katakana and Cyrillic catalogs
//! - Stage-based progression with per-round promotion and demotion
//! - Beat patterns that place characters by stage and beat position
//! - Terminal drill and an automated learner for simulations
//!
//! # Example
//!
//! ```no_run
//! use tempo::{AlphabetProfile, Alphabet, Session};
//!
//! fn main() -> anyhow::Result<()> {
//!     let profile = AlphabetProfile::for_alphabet(Alphabet::Hiragana);
//!     let mut session = Session::with_defaults(&profile)?;
//!     session.initialize_system()?;
//!     let symbol = session.next_character()?.symbol.clone();
//!     session.report_result(&symbol, true);
//!     Ok(())
//! }
//! ```

// Core modules
pub mod types;
pub mod error;
pub mod catalog;
pub mod scheduler;
pub mod config;

// Front ends
pub mod drill;
pub mod cli;

pub use types::{Alphabet, PromotionPolicy};
pub use error::{Result, SchedulerError};
pub use catalog::AlphabetProfile;
pub use config::Config;

pub use scheduler::{
    Character,
    CharacterId,
    Evaluation,
    Pattern,
    PatternBuilder,
    RandomSource,
    Registry,
    SchedulerTuning,
    ScriptedRandom,
    SeededRandom,
    Session,
    SessionSnapshot,
    SessionState,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get the library info
pub fn info() -> String {
    format!("{} v{} - Rhythm-Paced Alphabet Trainer", NAME, VERSION)
}
