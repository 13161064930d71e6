//! Adaptive scheduling engine
//!
//! Tracks each character's stage, builds beat patterns that mix stages by
//! position, serves them one beat at a time and re-stages characters when a
//! round completes.

pub mod registry;
pub mod random;
pub mod layout;
pub mod pattern;
pub mod builder;
pub mod evaluator;
pub mod session;

pub use registry::{Character, CharacterId, Registry};
pub use random::{RandomSource, ScriptedRandom, SeededRandom, ThreadRandom};
pub use layout::BeatLayout;
pub use pattern::{Pattern, PatternDraft, PromotionCandidates, Slot};
pub use builder::{PatternBuilder, SchedulerTuning};
pub use evaluator::{Evaluation, Evaluator, Tally};
pub use session::{Session, SessionSnapshot, SessionState};
