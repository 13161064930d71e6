//! Round Player - one learner's session over one alphabet
//!
//! The presentation layer drives a session with three calls:
//! `initialize_system` once, then `next_character` / `report_result` per beat.
//! When a pattern runs out, the next `next_character` evaluates it and builds
//! the following round before serving.

use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::builder::{PatternBuilder, SchedulerTuning};
use super::evaluator::{Evaluation, Evaluator};
use super::pattern::Pattern;
use super::random::{RandomSource, ThreadRandom};
use super::registry::{Character, Registry};
use crate::catalog::AlphabetProfile;
use crate::error::{Result, SchedulerError};
use crate::types::PromotionPolicy;

/// Where the session is in its cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// `initialize_system` has not run
    Uninitialized,
    /// Beats remain in the current round
    Serving { round: u64, beat: usize },
    /// Every beat has been served; the next request evaluates the round
    PatternExhausted { round: u64 },
}

/// Per-character line of a snapshot
#[derive(Debug, Clone, Serialize)]
pub struct CharacterSummary {
    pub symbol: String,
    pub romanization: String,
    pub stage: u32,
    pub last_correct: bool,
}

/// Serializable view of a session's progress
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub alphabet: String,
    pub round: u64,
    pub pattern_length: usize,
    pub promotion: PromotionPolicy,
    pub stage_counts: BTreeMap<u32, usize>,
    pub characters: Vec<CharacterSummary>,
}

/// Scheduler session owning its registry and in-flight pattern
pub struct Session {
    name: String,
    beat_duration: Duration,
    registry: Registry,
    builder: PatternBuilder,
    evaluator: Evaluator,
    rng: Box<dyn RandomSource>,
    pattern: Option<Pattern>,
    last_evaluation: Option<Evaluation>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("name", &self.name)
            .field("state", &self.state())
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Create a session. Fails on an empty catalog or an unusable pattern length.
    pub fn new(
        profile: &AlphabetProfile,
        tuning: SchedulerTuning,
        rng: Box<dyn RandomSource>,
    ) -> Result<Self> {
        if profile.entries.is_empty() {
            return Err(SchedulerError::EmptyCatalog);
        }

        Ok(Self {
            name: profile.name().to_string(),
            beat_duration: profile.beat_duration,
            registry: Registry::from_entries(profile.entries.iter().cloned()),
            builder: PatternBuilder::new(profile.pattern_length, tuning)?,
            evaluator: Evaluator::new(profile.promotion),
            rng,
            pattern: None,
            last_evaluation: None,
        })
    }

    /// Session with default tuning and non-deterministic variation
    pub fn with_defaults(profile: &AlphabetProfile) -> Result<Self> {
        Self::new(profile, SchedulerTuning::default(), Box::new(ThreadRandom))
    }

    pub fn state(&self) -> SessionState {
        match &self.pattern {
            None => SessionState::Uninitialized,
            Some(pattern) if pattern.is_exhausted() => SessionState::PatternExhausted {
                round: pattern.round(),
            },
            Some(pattern) => SessionState::Serving {
                round: pattern.round(),
                beat: pattern.cursor(),
            },
        }
    }

    /// Seed the first two characters and build the first round.
    /// Call once per session: a second call seeds two more characters.
    pub fn initialize_system(&mut self) -> Result<()> {
        if self.pattern.is_some() {
            warn!("{} session initialized twice", self.name);
        }
        info!("Initializing {} session", self.name);

        self.registry.seed_initial_stages();
        self.registry.log_stages();

        let round = self.round() + 1;
        self.pattern = Some(self.builder.build(&mut self.registry, self.rng.as_mut(), round)?);
        Ok(())
    }

    /// Serve the next beat, rolling over to a new round when needed
    pub fn next_character(&mut self) -> Result<&Character> {
        let exhausted = match &self.pattern {
            None => return Err(SchedulerError::NotInitialized),
            Some(pattern) => pattern.is_exhausted(),
        };
        if exhausted {
            self.complete_round()?;
        }

        let pattern = self.pattern.as_mut().ok_or(SchedulerError::NotInitialized)?;
        let beat = pattern.cursor();
        let id = pattern
            .advance()
            .ok_or(SchedulerError::UnresolvedPosition(beat))?;
        let character = self
            .registry
            .get(id)
            .ok_or(SchedulerError::UnresolvedPosition(beat))?;

        debug!(
            "Beat {}: serving {}({}) - stage {}",
            beat, character.symbol, character.romanization, character.stage
        );
        Ok(character)
    }

    /// Record the learner's answer for a served character. Unknown symbols
    /// are ignored.
    pub fn report_result(&mut self, symbol: &str, correct: bool) {
        let Some(id) = self.registry.record_result(symbol, correct) else {
            return;
        };
        if let Some(pattern) = self.pattern.as_mut() {
            if let Some((position, served)) = pattern.last_served() {
                if served == id {
                    pattern.record_outcome(position, correct);
                }
            }
        }
    }

    /// Judge a typed answer against the most recently served character and
    /// report it. Returns whether it was correct.
    pub fn answer(&mut self, input: &str) -> Result<bool> {
        let character = self.last_served().ok_or(SchedulerError::NothingServed)?;
        let correct = character.matches(input);
        let symbol = character.symbol.clone();
        self.report_result(&symbol, correct);
        Ok(correct)
    }

    /// Character on the beat served most recently
    pub fn last_served(&self) -> Option<&Character> {
        let (_, id) = self.pattern.as_ref()?.last_served()?;
        self.registry.get(id)
    }

    /// Evaluate the finished round and install the next one
    fn complete_round(&mut self) -> Result<()> {
        let Some(finished) = self.pattern.take() else {
            return Err(SchedulerError::NotInitialized);
        };
        info!("Round {} complete", finished.round());

        let evaluation = self.evaluator.evaluate(&finished, &mut self.registry);
        let next_round = finished.round() + 1;
        self.last_evaluation = Some(evaluation);
        self.pattern = Some(self.builder.build(&mut self.registry, self.rng.as_mut(), next_round)?);
        Ok(())
    }

    /// Current round number, 0 before initialization
    pub fn round(&self) -> u64 {
        self.pattern.as_ref().map(|p| p.round()).unwrap_or(0)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern_length(&self) -> usize {
        self.builder.layout().len()
    }

    pub fn beat_duration(&self) -> Duration {
        self.beat_duration
    }

    pub fn promotion_policy(&self) -> PromotionPolicy {
        self.evaluator.policy()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn pattern(&self) -> Option<&Pattern> {
        self.pattern.as_ref()
    }

    /// Symbols of the current round in beat order
    pub fn pattern_symbols(&self) -> Vec<&str> {
        self.pattern
            .as_ref()
            .map(|pattern| {
                pattern
                    .positions()
                    .iter()
                    .filter_map(|id| self.registry.get(*id))
                    .map(|c| c.symbol.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Outcome of the most recent evaluation pass
    pub fn last_evaluation(&self) -> Option<&Evaluation> {
        self.last_evaluation.as_ref()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            alphabet: self.name.clone(),
            round: self.round(),
            pattern_length: self.pattern_length(),
            promotion: self.promotion_policy(),
            stage_counts: self.registry.stage_counts(),
            characters: self
                .registry
                .iter()
                .map(|(_, c)| CharacterSummary {
                    symbol: c.symbol.clone(),
                    romanization: c.romanization.clone(),
                    stage: c.stage,
                    last_correct: c.last_correct,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::random::SeededRandom;
    use crate::scheduler::registry::CharacterId;

    fn vowels(promotion: PromotionPolicy) -> Session {
        let profile = AlphabetProfile::custom(
            &[("a", "a"), ("i", "i"), ("u", "u"), ("e", "e"), ("o", "o")],
            8,
            promotion,
        );
        Session::new(&profile, SchedulerTuning::default(), Box::new(SeededRandom::new(7))).unwrap()
    }

    #[test]
    fn test_requires_initialization() {
        let mut session = vowels(PromotionPolicy::Unrestricted);
        assert_eq!(session.state(), SessionState::Uninitialized);
        assert_eq!(session.next_character().unwrap_err(), SchedulerError::NotInitialized);
        assert_eq!(session.answer("a").unwrap_err(), SchedulerError::NothingServed);
    }

    #[test]
    fn test_state_transitions() {
        let mut session = vowels(PromotionPolicy::Unrestricted);
        session.initialize_system().unwrap();
        assert_eq!(session.state(), SessionState::Serving { round: 1, beat: 0 });

        for _ in 0..8 {
            session.next_character().unwrap();
        }
        assert_eq!(session.state(), SessionState::PatternExhausted { round: 1 });

        session.next_character().unwrap();
        assert_eq!(session.state(), SessionState::Serving { round: 2, beat: 1 });
        assert_eq!(session.last_evaluation().map(|e| e.round), Some(1));
    }

    #[test]
    fn test_answer_records_outcome() {
        let mut session = vowels(PromotionPolicy::Unrestricted);
        session.initialize_system().unwrap();
        let served = session.next_character().unwrap().romanization.clone();

        assert!(session.answer(&format!(" {} ", served.to_uppercase())).unwrap());
        assert!(session.last_served().unwrap().last_correct);
        assert_eq!(session.pattern().unwrap().outcomes()[0], Some(true));

        session.next_character().unwrap();
        assert!(!session.answer("zzz").unwrap());
        assert_eq!(session.pattern().unwrap().outcomes()[1], Some(false));
    }

    #[test]
    fn test_unknown_symbol_is_ignored() {
        let mut session = vowels(PromotionPolicy::Unrestricted);
        session.initialize_system().unwrap();
        session.next_character().unwrap();
        let before = session.snapshot().stage_counts;
        session.report_result("ka", true);
        assert_eq!(session.snapshot().stage_counts, before);
        assert_eq!(session.pattern().unwrap().outcomes()[0], None);
    }

    #[test]
    fn test_single_character_catalog_still_plays() {
        let profile = AlphabetProfile::custom(&[("a", "a")], 8, PromotionPolicy::Unrestricted);
        let mut session =
            Session::new(&profile, SchedulerTuning::default(), Box::new(SeededRandom::new(3)))
                .unwrap();
        session.initialize_system().unwrap();

        // no initial promotions; the build activates the only character
        assert_eq!(session.registry().stage_of(CharacterId(0)), Some(1));
        assert_eq!(session.pattern_symbols(), vec!["a"; 8]);

        for _ in 0..8 {
            let symbol = session.next_character().unwrap().symbol.clone();
            assert_eq!(symbol, "a");
            session.report_result(&symbol, true);
        }
        assert_eq!(session.next_character().unwrap().symbol, "a");
        assert_eq!(session.round(), 2);
        assert_eq!(session.registry().stage_of(CharacterId(0)), Some(2));
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let profile = AlphabetProfile::custom(&[], 8, PromotionPolicy::Unrestricted);
        let err = Session::with_defaults(&profile).unwrap_err();
        assert_eq!(err, SchedulerError::EmptyCatalog);
    }

    #[test]
    fn test_snapshot() {
        let mut session = vowels(PromotionPolicy::Throttled);
        session.initialize_system().unwrap();
        let snapshot = session.snapshot();
        assert_eq!(snapshot.alphabet, "custom");
        assert_eq!(snapshot.round, 1);
        assert_eq!(snapshot.stage_counts.get(&0), Some(&3));
        assert_eq!(snapshot.characters.len(), 5);
        assert_eq!(session.pattern_symbols(), vec!["a", "i", "a", "i", "a", "i", "a", "i"]);
    }
}
