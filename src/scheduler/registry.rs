//! Character Registry - the fixed catalog and each character's proficiency
//!
//! Characters are created at stage 0 and only ever move through `promote`
//! and `demote`. Patterns refer to them by `CharacterId`, so a stage change
//! is visible from every position that references the character.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use super::random::{choose, RandomSource};

/// Stable handle to a character in its registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CharacterId(pub usize);

/// A drillable character and its learning state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Character {
    pub symbol: String,
    pub romanization: String,
    pub stage: u32,
    pub last_correct: bool,
}

impl Character {
    pub fn new(symbol: impl Into<String>, romanization: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            romanization: romanization.into(),
            stage: 0,
            last_correct: false,
        }
    }

    /// Whether a typed answer is this character's romanization.
    /// Both sides are trimmed and lower-cased.
    pub fn matches(&self, answer: &str) -> bool {
        answer.trim().to_lowercase() == self.romanization.trim().to_lowercase()
    }

    /// Stage-1 characters missed last time are shown with their romanization
    pub fn needs_hint(&self) -> bool {
        self.stage == 1 && !self.last_correct
    }
}

impl std::fmt::Display for Character {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({}){}",
            self.symbol,
            self.romanization,
            if self.last_correct { "✓" } else { "✗" }
        )
    }
}

/// The catalog for one session
#[derive(Debug, Clone, Default)]
pub struct Registry {
    characters: Vec<Character>,
}

impl Registry {
    /// Build a registry with every character at stage 0
    pub fn from_entries<S, R>(entries: impl IntoIterator<Item = (S, R)>) -> Self
    where
        S: Into<String>,
        R: Into<String>,
    {
        Self {
            characters: entries
                .into_iter()
                .map(|(symbol, romanization)| Character::new(symbol, romanization))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    pub fn get(&self, id: CharacterId) -> Option<&Character> {
        self.characters.get(id.0)
    }

    fn get_mut(&mut self, id: CharacterId) -> Option<&mut Character> {
        self.characters.get_mut(id.0)
    }

    /// Look a character up by symbol
    pub fn find(&self, symbol: &str) -> Option<CharacterId> {
        self.characters
            .iter()
            .position(|c| c.symbol == symbol)
            .map(CharacterId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CharacterId, &Character)> {
        self.characters
            .iter()
            .enumerate()
            .map(|(i, c)| (CharacterId(i), c))
    }

    pub fn ids(&self) -> Vec<CharacterId> {
        (0..self.characters.len()).map(CharacterId).collect()
    }

    /// Characters at exactly `stage`, in catalog order
    pub fn pool(&self, stage: u32) -> Vec<CharacterId> {
        self.iter()
            .filter(|(_, c)| c.stage == stage)
            .map(|(id, _)| id)
            .collect()
    }

    /// Characters at `stage` or above, in catalog order
    pub fn pool_at_least(&self, stage: u32) -> Vec<CharacterId> {
        self.iter()
            .filter(|(_, c)| c.stage >= stage)
            .map(|(id, _)| id)
            .collect()
    }

    /// Number of characters per stage
    pub fn stage_counts(&self) -> BTreeMap<u32, usize> {
        let mut counts = BTreeMap::new();
        for character in &self.characters {
            *counts.entry(character.stage).or_insert(0) += 1;
        }
        counts
    }

    pub fn stage_of(&self, id: CharacterId) -> Option<u32> {
        self.get(id).map(|c| c.stage)
    }

    /// Raise a character one stage. There is no ceiling.
    pub fn promote(&mut self, id: CharacterId) {
        if let Some(character) = self.get_mut(id) {
            character.stage += 1;
            info!("Promoted {} to stage {}", character.symbol, character.stage);
        }
    }

    /// Lower a character one stage, never below 1.
    /// A stage-0 character is activated at stage 1 instead.
    pub fn demote(&mut self, id: CharacterId) {
        if let Some(character) = self.get_mut(id) {
            let before = character.stage;
            character.stage = match character.stage {
                0 | 1 => 1,
                stage => stage - 1,
            };
            info!(
                "Demoted {} from stage {} to stage {}",
                character.symbol, before, character.stage
            );
        }
    }

    /// Record the learner's latest answer for a symbol.
    /// Returns the matching id, or `None` (and changes nothing) if unknown.
    pub fn record_result(&mut self, symbol: &str, correct: bool) -> Option<CharacterId> {
        let Some(id) = self.find(symbol) else {
            debug!("Ignoring result for unknown character {}", symbol);
            return None;
        };
        if let Some(character) = self.get_mut(id) {
            character.last_correct = correct;
            debug!(
                "Character {}({}) - answer {}",
                character.symbol,
                character.romanization,
                if correct { "correct" } else { "incorrect" }
            );
        }
        Some(id)
    }

    /// Seed the first two stage-0 characters in catalog order: the first to
    /// stage 1, the second to stage 2. Does nothing with fewer than two.
    pub fn seed_initial_stages(&mut self) -> bool {
        let stage0 = self.pool(0);
        if stage0.len() < 2 {
            warn!(
                "Only {} stage 0 characters; skipping initial promotions",
                stage0.len()
            );
            return false;
        }

        self.promote(stage0[0]);
        self.promote(stage0[1]);
        self.promote(stage0[1]);
        true
    }

    /// Advisory check that at least two fresh characters remain.
    /// Nothing replenishes the stage-0 pool; this only reports the shortfall.
    pub fn ensure_minimum_stage0(&self) {
        let available = self.pool(0).len();
        if available < 2 {
            warn!(
                "Only {} stage 0 characters available; no new characters will be introduced",
                available
            );
        }
    }

    /// Guarantee a stage-1 character by promoting a random stage-0 one
    /// when the stage-1 pool is empty.
    pub fn ensure_minimum_stage1(&mut self, rng: &mut dyn RandomSource) {
        if !self.pool(1).is_empty() {
            return;
        }

        let stage0 = self.pool(0);
        match choose(rng, &stage0) {
            Some(&id) => {
                info!("No stage 1 characters; activating a stage 0 character");
                self.promote(id);
            }
            None => warn!("No stage 0 or stage 1 characters available"),
        }
    }

    /// Debug dump of every stage group
    pub fn log_stages(&self) {
        let mut groups: BTreeMap<u32, Vec<String>> = BTreeMap::new();
        for character in &self.characters {
            groups
                .entry(character.stage)
                .or_default()
                .push(character.to_string());
        }
        for (stage, characters) in groups {
            debug!("Stage {}: [{}]", stage, characters.join(", "));
        }
    }
}
