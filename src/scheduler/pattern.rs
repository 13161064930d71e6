//! Beat patterns
//!
//! A `PatternDraft` is what the builder works on: every position starts
//! `Unresolved` and is filled by the placement rules. `finish` collapses it
//! into a `Pattern`, which only exists when every position is resolved.

use serde::Serialize;
use std::collections::BTreeMap;

use super::registry::CharacterId;
use crate::error::{Result, SchedulerError};

/// Candidate-map key that stands for every stage from 5 upwards
pub const TOP_STAGE_KEY: u32 = 5;

/// Stage -> the character chosen to represent it in this pattern
pub type PromotionCandidates = BTreeMap<u32, CharacterId>;

/// One position while a pattern is being built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Unresolved,
    Resolved(CharacterId),
}

impl Slot {
    pub fn resolved(&self) -> Option<CharacterId> {
        match self {
            Slot::Resolved(id) => Some(*id),
            Slot::Unresolved => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Slot::Resolved(_))
    }
}

/// A pattern under construction
#[derive(Debug, Clone)]
pub struct PatternDraft {
    slots: Vec<Slot>,
    candidates: PromotionCandidates,
}

impl PatternDraft {
    pub fn new(length: usize) -> Self {
        Self {
            slots: vec![Slot::Unresolved; length],
            candidates: PromotionCandidates::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot(&self, position: usize) -> Slot {
        self.slots.get(position).copied().unwrap_or(Slot::Unresolved)
    }

    pub fn place(&mut self, position: usize, id: CharacterId) {
        if let Some(slot) = self.slots.get_mut(position) {
            *slot = Slot::Resolved(id);
        }
    }

    /// Remember the character representing `stage`, first choice wins
    pub fn nominate(&mut self, stage: u32, id: CharacterId) {
        self.candidates.entry(stage).or_insert(id);
    }

    pub fn candidates(&self) -> &PromotionCandidates {
        &self.candidates
    }

    /// Collapse into a playable pattern
    pub fn finish(self, round: u64) -> Result<Pattern> {
        let positions = self
            .slots
            .iter()
            .enumerate()
            .map(|(position, slot)| {
                slot.resolved()
                    .ok_or(SchedulerError::UnresolvedPosition(position))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Pattern {
            round,
            outcomes: vec![None; positions.len()],
            positions,
            cursor: 0,
            candidates: self.candidates,
        })
    }
}

/// A fully-resolved round, consumed one beat at a time
#[derive(Debug, Clone, Serialize)]
pub struct Pattern {
    round: u64,
    positions: Vec<CharacterId>,
    cursor: usize,
    outcomes: Vec<Option<bool>>,
    candidates: PromotionCandidates,
}

impl Pattern {
    /// Round number, unique per session
    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[CharacterId] {
        &self.positions
    }

    /// Beats already served
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.positions.len()
    }

    /// Serve the character at the cursor and advance
    pub fn advance(&mut self) -> Option<CharacterId> {
        let id = self.positions.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(id)
    }

    /// The position served most recently, if any
    pub fn last_served(&self) -> Option<(usize, CharacterId)> {
        let position = self.cursor.checked_sub(1)?;
        self.positions.get(position).map(|id| (position, *id))
    }

    /// Record the answer given while `position` was on screen
    pub fn record_outcome(&mut self, position: usize, correct: bool) {
        if let Some(outcome) = self.outcomes.get_mut(position) {
            *outcome = Some(correct);
        }
    }

    pub fn outcomes(&self) -> &[Option<bool>] {
        &self.outcomes
    }

    pub fn candidates(&self) -> &PromotionCandidates {
        &self.candidates
    }

    /// Candidate for a stage, with every stage >= 5 sharing one entry
    pub fn candidate_for(&self, stage: u32) -> Option<CharacterId> {
        self.candidates.get(&stage.min(TOP_STAGE_KEY)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_requires_every_position() {
        let mut draft = PatternDraft::new(3);
        draft.place(0, CharacterId(0));
        draft.place(2, CharacterId(1));
        let err = draft.finish(1).unwrap_err();
        assert_eq!(err, SchedulerError::UnresolvedPosition(1));
    }

    #[test]
    fn test_playback() {
        let mut draft = PatternDraft::new(2);
        draft.place(0, CharacterId(4));
        draft.place(1, CharacterId(7));
        draft.nominate(1, CharacterId(4));
        draft.nominate(1, CharacterId(7));
        let mut pattern = draft.finish(3).unwrap();

        assert_eq!(pattern.round(), 3);
        assert_eq!(pattern.candidate_for(1), Some(CharacterId(4)));
        assert_eq!(pattern.last_served(), None);

        assert_eq!(pattern.advance(), Some(CharacterId(4)));
        pattern.record_outcome(0, true);
        assert_eq!(pattern.last_served(), Some((0, CharacterId(4))));

        assert_eq!(pattern.advance(), Some(CharacterId(7)));
        assert!(pattern.is_exhausted());
        assert_eq!(pattern.advance(), None);
        assert_eq!(pattern.outcomes(), &[Some(true), None]);
    }

    #[test]
    fn test_top_stage_candidate_key() {
        let mut draft = PatternDraft::new(1);
        draft.place(0, CharacterId(0));
        draft.nominate(TOP_STAGE_KEY, CharacterId(0));
        let pattern = draft.finish(1).unwrap();
        assert_eq!(pattern.candidate_for(9), Some(CharacterId(0)));
    }
}
