//! Evaluator - scores a completed pattern and moves characters between stages
//!
//! Any character with a miss in the round is demoted. Promotion depends on
//! the policy: `Unrestricted` promotes every perfect character, `Throttled`
//! promotes at most one so the active set grows slowly.

use serde::Serialize;
use tracing::{debug, info};

use super::pattern::{Pattern, TOP_STAGE_KEY};
use super::registry::{CharacterId, Registry};
use crate::types::PromotionPolicy;

/// Highest stage the throttled policy treats individually
const THROTTLED_STAGE_CEILING: u32 = 4;

/// One character's record across a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub character: CharacterId,
    /// Stage when the round was scored, before any change
    pub stage: u32,
    pub occurrences: u32,
    pub correct: u32,
}

impl Tally {
    pub fn is_perfect(&self) -> bool {
        self.correct == self.occurrences
    }
}

/// What an evaluation pass did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    pub round: u64,
    pub tallies: Vec<Tally>,
    pub promoted: Vec<CharacterId>,
    pub demoted: Vec<CharacterId>,
}

impl Evaluation {
    pub fn tally_for(&self, id: CharacterId) -> Option<&Tally> {
        self.tallies.iter().find(|t| t.character == id)
    }
}

/// Applies a promotion policy to completed patterns
#[derive(Debug, Clone, Copy)]
pub struct Evaluator {
    policy: PromotionPolicy,
}

impl Evaluator {
    pub fn new(policy: PromotionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> PromotionPolicy {
        self.policy
    }

    /// Per-character accuracy in order of first appearance. A position
    /// without a recorded answer falls back to the character's last result.
    pub fn tally(pattern: &Pattern, registry: &Registry) -> Vec<Tally> {
        let mut tallies: Vec<Tally> = Vec::new();

        for (position, &id) in pattern.positions().iter().enumerate() {
            let Some(character) = registry.get(id) else {
                continue;
            };
            let correct = pattern
                .outcomes()
                .get(position)
                .copied()
                .flatten()
                .unwrap_or(character.last_correct);

            let index = match tallies.iter().position(|t| t.character == id) {
                Some(index) => index,
                None => {
                    tallies.push(Tally {
                        character: id,
                        stage: character.stage,
                        occurrences: 0,
                        correct: 0,
                    });
                    tallies.len() - 1
                }
            };
            tallies[index].occurrences += 1;
            if correct {
                tallies[index].correct += 1;
            }
        }

        tallies
    }

    /// Score `pattern` and apply promotions and demotions to `registry`
    pub fn evaluate(&self, pattern: &Pattern, registry: &mut Registry) -> Evaluation {
        let tallies = Self::tally(pattern, registry);
        debug!(
            "Evaluating round {}: {} distinct characters",
            pattern.round(),
            tallies.len()
        );
        for tally in &tallies {
            debug!(
                "{} - stage {} - correct {}/{}",
                registry.get(tally.character).map(|c| c.symbol.as_str()).unwrap_or("?"),
                tally.stage,
                tally.correct,
                tally.occurrences
            );
        }

        let demoted: Vec<CharacterId> = tallies
            .iter()
            .filter(|t| !t.is_perfect())
            .map(|t| t.character)
            .collect();

        let promoted: Vec<CharacterId> = match self.policy {
            PromotionPolicy::Unrestricted => {
                let promoted: Vec<CharacterId> = tallies
                    .iter()
                    .filter(|t| t.is_perfect())
                    .map(|t| t.character)
                    .collect();
                for &id in &promoted {
                    registry.promote(id);
                }
                for &id in &demoted {
                    registry.demote(id);
                }
                promoted
            }
            PromotionPolicy::Throttled => {
                for &id in &demoted {
                    registry.demote(id);
                }
                let promoted: Vec<CharacterId> =
                    select_throttled(pattern, registry, &tallies).into_iter().collect();
                for &id in &promoted {
                    registry.promote(id);
                }
                promoted
            }
        };

        info!(
            "Round {} evaluated: {} promoted, {} demoted",
            pattern.round(),
            promoted.len(),
            demoted.len()
        );
        registry.log_stages();

        Evaluation {
            round: pattern.round(),
            tallies,
            promoted,
            demoted,
        }
    }
}

/// Pick the single character to promote under the throttled policy.
/// Called after demotions, so stage counts reflect them.
fn select_throttled(
    pattern: &Pattern,
    registry: &Registry,
    tallies: &[Tally],
) -> Option<CharacterId> {
    let perfect_where = |keep: &dyn Fn(u32) -> bool| -> Vec<CharacterId> {
        tallies
            .iter()
            .filter(|t| t.is_perfect() && keep(t.stage))
            .map(|t| t.character)
            .collect()
    };

    // Stage 5 and above first
    let top = perfect_where(&|stage| stage >= TOP_STAGE_KEY);
    if let Some(id) = prefer_candidate(pattern, TOP_STAGE_KEY, &top) {
        debug!("Promoting a stage 5+ character");
        return Some(id);
    }

    // Lowest crowded stage with a perfect character
    let counts = registry.stage_counts();
    for stage in 1..=THROTTLED_STAGE_CEILING {
        if counts.get(&stage).copied().unwrap_or(0) > 1 {
            let perfect = perfect_where(&|s| s == stage);
            if let Some(id) = prefer_candidate(pattern, stage, &perfect) {
                debug!("Promoting from crowded stage {}", stage);
                return Some(id);
            }
        }
    }

    // Any perfect character in stages 1-4, lowest first
    for stage in 1..=THROTTLED_STAGE_CEILING {
        let perfect = perfect_where(&|s| s == stage);
        if let Some(id) = prefer_candidate(pattern, stage, &perfect) {
            debug!("Promoting from stage {}", stage);
            return Some(id);
        }
    }

    None
}

/// The stage's promotion candidate if it is eligible, else the first eligible
fn prefer_candidate(
    pattern: &Pattern,
    stage: u32,
    eligible: &[CharacterId],
) -> Option<CharacterId> {
    pattern
        .candidate_for(stage)
        .filter(|candidate| eligible.contains(candidate))
        .or_else(|| eligible.first().copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::pattern::PatternDraft;

    fn registry_with_stages(stages: &[u32]) -> Registry {
        let entries = (0..stages.len()).map(|i| (format!("c{}", i), format!("r{}", i)));
        let mut registry = Registry::from_entries(entries);
        for (index, &stage) in stages.iter().enumerate() {
            for _ in 0..stage {
                registry.promote(CharacterId(index));
            }
        }
        registry
    }

    /// Pattern over the given ids, every position answered with `outcomes`
    fn played(ids: &[usize], outcomes: &[bool], candidates: &[(u32, usize)]) -> Pattern {
        let mut draft = PatternDraft::new(ids.len());
        for (position, &id) in ids.iter().enumerate() {
            draft.place(position, CharacterId(id));
        }
        for &(stage, id) in candidates {
            draft.nominate(stage, CharacterId(id));
        }
        let mut pattern = draft.finish(1).unwrap();
        for (position, &correct) in outcomes.iter().enumerate() {
            pattern.advance();
            pattern.record_outcome(position, correct);
        }
        pattern
    }

    #[test]
    fn test_tally_counts_per_position() {
        let registry = registry_with_stages(&[1, 2]);
        let pattern = played(&[0, 1, 0, 1], &[true, true, false, true], &[]);
        let tallies = Evaluator::tally(&pattern, &registry);
        assert_eq!(tallies.len(), 2);
        assert_eq!((tallies[0].occurrences, tallies[0].correct), (2, 1));
        assert_eq!((tallies[1].occurrences, tallies[1].correct), (2, 2));
    }

    #[test]
    fn test_tally_falls_back_to_last_result() {
        let mut registry = registry_with_stages(&[1]);
        registry.record_result("c0", true);
        let pattern = played(&[0, 0], &[false], &[]);
        let tallies = Evaluator::tally(&pattern, &registry);
        assert_eq!((tallies[0].occurrences, tallies[0].correct), (2, 1));
    }

    #[test]
    fn test_unrestricted_promotes_and_demotes() {
        let mut registry = registry_with_stages(&[1, 2, 3]);
        let pattern = played(&[0, 1, 2, 1], &[true, true, false, true], &[]);
        let evaluation =
            Evaluator::new(PromotionPolicy::Unrestricted).evaluate(&pattern, &mut registry);

        assert_eq!(evaluation.promoted, vec![CharacterId(0), CharacterId(1)]);
        assert_eq!(evaluation.demoted, vec![CharacterId(2)]);
        assert_eq!(registry.stage_of(CharacterId(0)), Some(2));
        assert_eq!(registry.stage_of(CharacterId(1)), Some(3));
        assert_eq!(registry.stage_of(CharacterId(2)), Some(2));
    }

    #[test]
    fn test_throttled_promotes_at_most_one() {
        let mut registry = registry_with_stages(&[1, 2, 3, 6]);
        let pattern = played(&[0, 1, 2, 3], &[true; 4], &[]);
        let evaluation =
            Evaluator::new(PromotionPolicy::Throttled).evaluate(&pattern, &mut registry);

        assert_eq!(evaluation.promoted, vec![CharacterId(3)], "stage 5+ goes first");
        assert_eq!(registry.stage_of(CharacterId(3)), Some(7));
        assert_eq!(registry.stage_of(CharacterId(0)), Some(1));
        assert_eq!(registry.stage_of(CharacterId(1)), Some(2));
    }

    #[test]
    fn test_throttled_prefers_lowest_crowded_stage() {
        // stage 1: c0 only; stage 2: c1, c2 (crowded)
        let mut registry = registry_with_stages(&[1, 2, 2]);
        let pattern = played(&[0, 1, 2, 1], &[true; 4], &[]);
        let evaluation =
            Evaluator::new(PromotionPolicy::Throttled).evaluate(&pattern, &mut registry);
        assert_eq!(evaluation.promoted, vec![CharacterId(1)]);
        assert_eq!(registry.stage_of(CharacterId(0)), Some(1));
    }

    #[test]
    fn test_throttled_candidate_wins_within_stage() {
        let mut registry = registry_with_stages(&[2, 2]);
        let pattern = played(&[0, 1], &[true, true], &[(2, 1)]);
        let evaluation =
            Evaluator::new(PromotionPolicy::Throttled).evaluate(&pattern, &mut registry);
        assert_eq!(evaluation.promoted, vec![CharacterId(1)]);
    }

    #[test]
    fn test_throttled_counts_after_demotion() {
        // c1 misses and drops from 2 to 1, crowding stage 1 next to c0
        let mut registry = registry_with_stages(&[1, 2, 3]);
        let pattern = played(&[0, 1, 2], &[true, false, true], &[]);
        let evaluation =
            Evaluator::new(PromotionPolicy::Throttled).evaluate(&pattern, &mut registry);

        assert_eq!(evaluation.demoted, vec![CharacterId(1)]);
        assert_eq!(evaluation.promoted, vec![CharacterId(0)]);
        assert_eq!(registry.stage_of(CharacterId(0)), Some(2));
        assert_eq!(registry.stage_of(CharacterId(1)), Some(1));
        assert_eq!(registry.stage_of(CharacterId(2)), Some(3));
    }

    #[test]
    fn test_throttled_falls_back_to_any_stage() {
        let mut registry = registry_with_stages(&[1, 3]);
        let pattern = played(&[0, 1], &[false, true], &[]);
        let evaluation =
            Evaluator::new(PromotionPolicy::Throttled).evaluate(&pattern, &mut registry);
        assert_eq!(evaluation.promoted, vec![CharacterId(1)]);
        assert_eq!(registry.stage_of(CharacterId(1)), Some(4));
    }

    #[test]
    fn test_all_wrong_demotes_everything() {
        let registry = registry_with_stages(&[1, 2]);
        let pattern = played(&[0, 1, 0, 1], &[false; 4], &[]);
        for policy in [PromotionPolicy::Unrestricted, PromotionPolicy::Throttled] {
            let mut registry = registry.clone();
            let evaluation = Evaluator::new(policy).evaluate(&pattern, &mut registry);
            assert!(evaluation.promoted.is_empty());
            assert_eq!(registry.stage_of(CharacterId(0)), Some(1));
            assert_eq!(registry.stage_of(CharacterId(1)), Some(1));
        }
    }
}
