//! Pattern Builder - assembles the next round from the current stage spread
//!
//! Placement order:
//! 1. stage 1 on downbeats, two distinct characters when possible
//! 2. stage 2 on upbeats, same rule
//! 3. stage 3 cycled through off-beats, or a stage 1/2 mix without stage 3
//! 4. one stage-4 character over one resolved off-beat per bar
//! 5. stage 5+ over any position with a small independent chance
//! 6. gap fill from the previous position (position 0 has its own fallback)
//!
//! A registry holding exactly one stage-1 and one stage-2 character and
//! nothing higher skips all of that and drills the pair in alternation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::layout::BeatLayout;
use super::pattern::{Pattern, PatternDraft, TOP_STAGE_KEY};
use super::random::{choose, RandomSource};
use super::registry::{CharacterId, Registry};
use crate::error::{Result, SchedulerError};

/// Probabilities that shape pattern variation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SchedulerTuning {
    /// Per-position chance that a stage-5+ character takes the beat
    #[serde(default = "default_stage5_override_chance")]
    pub stage5_override_chance: f64,
    /// Chance an off-beat takes a stage-2 rather than a stage-1 character
    /// when there is no stage 3 to cycle
    #[serde(default = "default_offbeat_stage2_weight")]
    pub offbeat_stage2_weight: f64,
}

fn default_stage5_override_chance() -> f64 {
    0.10
}

fn default_offbeat_stage2_weight() -> f64 {
    0.30
}

impl Default for SchedulerTuning {
    fn default() -> Self {
        Self {
            stage5_override_chance: default_stage5_override_chance(),
            offbeat_stage2_weight: default_offbeat_stage2_weight(),
        }
    }
}

impl SchedulerTuning {
    /// Both probabilities must lie in [0, 1]
    pub fn is_valid(&self) -> bool {
        (0.0..=1.0).contains(&self.stage5_override_chance)
            && (0.0..=1.0).contains(&self.offbeat_stage2_weight)
    }
}

/// Characters grouped by stage at the start of a build
#[derive(Debug, Clone, Default)]
struct StagePools {
    stage1: Vec<CharacterId>,
    stage2: Vec<CharacterId>,
    stage3: Vec<CharacterId>,
    stage4: Vec<CharacterId>,
    stage5_plus: Vec<CharacterId>,
}

impl StagePools {
    fn snapshot(registry: &Registry) -> Self {
        Self {
            stage1: registry.pool(1),
            stage2: registry.pool(2),
            stage3: registry.pool(3),
            stage4: registry.pool(4),
            stage5_plus: registry.pool_at_least(5),
        }
    }

    fn is_two_character_drill(&self) -> bool {
        self.stage1.len() == 1
            && self.stage2.len() == 1
            && self.stage3.is_empty()
            && self.stage4.is_empty()
            && self.stage5_plus.is_empty()
    }

    fn log(&self, registry: &Registry) {
        let names = |ids: &[CharacterId]| {
            ids.iter()
                .map(|id| symbol(registry, *id))
                .collect::<Vec<_>>()
                .join(", ")
        };
        debug!("Stage 1 ({}): {}", self.stage1.len(), names(&self.stage1));
        debug!("Stage 2 ({}): {}", self.stage2.len(), names(&self.stage2));
        debug!("Stage 3 ({}): {}", self.stage3.len(), names(&self.stage3));
        debug!("Stage 4 ({}): {}", self.stage4.len(), names(&self.stage4));
        debug!("Stage 5+ ({}): {}", self.stage5_plus.len(), names(&self.stage5_plus));
    }
}

fn symbol(registry: &Registry, id: CharacterId) -> &str {
    registry.get(id).map(|c| c.symbol.as_str()).unwrap_or("?")
}

/// Builds one pattern per round
#[derive(Debug, Clone)]
pub struct PatternBuilder {
    layout: BeatLayout,
    tuning: SchedulerTuning,
}

impl PatternBuilder {
    pub fn new(pattern_length: usize, tuning: SchedulerTuning) -> Result<Self> {
        Ok(Self {
            layout: BeatLayout::new(pattern_length)?,
            tuning,
        })
    }

    pub fn layout(&self) -> &BeatLayout {
        &self.layout
    }

    pub fn tuning(&self) -> &SchedulerTuning {
        &self.tuning
    }

    /// Build the pattern for `round`. Runs the registry's maintenance hooks
    /// first, so this may activate a stage-0 character.
    pub fn build(
        &self,
        registry: &mut Registry,
        rng: &mut dyn RandomSource,
        round: u64,
    ) -> Result<Pattern> {
        if registry.is_empty() {
            return Err(SchedulerError::EmptyCatalog);
        }

        debug!("Generating {}-beat pattern for round {}", self.layout.len(), round);
        registry.ensure_minimum_stage0();
        registry.ensure_minimum_stage1(rng);

        let pools = StagePools::snapshot(registry);
        pools.log(registry);

        let mut draft = PatternDraft::new(self.layout.len());

        if pools.is_two_character_drill() {
            let (first, second) = (pools.stage1[0], pools.stage2[0]);
            debug!(
                "Alternating {} (stage 1) with {} (stage 2)",
                symbol(registry, first),
                symbol(registry, second)
            );
            for position in 0..draft.len() {
                draft.place(position, if position % 2 == 0 { first } else { second });
            }
            draft.nominate(1, first);
            draft.nominate(2, second);
        } else {
            self.place_role(&mut draft, rng, self.layout.downbeats(), &pools.stage1, 1);
            self.place_role(&mut draft, rng, self.layout.upbeats(), &pools.stage2, 2);
            self.place_offbeats(&mut draft, rng, &pools);
            self.override_stage4(&mut draft, rng, &pools);
            self.override_stage5(&mut draft, rng, &pools);
            self.fill_gaps(&mut draft, registry, rng, &pools)?;
        }

        let pattern = draft.finish(round)?;
        for (beat, id) in pattern.positions().iter().enumerate() {
            debug!(
                "Beat {}: {} - stage {}",
                beat,
                symbol(registry, *id),
                registry.stage_of(*id).unwrap_or_default()
            );
        }
        Ok(pattern)
    }

    /// Rules 1 and 2: one character per alternating group of a role
    fn place_role(
        &self,
        draft: &mut PatternDraft,
        rng: &mut dyn RandomSource,
        positions: &[usize],
        pool: &[CharacterId],
        stage: u32,
    ) {
        if positions.is_empty() {
            return;
        }
        let Some(&first) = choose(rng, pool) else {
            return;
        };
        let second = if pool.len() > 1 {
            let rest: Vec<CharacterId> = pool.iter().copied().filter(|&id| id != first).collect();
            choose(rng, &rest).copied().unwrap_or(first)
        } else {
            first
        };

        let (group_a, group_b) = BeatLayout::groups(positions);
        for position in group_a {
            draft.place(position, first);
        }
        for position in group_b {
            draft.place(position, second);
        }
        draft.nominate(stage, first);
        debug!("Stage {} placed on {:?}", stage, positions);
    }

    /// Rule 3: cycle stage 3 through the off-beats, or mix stages 1 and 2
    fn place_offbeats(
        &self,
        draft: &mut PatternDraft,
        rng: &mut dyn RandomSource,
        pools: &StagePools,
    ) {
        let offbeats = self.layout.offbeats();

        if pools.stage3.is_empty() {
            debug!("No stage 3 characters; mixing stages 1 and 2 into off-beats");
            for &position in offbeats {
                let use_stage2 = !pools.stage2.is_empty()
                    && (pools.stage1.is_empty() || rng.chance(self.tuning.offbeat_stage2_weight));
                let pool = if use_stage2 { &pools.stage2 } else { &pools.stage1 };
                if let Some(&id) = choose(rng, pool) {
                    draft.place(position, id);
                }
            }
            return;
        }

        let mut working = pools.stage3.clone();
        let mut previous: Option<CharacterId> = None;
        for &position in offbeats {
            if working.is_empty() {
                working = pools
                    .stage3
                    .iter()
                    .copied()
                    .filter(|&id| pools.stage3.len() == 1 || Some(id) != previous)
                    .collect();
                debug!("Reusing stage 3 characters for remaining off-beats");
            }
            let index = rng.pick(working.len()).min(working.len() - 1);
            let id = working.remove(index);
            draft.place(position, id);
            draft.nominate(3, id);
            previous = Some(id);
        }
    }

    /// Rule 4: one stage-4 character over one resolved off-beat per bar
    fn override_stage4(
        &self,
        draft: &mut PatternDraft,
        rng: &mut dyn RandomSource,
        pools: &StagePools,
    ) {
        let Some(&chosen) = choose(rng, &pools.stage4) else {
            return;
        };

        let mut placed = false;
        for bar in self.layout.offbeats_by_bar() {
            let resolved: Vec<usize> = bar
                .into_iter()
                .filter(|&position| draft.slot(position).is_resolved())
                .collect();
            if let Some(&position) = choose(rng, &resolved) {
                draft.place(position, chosen);
                placed = true;
                debug!("Beat {}: stage 4 override", position);
            }
        }
        if placed {
            draft.nominate(4, chosen);
        }
    }

    /// Rule 5: independent per-position chance of a stage-5+ character
    fn override_stage5(
        &self,
        draft: &mut PatternDraft,
        rng: &mut dyn RandomSource,
        pools: &StagePools,
    ) {
        if pools.stage5_plus.is_empty() {
            return;
        }
        for position in 0..draft.len() {
            if !rng.chance(self.tuning.stage5_override_chance) {
                continue;
            }
            if let Some(&id) = choose(rng, &pools.stage5_plus) {
                draft.place(position, id);
                draft.nominate(TOP_STAGE_KEY, id);
                debug!("Beat {}: stage 5+ override", position);
            }
        }
    }

    /// Rule 6: extend the previous position; position 0 falls back to
    /// stage 1, then stage 0, then anything in the catalog
    fn fill_gaps(
        &self,
        draft: &mut PatternDraft,
        registry: &Registry,
        rng: &mut dyn RandomSource,
        pools: &StagePools,
    ) -> Result<()> {
        for position in 0..draft.len() {
            if draft.slot(position).is_resolved() {
                continue;
            }

            let id = if position == 0 {
                let fallback = draft
                    .candidates()
                    .get(&1)
                    .copied()
                    .or_else(|| choose(rng, &pools.stage1).copied())
                    .or_else(|| choose(rng, &registry.pool(0)).copied())
                    .or_else(|| choose(rng, &registry.ids()).copied());
                fallback.ok_or(SchedulerError::EmptyCatalog)?
            } else {
                draft
                    .slot(position - 1)
                    .resolved()
                    .ok_or(SchedulerError::UnresolvedPosition(position - 1))?
            };

            debug!("Beat {}: gap filled with {}", position, symbol(registry, id));
            draft.place(position, id);
        }
        Ok(())
    }
}
