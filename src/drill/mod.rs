//! Terminal front ends for the scheduler
//!
//! - `interactive`: a line-based drill where the learner types answers
//! - `simulate`: an automated learner for exercising the scheduler

pub mod interactive;
pub mod simulate;

pub use interactive::run_drill;
pub use simulate::{print_report, simulate, SimulationReport};

use crate::scheduler::{RandomSource, SeededRandom, ThreadRandom};

/// Seeded source when a seed is given, thread RNG otherwise
pub fn random_source(seed: Option<u64>) -> Box<dyn RandomSource> {
    match seed {
        Some(seed) => Box::new(SeededRandom::new(seed)),
        None => Box::new(ThreadRandom),
    }
}

/// One-line bar chart of characters per stage
pub fn stage_bars(counts: &std::collections::BTreeMap<u32, usize>) -> Vec<String> {
    counts
        .iter()
        .map(|(stage, count)| {
            format!("  stage {:>2} │ {:<3} {}", stage, count, "█".repeat(*count))
        })
        .collect()
}
