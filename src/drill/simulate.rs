//! Automated learner
//!
//! Plays a session for a fixed number of rounds, answering each beat
//! correctly with a fixed probability, and reports where every character
//! ended up.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use super::{random_source, stage_bars};
use crate::catalog::AlphabetProfile;
use crate::scheduler::{RandomSource, SchedulerTuning, Session, SessionSnapshot};

/// Outcome of a simulated run
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub rounds_evaluated: u64,
    pub beats: u64,
    pub correct: u64,
    pub accuracy: f64,
    pub promotions: u64,
    pub demotions: u64,
    pub snapshot: SessionSnapshot,
}

/// Run `rounds` complete rounds with a learner who is right with
/// probability `accuracy`
pub fn simulate(
    profile: &AlphabetProfile,
    tuning: SchedulerTuning,
    rounds: u64,
    accuracy: f64,
    seed: Option<u64>,
) -> Result<SimulationReport> {
    if !(0.0..=1.0).contains(&accuracy) {
        anyhow::bail!("accuracy must be between 0 and 1 (got {})", accuracy);
    }

    let mut session = Session::new(profile, tuning, random_source(seed))
        .context("Failed to start session")?;
    let mut learner: Box<dyn RandomSource> = random_source(seed.map(|s| s.wrapping_add(1)));
    session.initialize_system()?;

    let mut beats = 0u64;
    let mut correct = 0u64;
    let mut promotions = 0u64;
    let mut demotions = 0u64;
    let Some(total_beats) = rounds.checked_mul(session.pattern_length() as u64) else {
        anyhow::bail!("Too many rounds to simulate ({})", rounds);
    };

    // One extra serve rolls the final round over so it gets evaluated
    for beat in 0..=total_beats {
        let round_before = session.round();
        let symbol = session.next_character()?.symbol.clone();

        if session.round() != round_before {
            if let Some(evaluation) = session.last_evaluation() {
                promotions += evaluation.promoted.len() as u64;
                demotions += evaluation.demoted.len() as u64;
            }
        }
        if beat == total_beats {
            break;
        }

        let answer = learner.chance(accuracy);
        session.report_result(&symbol, answer);
        beats += 1;
        if answer {
            correct += 1;
        }
    }

    info!(
        "Simulated {} rounds of {}: {} promotions, {} demotions",
        rounds,
        session.name(),
        promotions,
        demotions
    );

    Ok(SimulationReport {
        rounds_evaluated: rounds,
        beats,
        correct,
        accuracy: if beats == 0 { 0.0 } else { correct as f64 / beats as f64 },
        promotions,
        demotions,
        snapshot: session.snapshot(),
    })
}

/// Print a report as text or JSON
pub fn print_report(report: &SimulationReport, json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(report)
            .context("Failed to serialize report")?;
        println!("{}", out);
        return Ok(());
    }

    println!(
        "{}: {} rounds, {} beats, {:.0}% correct",
        report.snapshot.alphabet,
        report.rounds_evaluated,
        report.beats,
        report.accuracy * 100.0
    );
    println!("  {} promotions, {} demotions", report.promotions, report.demotions);
    println!();
    for line in stage_bars(&report.snapshot.stage_counts) {
        println!("{}", line);
    }

    let mut leaders: Vec<_> = report.snapshot.characters.iter().filter(|c| c.stage > 0).collect();
    leaders.sort_by(|a, b| b.stage.cmp(&a.stage));
    if !leaders.is_empty() {
        println!();
        let line: Vec<String> = leaders
            .iter()
            .take(10)
            .map(|c| format!("{}({})={}", c.symbol, c.romanization, c.stage))
            .collect();
        println!("  furthest along: {}", line.join(" "));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Alphabet, PromotionPolicy};

    #[test]
    fn test_simulation_counts_beats() {
        let profile = AlphabetProfile::for_alphabet(Alphabet::Katakana);
        let report = simulate(&profile, SchedulerTuning::default(), 4, 0.5, Some(3)).unwrap();
        assert_eq!(report.beats, 32);
        assert_eq!(report.snapshot.round, 5);
        assert!(report.correct <= report.beats);
    }

    #[test]
    fn test_hopeless_learner_never_advances() {
        let profile = AlphabetProfile::for_alphabet(Alphabet::Cyrillic);
        let report = simulate(&profile, SchedulerTuning::default(), 5, 0.0, Some(1)).unwrap();
        assert_eq!(report.correct, 0);
        assert_eq!(report.promotions, 0);
        assert_eq!(report.snapshot.stage_counts.get(&1), Some(&2));
        assert!(report.snapshot.characters.iter().all(|c| c.stage <= 1));
    }

    #[test]
    fn test_throttled_promotes_once_per_round() {
        let profile = AlphabetProfile::custom(
            &[("a", "a"), ("b", "b"), ("c", "c"), ("d", "d"), ("e", "e"), ("f", "f")],
            16,
            PromotionPolicy::Throttled,
        );
        let report = simulate(&profile, SchedulerTuning::default(), 6, 1.0, Some(8)).unwrap();
        assert_eq!(report.demotions, 0);
        assert!(report.promotions <= 6);
    }

    #[test]
    fn test_rejects_bad_accuracy() {
        let profile = AlphabetProfile::for_alphabet(Alphabet::Hiragana);
        assert!(simulate(&profile, SchedulerTuning::default(), 1, 1.5, None).is_err());
    }

    #[test]
    fn test_rejects_round_count_overflow() {
        let profile = AlphabetProfile::for_alphabet(Alphabet::Cyrillic);
        let err = simulate(&profile, SchedulerTuning::default(), u64::MAX, 0.5, Some(2))
            .unwrap_err();
        assert!(err.to_string().contains("Too many rounds"));
    }
}
