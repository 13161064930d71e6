//! Interactive terminal drill
//!
//! Serves one character per prompt and judges the typed romanization.
//! Lines starting with ':' are commands and do not use up the beat.

use anyhow::{Context, Result};
use rustyline::error::ReadlineError;
use std::time::Instant;

use super::{random_source, stage_bars};
use crate::config::Config;
use crate::scheduler::Session;
use crate::types::Alphabet;

/// Running totals for the current drill
#[derive(Debug, Default, Clone, Copy)]
struct DrillStats {
    answered: u32,
    correct: u32,
    streak: u32,
    best_streak: u32,
}

impl DrillStats {
    fn record(&mut self, correct: bool) {
        self.answered += 1;
        if correct {
            self.correct += 1;
            self.streak += 1;
            self.best_streak = self.best_streak.max(self.streak);
        } else {
            self.streak = 0;
        }
    }

    fn accuracy(&self) -> f64 {
        if self.answered == 0 {
            0.0
        } else {
            self.correct as f64 / self.answered as f64 * 100.0
        }
    }
}

/// Start an interactive drill
pub fn run_drill(config: &Config, alphabet: Option<Alphabet>, seed: Option<u64>) -> Result<()> {
    let profile = config.profile(alphabet);
    let mut session = Session::new(&profile, config.scheduler, random_source(seed))
        .context("Failed to start session")?;
    session.initialize_system().context("Failed to build first pattern")?;

    println!(
        "Tempo - {} ({} beats per round, {} ms per beat)",
        session.name(),
        session.pattern_length(),
        session.beat_duration().as_millis()
    );
    println!("Type the romanization of each character. :stats for progress, :quit to stop.");
    println!();

    let mut rl = rustyline::DefaultEditor::new()
        .map_err(|e| anyhow::anyhow!("Failed to initialize line editor: {}", e))?;
    let mut stats = DrillStats::default();

    'beats: loop {
        let round_before = session.round();
        let (symbol, hint) = {
            let character = session.next_character()?;
            let hint = (config.drill.show_hints && character.needs_hint())
                .then(|| character.romanization.clone());
            (character.symbol.clone(), hint)
        };

        if session.round() != round_before {
            print_round_summary(&session);
        }

        match &hint {
            Some(romanization) => println!("  {}   ({})", symbol, romanization),
            None => println!("  {}", symbol),
        }

        let served_at = Instant::now();
        loop {
            let line = match rl.readline("❯ ") {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break 'beats,
                Err(e) => anyhow::bail!("Failed to read answer: {}", e),
            };
            let input = line.trim();

            match input {
                ":quit" | ":q" => break 'beats,
                ":stats" => {
                    print_stats(&session, &stats);
                    continue;
                }
                _ if input.starts_with(':') => {
                    println!("Unknown command {}", input);
                    continue;
                }
                _ => {}
            }

            let late = config.drill.enforce_tempo && served_at.elapsed() > session.beat_duration();
            let correct = if late {
                session.report_result(&symbol, false);
                false
            } else {
                session.answer(input)?
            };
            stats.record(correct);

            let romanization = session
                .last_served()
                .map(|c| c.romanization.clone())
                .unwrap_or_default();
            if late {
                println!("  ✗ too slow - {}", romanization);
            } else if correct {
                println!("  ✓");
            } else {
                println!("  ✗ {}", romanization);
            }
            break;
        }
    }

    println!();
    print_stats(&session, &stats);
    Ok(())
}

fn print_round_summary(session: &Session) {
    let Some(evaluation) = session.last_evaluation() else {
        return;
    };
    let names = |ids: &[crate::scheduler::CharacterId]| {
        ids.iter()
            .filter_map(|id| session.registry().get(*id))
            .map(|c| c.symbol.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    };

    println!();
    println!("── round {} complete ──", evaluation.round);
    if !evaluation.promoted.is_empty() {
        println!("  up:   {}", names(&evaluation.promoted));
    }
    if !evaluation.demoted.is_empty() {
        println!("  down: {}", names(&evaluation.demoted));
    }
    println!();
}

fn print_stats(session: &Session, stats: &DrillStats) {
    println!(
        "Round {} · {} answered · {:.0}% correct · best streak {}",
        session.round(),
        stats.answered,
        stats.accuracy(),
        stats.best_streak
    );
    for line in stage_bars(&session.registry().stage_counts()) {
        println!("{}", line);
    }
}
