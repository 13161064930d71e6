//! CLI interface for tempo

use clap::{Parser, Subcommand};
use anyhow::Result;

use crate::catalog::AlphabetProfile;
use crate::config::{self, Config};
use crate::drill;
use crate::types::Alphabet;

#[derive(Parser)]
#[command(name = "tempo")]
#[command(about = "Rhythm-paced alphabet trainer with adaptive staging", long_about = None)]
#[command(version)]
struct Cli {
    /// Print scheduler decisions (same as RUST_LOG=tempo=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive drill (default when no command given)
    Drill {
        /// Alphabet to drill (hiragana, katakana, cyrillic)
        #[arg(short, long)]
        alphabet: Option<Alphabet>,
        /// Seed the pattern generator for a reproducible drill
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Run an automated learner and report the resulting stages
    Simulate {
        /// Alphabet to simulate
        #[arg(short, long)]
        alphabet: Option<Alphabet>,
        /// Number of rounds to play
        #[arg(short, long, default_value = "20")]
        rounds: u64,
        /// Probability that the learner answers correctly
        #[arg(long, default_value = "0.9")]
        accuracy: f64,
        /// Seed for both the scheduler and the learner
        #[arg(long)]
        seed: Option<u64>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the characters of an alphabet
    Catalog {
        /// Alphabet to list (all when omitted)
        #[arg(short, long)]
        alphabet: Option<Alphabet>,
    },
    /// Configure the trainer
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
        /// Reset configuration to defaults
        #[arg(long)]
        reset: bool,
        /// Print the configuration file path
        #[arg(long)]
        path: bool,
        /// Set the default alphabet
        #[arg(long)]
        set_alphabet: Option<String>,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run_with(cli)
}

/// Initialize logging (WARN level by default, use RUST_LOG=info for more)
fn init_logging(verbose: bool) {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(level.into())
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run_with(cli: Cli) -> Result<()> {
    match cli.command {
        None => {
            let config = Config::load()?;
            drill::run_drill(&config, None, None)
        }
        Some(Commands::Drill { alphabet, seed }) => {
            let config = Config::load()?;
            drill::run_drill(&config, alphabet, seed)
        }
        Some(Commands::Simulate { alphabet, rounds, accuracy, seed, json }) => {
            let config = Config::load()?;
            let profile = config.profile(alphabet);
            let report = drill::simulate(&profile, config.scheduler, rounds, accuracy, seed)?;
            drill::print_report(&report, json)
        }
        Some(Commands::Catalog { alphabet }) => {
            let alphabets = match alphabet {
                Some(alphabet) => vec![alphabet],
                None => Alphabet::all().to_vec(),
            };
            for alphabet in alphabets {
                print_catalog(&AlphabetProfile::for_alphabet(alphabet));
            }
            Ok(())
        }
        Some(Commands::Config { show, reset, path, set_alphabet }) => {
            if reset {
                config::reset_config()?;
            }
            if let Some(name) = set_alphabet {
                config::set_alphabet(&name)?;
            }
            if path {
                println!("{}", config::config_path()?.display());
            }
            if show || (!reset && !path) {
                config::show_config()?;
            }
            Ok(())
        }
    }
}

fn print_catalog(profile: &AlphabetProfile) {
    println!(
        "{} ({} characters, {} beats per round, {} promotion)",
        profile.name(),
        profile.entries.len(),
        profile.pattern_length,
        profile.promotion
    );
    for row in profile.entries.chunks(5) {
        let cells: Vec<String> = row
            .iter()
            .map(|(symbol, romanization)| format!("{} {:<5}", symbol, romanization))
            .collect();
        println!("  {}", cells.join(" "));
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_simulate() {
        let cli = Cli::try_parse_from([
            "tempo", "simulate", "--alphabet", "russian", "--rounds", "5", "--seed", "7", "--json",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Simulate { alphabet, rounds, accuracy, seed, json }) => {
                assert_eq!(alphabet, Some(Alphabet::Cyrillic));
                assert_eq!(rounds, 5);
                assert_eq!(accuracy, 0.9);
                assert_eq!(seed, Some(7));
                assert!(json);
            }
            _ => panic!("expected simulate"),
        }
    }

    #[test]
    fn test_unknown_alphabet_rejected() {
        assert!(Cli::try_parse_from(["tempo", "drill", "--alphabet", "greek"]).is_err());
    }
}
