//! Configuration management
//!
//! Manages trainer configuration: which alphabet to drill, scheduler tuning
//! and drill presentation settings.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::catalog::AlphabetProfile;
use crate::scheduler::SchedulerTuning;
use crate::types::{Alphabet, PromotionPolicy};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Session defaults
    #[serde(default)]
    pub session: SessionConfig,
    /// Pattern variation probabilities
    #[serde(default)]
    pub scheduler: SchedulerTuning,
    /// Terminal drill settings
    #[serde(default)]
    pub drill: DrillConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Alphabet drilled when none is given on the command line
    #[serde(default = "default_alphabet")]
    pub alphabet: Alphabet,
    /// Override the alphabet's beats per pattern
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_length: Option<usize>,
    /// Override the alphabet's promotion policy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<PromotionPolicy>,
}

fn default_alphabet() -> Alphabet {
    Alphabet::Hiragana
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            alphabet: default_alphabet(),
            pattern_length: None,
            promotion: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrillConfig {
    /// Show the romanization for stage-1 characters missed last time
    #[serde(default = "default_true")]
    pub show_hints: bool,
    /// Count answers slower than the alphabet's beat as misses
    #[serde(default)]
    pub enforce_tempo: bool,
}

fn default_true() -> bool {
    true
}

impl Default for DrillConfig {
    fn default() -> Self {
        Self {
            show_hints: true,
            enforce_tempo: false,
        }
    }
}

impl Config {
    /// Load configuration from the default location, writing defaults if missing
    pub fn load() -> Result<Self> {
        let config_path = config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path()?)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let parent = path.parent()
            .context("Config path has no parent")?;

        std::fs::create_dir_all(parent)
            .context("Failed to create config directory")?;

        let contents = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        std::fs::write(path, contents)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Reject settings the scheduler cannot run with
    pub fn validate(&self) -> Result<()> {
        if !self.scheduler.is_valid() {
            anyhow::bail!(
                "Scheduler probabilities must be between 0 and 1 \
                 (stage5_override_chance = {}, offbeat_stage2_weight = {})",
                self.scheduler.stage5_override_chance,
                self.scheduler.offbeat_stage2_weight
            );
        }
        if let Some(length) = self.session.pattern_length {
            if length < 2 || length % 2 != 0 {
                anyhow::bail!(
                    "pattern_length must be an even number of beats, at least 2 (got {})",
                    length
                );
            }
        }
        Ok(())
    }

    /// Profile for `alphabet` (or the configured one) with overrides applied
    pub fn profile(&self, alphabet: Option<Alphabet>) -> AlphabetProfile {
        let mut profile = AlphabetProfile::for_alphabet(alphabet.unwrap_or(self.session.alphabet));
        if let Some(length) = self.session.pattern_length {
            profile = profile.with_pattern_length(length);
        }
        if let Some(promotion) = self.session.promotion {
            profile = profile.with_promotion(promotion);
        }
        profile
    }
}

/// Get the configuration file path
pub fn config_path() -> Result<PathBuf> {
    let base = directories::ProjectDirs::from("com", "tempo", "tempo")
        .context("Failed to get project directories")?;
    Ok(base.config_dir().join("config.toml"))
}

/// Show current configuration
pub fn show_config() -> Result<()> {
    let config = Config::load()?;
    let profile = config.profile(None);

    println!("Tempo configuration ({})", config_path()?.display());
    println!();
    println!("  alphabet:               {}", config.session.alphabet);
    println!("  pattern length:         {} beats", profile.pattern_length);
    println!("  promotion policy:       {}", profile.promotion);
    println!("  stage 5+ override:      {:.0}%", config.scheduler.stage5_override_chance * 100.0);
    println!("  off-beat stage 2 share: {:.0}%", config.scheduler.offbeat_stage2_weight * 100.0);
    println!("  hints:                  {}", if config.drill.show_hints { "on" } else { "off" });
    println!("  enforce tempo:          {}", if config.drill.enforce_tempo { "on" } else { "off" });

    Ok(())
}

/// Set the default alphabet
pub fn set_alphabet(name: &str) -> Result<()> {
    let alphabet: Alphabet = name.parse()?;
    let mut config = Config::load()?;
    config.session.alphabet = alphabet;
    config.save()?;
    println!("Default alphabet set to {}", alphabet);
    Ok(())
}

/// Reset configuration to defaults
pub fn reset_config() -> Result<()> {
    let config = Config::default();
    config.save()?;
    println!("Configuration reset to defaults.");
    Ok(())
}

/// Get default configuration as TOML string
pub fn default_config_toml() -> String {
    let config = Config::default();
    toml::to_string_pretty(&config).unwrap_or_else(|_| "# Default configuration\n".to_string())
}
