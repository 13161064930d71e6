//! Tempo - rhythm-paced alphabet trainer
//!
//! Drills hiragana, katakana and Cyrillic one beat at a time.

use tempo::cli;

fn main() -> anyhow::Result<()> {
    cli::run()
}
