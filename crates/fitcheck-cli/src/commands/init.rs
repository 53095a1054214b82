//! The `fitcheck init` command.

use std::fmt::Write as _;

use anyhow::Result;

use fitcheck_core::bank::{reference, QuestionBank};
use fitcheck_core::model::Instrument;

pub fn execute() -> Result<()> {
    // Create fitcheck.toml
    if std::path::Path::new("fitcheck.toml").exists() {
        println!("fitcheck.toml already exists, skipping.");
    } else {
        std::fs::write("fitcheck.toml", SAMPLE_CONFIG)?;
        println!("Created fitcheck.toml");
    }

    // Create example answers file
    let example_path = std::path::Path::new("answers.example.toml");
    if example_path.exists() {
        println!("answers.example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, example_answers(reference()))?;
        println!("Created answers.example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: fitcheck take");
    println!("  2. Or edit answers.example.toml and run: fitcheck score --answers answers.example.toml");
    println!("  3. Compare retakes: fitcheck compare --baseline OLD.json --current NEW.json");

    Ok(())
}

/// An answers file covering every question of `bank`.
///
/// Likert questions are answered "Agree" (4); knowledge questions pick the
/// first option.
fn example_answers(bank: &QuestionBank) -> String {
    let mut s = String::from(
        "# fitcheck answers\n\
         # Likert statements: 1 Strongly Disagree .. 5 Strongly Agree\n\
         # Knowledge questions: 0-based index of the chosen option\n",
    );
    for instrument in Instrument::ALL {
        let _ = write!(s, "\n[{instrument}]\n");
        for q in bank.questions(instrument) {
            let value = if instrument.is_likert() { 4 } else { 0 };
            let _ = writeln!(s, "{} = {value}", q.id);
        }
    }
    s
}

const SAMPLE_CONFIG: &str = r#"# fitcheck configuration

# Custom question bank (default: built-in blockchain bank)
# bank = "banks/custom.toml"

output_dir = "./fitcheck-results"
# json, html, markdown, or all
format = "json"

# Progress shown when each stage is entered
[progress]
intro = 20
trait = 25
knowledge = 50
readiness = 75
results = 100

# Final score thresholds; instruments at or above strength_at are named strengths
[policy]
proceed_at = 75
conditional_at = 55
strength_at = 70
"#;
