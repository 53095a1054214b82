//! The `fitcheck score` command.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use fitcheck_core::model::{Instrument, Stage};
use fitcheck_core::report::AssessmentReport;
use fitcheck_core::session::Session;

use super::output::{new_session, print_summary, resolve, save_report};

/// Answers file: one table per instrument mapping question id to value.
///
/// Likert answers are 1-5; knowledge answers are 0-based option indices.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct AnswersFile {
    #[serde(rename = "trait", default)]
    trait_answers: BTreeMap<String, u8>,
    #[serde(default)]
    knowledge: BTreeMap<String, u8>,
    #[serde(default)]
    readiness: BTreeMap<String, u8>,
}

impl AnswersFile {
    fn section(&self, instrument: Instrument) -> &BTreeMap<String, u8> {
        match instrument {
            Instrument::Trait => &self.trait_answers,
            Instrument::Knowledge => &self.knowledge,
            Instrument::Readiness => &self.readiness,
        }
    }
}

fn load_answers(path: &Path) -> Result<AnswersFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read answers: {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("failed to parse answers: {}", path.display()))
}

/// Drive a session through every stage with the given answers.
fn run_session(session: &mut Session, answers: &AnswersFile) -> Result<()> {
    session.start()?;
    while let Some(instrument) = session.current_stage().instrument() {
        for (id, &value) in answers.section(instrument) {
            anyhow::ensure!(
                session.record_answer(id, value),
                "invalid {instrument} answer: {id} = {value}"
            );
        }
        session.advance()?;
    }
    debug_assert_eq!(session.current_stage(), Stage::Results);
    Ok(())
}

pub fn execute(
    answers_path: PathBuf,
    bank: Option<PathBuf>,
    output: Option<PathBuf>,
    format: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let settings = resolve(bank, output, format, config_path)?;
    let answers = load_answers(&answers_path)?;

    let mut session = new_session(&settings.config)?;
    run_session(&mut session, &answers)?;

    let report = AssessmentReport::from_session(&session)?;
    print_summary(&report);
    save_report(&report, &settings.output, &settings.formats)?;

    Ok(())
}
