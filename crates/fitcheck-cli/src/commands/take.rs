//! The `fitcheck take` command: an interactive session on stdin/stdout.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;

use fitcheck_core::model::{likert_label, Question, Stage, LIKERT_MAX};
use fitcheck_core::report::AssessmentReport;
use fitcheck_core::session::Session;

use super::output::{new_session, print_summary, resolve, save_report};

/// One line of respondent input.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    /// A 1-based choice.
    Choice(u8),
    /// Empty line: keep the current answer and move on.
    Continue,
    Back,
    Restart,
    Quit,
    Explain,
    Unknown,
}

fn parse_input(line: &str) -> Input {
    match line.trim().to_lowercase().as_str() {
        "" => Input::Continue,
        "b" | "back" => Input::Back,
        "r" | "restart" => Input::Restart,
        "q" | "quit" => Input::Quit,
        "e" | "explain" => Input::Explain,
        other => other.parse().map_or(Input::Unknown, Input::Choice),
    }
}

pub fn execute(
    bank: Option<PathBuf>,
    output: Option<PathBuf>,
    format: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let settings = resolve(bank, output, format, config_path)?;
    let mut session = new_session(&settings.config)?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    if !run_interactive(&mut session, stdin.lock(), &mut stdout)? {
        tracing::info!(
            stage = %session.current_stage(),
            answered = session.answers().len(),
            "assessment abandoned"
        );
        println!("Assessment abandoned.");
        return Ok(());
    }

    let report = AssessmentReport::from_session(&session)?;
    print_summary(&report);
    save_report(&report, &settings.output, &settings.formats)?;

    Ok(())
}

/// Run the question loop until Results is reached (`true`) or the
/// respondent quits (`false`).
fn run_interactive<R: BufRead, W: Write>(session: &mut Session, mut input: R, out: &mut W) -> Result<bool> {
    let mut line = String::new();

    loop {
        match session.current_stage() {
            Stage::Results => return Ok(true),
            Stage::Intro => show_intro(session, out)?,
            _ => show_question(session, out)?,
        }
        write!(out, "> ")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            anyhow::bail!("input ended before the assessment was complete");
        }

        match parse_input(&line) {
            Input::Quit => return Ok(false),
            Input::Restart => {
                session.restart();
                writeln!(out, "Assessment restarted.")?;
            }
            Input::Back => {
                if session.previous_question().is_err()
                    && session.go_back_to_last_question().is_err()
                {
                    writeln!(out, "Already at the beginning.")?;
                }
            }
            _ if session.current_stage() == Stage::Intro => {
                session.start()?;
            }
            Input::Choice(n) => {
                let value = match session.current_question() {
                    Some(q) if q.instrument().is_likert() => Some(n),
                    Some(_) => n.checked_sub(1),
                    None => None,
                };
                if value.is_some_and(|v| session.answer_current(v)) {
                    move_on(session, out)?;
                } else {
                    writeln!(out, "Please enter one of the listed numbers.")?;
                }
            }
            Input::Continue => {
                let answered = session
                    .current_question()
                    .is_some_and(|q| session.answers().contains(q.instrument(), &q.id));
                if answered {
                    move_on(session, out)?;
                } else {
                    writeln!(out, "Please answer this question first.")?;
                }
            }
            Input::Explain => show_feedback(session, out)?,
            Input::Unknown => {
                writeln!(out, "Unrecognized input. Enter a number, or b, r, e, q.")?;
            }
        }
    }
}

/// Advance the cursor, or complete the stage after its last question.
fn move_on<W: Write>(session: &mut Session, out: &mut W) -> Result<()> {
    if !session.is_last_question() {
        session.next_question()?;
        return Ok(());
    }
    if !session.is_stage_complete() {
        writeln!(out, "Some questions in this section are still unanswered.")?;
        return Ok(());
    }
    let score = session.complete_stage()?;
    writeln!(
        out,
        "\n{} complete: {}%\n",
        score.instrument.title(),
        score.overall
    )?;
    Ok(())
}

fn show_intro<W: Write>(session: &Session, out: &mut W) -> Result<()> {
    let bank = session.bank();
    writeln!(out, "{}", bank.name)?;
    if !bank.description.is_empty() {
        writeln!(out, "{}", bank.description)?;
    }
    writeln!(
        out,
        "\n{} questions in three sections. Answer with the number of your choice;",
        bank.total_questions()
    )?;
    writeln!(
        out,
        "b goes back, r restarts, e explains an answered knowledge question, q quits."
    )?;
    writeln!(out, "\nPress Enter to begin.")?;
    Ok(())
}

fn show_question<W: Write>(session: &Session, out: &mut W) -> Result<()> {
    let (Some(question), Some(index)) = (session.current_question(), session.question_index()) else {
        return Ok(());
    };
    let total = session.questions_for_stage(session.current_stage()).len();

    writeln!(
        out,
        "\n[{}] Question {} of {} ({}% of section, {}% overall)",
        question.instrument().title(),
        index + 1,
        total,
        session.section_progress().unwrap_or(0),
        session.progress()
    )?;
    writeln!(out, "{}", question.prompt)?;
    write_choices(question, out)?;

    if let Some(value) = session.answers().get(question.instrument(), &question.id) {
        let shown = if question.instrument().is_likert() {
            value
        } else {
            value + 1
        };
        writeln!(out, "(current answer: {shown}, press Enter to keep it)")?;
    }
    Ok(())
}

fn write_choices<W: Write>(question: &Question, out: &mut W) -> Result<()> {
    if question.instrument().is_likert() {
        for value in 1..=LIKERT_MAX {
            writeln!(out, "  {value}) {}", likert_label(value).unwrap_or_default())?;
        }
    } else {
        for (i, option) in question.options.iter().enumerate() {
            writeln!(out, "  {}) {option}", i + 1)?;
        }
    }
    Ok(())
}

fn show_feedback<W: Write>(session: &Session, out: &mut W) -> Result<()> {
    let feedback = session
        .current_question()
        .and_then(|q| session.feedback(&q.id));
    match feedback {
        Some(f) => {
            let verdict = if f.correct { "Correct" } else { "Incorrect" };
            writeln!(out, "{verdict}. The answer is: {}", f.correct_option)?;
            if let Some(explanation) = &f.explanation {
                writeln!(out, "{explanation}")?;
            }
        }
        None => writeln!(out, "Explanations are shown for answered knowledge questions.")?,
    }
    Ok(())
}
