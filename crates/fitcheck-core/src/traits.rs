//! Scoring rule trait and the two built-in rules.
//!
//! Every instrument is scored by the same per-category algorithm; only the
//! points awarded for a single answer differ between instruments.

use crate::model::{Instrument, Question, LIKERT_MAX};

/// Points for one answered question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Points {
    pub earned: u32,
    pub possible: u32,
}

/// How a single answer contributes to its category score.
pub trait ScoringRule: Send + Sync {
    /// Human-readable rule name (e.g. "likert-average").
    fn name(&self) -> &str;

    /// Points for `value` given as the answer to `question`.
    fn points(&self, question: &Question, value: u8) -> Points;
}

/// Average of Likert ratings: each answer earns its value out of 5.
#[derive(Debug, Clone, Copy, Default)]
pub struct LikertAverage;

impl ScoringRule for LikertAverage {
    fn name(&self) -> &str {
        "likert-average"
    }

    fn points(&self, _question: &Question, value: u8) -> Points {
        Points {
            earned: u32::from(value.min(LIKERT_MAX)),
            possible: u32::from(LIKERT_MAX),
        }
    }
}

/// Percent correct: each answer earns 1 of 1 when it matches the correct option.
#[derive(Debug, Clone, Copy, Default)]
pub struct PercentCorrect;

impl ScoringRule for PercentCorrect {
    fn name(&self) -> &str {
        "percent-correct"
    }

    fn points(&self, question: &Question, value: u8) -> Points {
        Points {
            earned: u32::from(question.is_correct(value)),
            possible: 1,
        }
    }
}

/// The rule an instrument is scored with.
pub fn rule_for(instrument: Instrument) -> &'static dyn ScoringRule {
    if instrument.is_likert() {
        &LikertAverage
    } else {
        &PercentCorrect
    }
}
