//! Error types for the assessment engine.
//!
//! Catalog errors are fatal at load time. Transition, scoring and results
//! errors are refusals: the session is left exactly as it was.

use thiserror::Error;

use crate::model::{Instrument, Stage};

/// A malformed question bank.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Two questions in one catalog share an id.
    #[error("duplicate question id in {instrument} catalog: {id}")]
    DuplicateId { instrument: Instrument, id: String },

    /// The category name is not declared for the instrument.
    #[error("question {id}: category '{category}' is not declared for {instrument}")]
    UnknownCategory {
        instrument: Instrument,
        id: String,
        category: String,
    },

    /// A question was placed in another instrument's catalog.
    #[error("question {id} belongs to {actual} but is listed in the {expected} catalog")]
    WrongInstrument {
        id: String,
        expected: Instrument,
        actual: Instrument,
    },

    /// The correct index does not point at one of the options.
    #[error("question {id}: correct index {index} is out of bounds for {options} options")]
    CorrectIndexOutOfBounds {
        id: String,
        index: usize,
        options: usize,
    },

    #[error("question {id}: knowledge questions need a correct index")]
    MissingCorrectIndex { id: String },

    #[error("question {id}: knowledge questions need at least two options, found {options}")]
    TooFewOptions { id: String, options: usize },

    #[error("question {id}: {options} options exceed the supported maximum of 255")]
    TooManyOptions { id: String, options: usize },

    /// Likert questions use the fixed agreement scale.
    #[error("question {id}: likert questions must not declare options or a correct index")]
    UnexpectedOptions { id: String },

    #[error("question {id}: prompt is empty")]
    EmptyPrompt { id: String },

    #[error("{0} catalog has no questions")]
    EmptyCatalog(Instrument),
}

/// A refused navigation request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// `advance` while questions of the current stage are unanswered.
    #[error("{stage} stage is incomplete: {answered} of {total} questions answered")]
    StageIncomplete {
        stage: Stage,
        answered: usize,
        total: usize,
    },

    /// `jump_to` a stage that is neither earlier than the current one nor completed.
    #[error("cannot jump from {from} to unreached stage {to}")]
    Unreached { from: Stage, to: Stage },

    /// The operation does not apply to the current stage.
    #[error("{operation} is not allowed at the {stage} stage")]
    NotAllowed {
        operation: &'static str,
        stage: Stage,
    },

    #[error("no stage after {0}")]
    AtEnd(Stage),

    #[error("no stage before {0}")]
    AtStart(Stage),

    /// Question cursor moves outside an instrument stage or past its ends.
    #[error("no question to move to in {0} stage")]
    NoQuestion(Stage),

    /// `next_question` before the current question has an answer.
    #[error("question {0} has not been answered")]
    Unanswered(String),
}

/// Scoring was requested for a catalog that is not fully answered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    #[error("{instrument} is incomplete: {answered} of {total} questions answered")]
    Incomplete {
        instrument: Instrument,
        answered: usize,
        total: usize,
    },
}

/// Results were requested before they exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResultsError {
    #[error("results are only available at the results stage (current: {0})")]
    NotAtResults(Stage),

    /// Reached the results stage without all instrument scores.
    #[error("results are incomplete, missing scores for: {}", join_instruments(.missing))]
    Incomplete { missing: Vec<Instrument> },
}

fn join_instruments(instruments: &[Instrument]) -> String {
    instruments
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
