//! Per-attempt answer storage.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::bank::Catalog;
use crate::model::Instrument;

/// Answers of one assessment attempt, keyed by instrument and question id.
///
/// A Likert answer is the scale value (1-5); a knowledge answer is the
/// chosen option index. Entries are only ever inserted or replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerStore {
    answers: BTreeMap<Instrument, HashMap<String, u8>>,
}

impl AnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answer, replacing any earlier one for the same question.
    /// Returns the previous value, if any.
    pub fn insert(&mut self, instrument: Instrument, id: impl Into<String>, value: u8) -> Option<u8> {
        self.answers
            .entry(instrument)
            .or_default()
            .insert(id.into(), value)
    }

    pub fn get(&self, instrument: Instrument, id: &str) -> Option<u8> {
        self.answers
            .get(&instrument)
            .and_then(|section| section.get(id))
            .copied()
    }

    pub fn contains(&self, instrument: Instrument, id: &str) -> bool {
        self.get(instrument, id).is_some()
    }

    /// Number of answers recorded for an instrument.
    pub fn count(&self, instrument: Instrument) -> usize {
        self.answers.get(&instrument).map_or(0, HashMap::len)
    }

    /// Number of the catalog's questions that have an answer.
    pub fn answered_in(&self, catalog: &Catalog) -> usize {
        catalog
            .questions
            .iter()
            .filter(|q| self.contains(catalog.instrument, &q.id))
            .count()
    }

    /// Whether every question of the catalog has an answer.
    pub fn covers(&self, catalog: &Catalog) -> bool {
        self.answered_in(catalog) == catalog.len()
    }

    pub fn len(&self) -> usize {
        self.answers.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.answers.clear();
    }
}
