//! Section scoring: per-category normalization and instrument overall.
//!
//! Category value = round(100 × earned / possible) over the answered
//! questions of that category; overall = round(mean of category values).
//! Rounding is half-up and done in integer arithmetic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::answers::AnswerStore;
use crate::bank::Catalog;
use crate::error::ScoringError;
use crate::model::{Category, Instrument};
use crate::traits::{rule_for, ScoringRule};

/// Normalized score of one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: Category,
    /// 0..=100
    pub value: u8,
}

/// Scores of one instrument, categories in declared order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentScore {
    pub instrument: Instrument,
    pub categories: Vec<CategoryScore>,
    /// Unweighted mean of the category values, rounded.
    pub overall: u8,
}

impl InstrumentScore {
    pub fn category(&self, category: Category) -> Option<u8> {
        self.categories
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.value)
    }
}

/// Category score during a stage; `value` is `None` until something is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialCategoryScore {
    pub category: Category,
    pub value: Option<u8>,
    pub answered: usize,
    pub total: usize,
}

/// Scores over whatever has been answered so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialScore {
    pub instrument: Instrument,
    pub categories: Vec<PartialCategoryScore>,
    /// Mean of the categories that have a value.
    pub overall: Option<u8>,
    pub answered: usize,
    pub total: usize,
}

/// Score a fully answered catalog.
///
/// Refuses partially answered catalogs so that no category is ever divided
/// by zero; use [`score_partial`] for in-progress display.
pub fn score(catalog: &Catalog, answers: &AnswerStore) -> Result<InstrumentScore, ScoringError> {
    score_with(catalog, answers, rule_for(catalog.instrument))
}

/// [`score`] with an explicit rule.
pub fn score_with(
    catalog: &Catalog,
    answers: &AnswerStore,
    rule: &dyn ScoringRule,
) -> Result<InstrumentScore, ScoringError> {
    let partial = score_partial_with(catalog, answers, rule);
    if partial.answered < partial.total {
        return Err(ScoringError::Incomplete {
            instrument: catalog.instrument,
            answered: partial.answered,
            total: partial.total,
        });
    }

    let categories: Vec<CategoryScore> = partial
        .categories
        .iter()
        .filter_map(|c| {
            c.value.map(|value| CategoryScore {
                category: c.category,
                value,
            })
        })
        .collect();

    let overall = round_mean(categories.iter().map(|c| c.value)).unwrap_or(0);

    Ok(InstrumentScore {
        instrument: catalog.instrument,
        categories,
        overall,
    })
}

/// Score whatever has been answered. Never fails.
pub fn score_partial(catalog: &Catalog, answers: &AnswerStore) -> PartialScore {
    score_partial_with(catalog, answers, rule_for(catalog.instrument))
}

fn score_partial_with(
    catalog: &Catalog,
    answers: &AnswerStore,
    rule: &dyn ScoringRule,
) -> PartialScore {
    let instrument = catalog.instrument;
    let categories: Vec<PartialCategoryScore> = instrument
        .categories()
        .iter()
        .filter(|&&category| catalog.questions.iter().any(|q| q.category == category))
        .map(|&category| {
            let mut earned = 0u32;
            let mut possible = 0u32;
            let mut answered = 0usize;
            let mut total = 0usize;

            for q in catalog.questions.iter().filter(|q| q.category == category) {
                total += 1;
                if let Some(value) = answers.get(instrument, &q.id) {
                    let points = rule.points(q, value);
                    earned += points.earned;
                    possible += points.possible;
                    answered += 1;
                }
            }

            PartialCategoryScore {
                category,
                value: round_percent(earned, possible),
                answered,
                total,
            }
        })
        .collect();

    PartialScore {
        instrument,
        overall: round_mean(categories.iter().filter_map(|c| c.value)),
        answered: categories.iter().map(|c| c.answered).sum(),
        total: catalog.len(),
        categories,
    }
}

/// round(100 × earned / possible), half-up. `None` when nothing is possible.
pub fn round_percent(earned: u32, possible: u32) -> Option<u8> {
    if possible == 0 {
        return None;
    }
    let earned = u64::from(earned.min(possible));
    let possible = u64::from(possible);
    let value = (200 * earned + possible) / (2 * possible);
    u8::try_from(value).ok()
}

/// Rounded (half-up) arithmetic mean. `None` for an empty sequence.
pub fn round_mean(values: impl IntoIterator<Item = u8>) -> Option<u8> {
    let (sum, count) = values
        .into_iter()
        .fold((0u64, 0u64), |(sum, count), v| (sum + u64::from(v), count + 1));
    if count == 0 {
        return None;
    }
    u8::try_from((2 * sum + count) / (2 * count)).ok()
}

/// Qualitative band of a 0-100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Strong,
    Moderate,
    Weak,
}

impl ScoreBand {
    pub fn of(value: u8) -> Self {
        if value >= 75 {
            ScoreBand::Strong
        } else if value >= 55 {
            ScoreBand::Moderate
        } else {
            ScoreBand::Weak
        }
    }
}

/// One score per instrument: the input of the recommendation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSet {
    pub trait_inventory: InstrumentScore,
    pub knowledge_quiz: InstrumentScore,
    pub readiness_framework: InstrumentScore,
}

impl ScoreSet {
    /// Collect a complete set from per-instrument scores.
    ///
    /// Returns the missing instruments when any score is absent.
    pub fn from_map(
        scores: &BTreeMap<Instrument, InstrumentScore>,
    ) -> Result<Self, Vec<Instrument>> {
        let missing: Vec<Instrument> = Instrument::ALL
            .into_iter()
            .filter(|i| !scores.contains_key(i))
            .collect();

        match (
            scores.get(&Instrument::Trait),
            scores.get(&Instrument::Knowledge),
            scores.get(&Instrument::Readiness),
        ) {
            (Some(t), Some(k), Some(r)) => Ok(Self {
                trait_inventory: t.clone(),
                knowledge_quiz: k.clone(),
                readiness_framework: r.clone(),
            }),
            _ => Err(missing),
        }
    }

    pub fn get(&self, instrument: Instrument) -> &InstrumentScore {
        match instrument {
            Instrument::Trait => &self.trait_inventory,
            Instrument::Knowledge => &self.knowledge_quiz,
            Instrument::Readiness => &self.readiness_framework,
        }
    }

    /// Instrument overalls in presentation order.
    pub fn overalls(&self) -> [(Instrument, u8); 3] {
        Instrument::ALL.map(|i| (i, self.get(i).overall))
    }
}
