//! Assessment report types with JSON persistence and retake comparison.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bank::BankSummary;
use crate::error::ResultsError;
use crate::model::{Category, Instrument};
use crate::recommend::{Recommendation, Tier};
use crate::scoring::ScoreSet;
use crate::session::{AssessmentResults, Session};

/// A completed assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// The question bank the attempt was taken against.
    pub bank: BankSummary,
    pub scores: ScoreSet,
    pub recommendation: Recommendation,
}

impl AssessmentReport {
    pub fn new(bank: BankSummary, results: AssessmentResults) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            bank,
            scores: results.scores,
            recommendation: results.recommendation,
        }
    }

    /// Build a report from a session that has reached Results.
    pub fn from_session(session: &Session) -> Result<Self, ResultsError> {
        let results = session.results()?;
        Ok(Self::new(session.bank().summary(), results))
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: AssessmentReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Compare this attempt against an earlier one.
    ///
    /// Category changes within `threshold` points count as unchanged.
    pub fn compare(&self, baseline: &AssessmentReport, threshold: u8) -> RetakeComparison {
        let instruments = Instrument::ALL
            .iter()
            .map(|&instrument| InstrumentDelta {
                instrument,
                baseline: baseline.scores.get(instrument).overall,
                current: self.scores.get(instrument).overall,
                delta: delta(
                    baseline.scores.get(instrument).overall,
                    self.scores.get(instrument).overall,
                ),
            })
            .collect();

        let mut improvements = Vec::new();
        let mut declines = Vec::new();
        let mut unchanged = 0usize;

        for instrument in Instrument::ALL {
            let before = baseline.scores.get(instrument);
            for current in &self.scores.get(instrument).categories {
                let Some(previous) = before.category(current.category) else {
                    continue;
                };
                let change = CategoryDelta {
                    category: current.category,
                    baseline: previous,
                    current: current.value,
                    delta: delta(previous, current.value),
                };
                if change.delta < -i16::from(threshold) {
                    declines.push(change);
                } else if change.delta > i16::from(threshold) {
                    improvements.push(change);
                } else {
                    unchanged += 1;
                }
            }
        }

        RetakeComparison {
            baseline_id: baseline.id,
            current_id: self.id,
            baseline_final: baseline.recommendation.final_score,
            current_final: self.recommendation.final_score,
            final_delta: delta(
                baseline.recommendation.final_score,
                self.recommendation.final_score,
            ),
            baseline_tier: baseline.recommendation.tier,
            current_tier: self.recommendation.tier,
            instruments,
            improvements,
            declines,
            unchanged,
        }
    }
}

fn delta(baseline: u8, current: u8) -> i16 {
    i16::from(current) - i16::from(baseline)
}

/// Result of comparing two attempts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetakeComparison {
    pub baseline_id: Uuid,
    pub current_id: Uuid,
    pub baseline_final: u8,
    pub current_final: u8,
    pub final_delta: i16,
    pub baseline_tier: Tier,
    pub current_tier: Tier,
    /// Overall change per instrument, in presentation order.
    pub instruments: Vec<InstrumentDelta>,
    /// Categories that went up by more than the threshold.
    pub improvements: Vec<CategoryDelta>,
    /// Categories that went down by more than the threshold.
    pub declines: Vec<CategoryDelta>,
    pub unchanged: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentDelta {
    pub instrument: Instrument,
    pub baseline: u8,
    pub current: u8,
    pub delta: i16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDelta {
    pub category: Category,
    pub baseline: u8,
    pub current: u8,
    pub delta: i16,
}

impl RetakeComparison {
    pub fn tier_changed(&self) -> bool {
        self.baseline_tier != self.current_tier
    }

    /// Returns true if any category went down.
    pub fn has_declines(&self) -> bool {
        !self.declines.is_empty()
    }

    /// Format the comparison as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Final score:** {} → {} ({:+})\n\n",
            self.baseline_final, self.current_final, self.final_delta
        ));
        if self.tier_changed() {
            md.push_str(&format!(
                "**Tier:** {} → {}\n\n",
                self.baseline_tier, self.current_tier
            ));
        } else {
            md.push_str(&format!("**Tier:** {} (unchanged)\n\n", self.current_tier));
        }

        md.push_str("| Instrument | Baseline | Current | Delta |\n");
        md.push_str("|------------|----------|---------|-------|\n");
        for i in &self.instruments {
            md.push_str(&format!(
                "| {} | {}% | {}% | {:+} |\n",
                i.instrument.title(),
                i.baseline,
                i.current,
                i.delta
            ));
        }
        md.push('\n');

        md.push_str(&format!(
            "**Summary:** {} declines, {} improvements, {} unchanged\n\n",
            self.declines.len(),
            self.improvements.len(),
            self.unchanged
        ));

        for (title, rows) in [("Declines", &self.declines), ("Improvements", &self.improvements)] {
            if rows.is_empty() {
                continue;
            }
            md.push_str(&format!("### {title}\n\n"));
            md.push_str("| Instrument | Category | Baseline | Current | Delta |\n");
            md.push_str("|------------|----------|----------|---------|-------|\n");
            for c in rows {
                md.push_str(&format!(
                    "| {} | {} | {}% | {}% | {:+} |\n",
                    c.category.instrument().title(),
                    c.category.label(),
                    c.baseline,
                    c.current,
                    c.delta
                ));
            }
            md.push('\n');
        }

        md
    }
}
