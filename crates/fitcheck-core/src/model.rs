//! Core data model types for fitcheck.
//!
//! Instruments, stages, categories and questions. Category sets are closed
//! per instrument, so every score can be reported in a fixed order and a
//! missing category is a compile-time concern rather than a runtime lookup.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the three evaluation batteries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Instrument {
    /// Trait and interest inventory (Likert).
    Trait,
    /// Knowledge quiz (multiple choice).
    Knowledge,
    /// Six-dimension readiness framework (Likert).
    Readiness,
}

impl Instrument {
    /// All instruments in presentation order.
    pub const ALL: [Instrument; 3] = [Instrument::Trait, Instrument::Knowledge, Instrument::Readiness];

    /// Declared categories of this instrument, in reporting order.
    pub fn categories(self) -> &'static [Category] {
        match self {
            Instrument::Trait => &[
                Category::Trait(TraitCategory::Interest),
                Category::Trait(TraitCategory::Personality),
                Category::Trait(TraitCategory::Cognitive),
                Category::Trait(TraitCategory::Motivation),
            ],
            Instrument::Knowledge => &[
                Category::Knowledge(KnowledgeCategory::Aptitude),
                Category::Knowledge(KnowledgeCategory::Crypto),
                Category::Knowledge(KnowledgeCategory::Programming),
                Category::Knowledge(KnowledgeCategory::Blockchain),
            ],
            Instrument::Readiness => &[
                Category::Readiness(ReadinessDimension::Will),
                Category::Readiness(ReadinessDimension::Interest),
                Category::Readiness(ReadinessDimension::Skill),
                Category::Readiness(ReadinessDimension::Cognitive),
                Category::Readiness(ReadinessDimension::Ability),
                Category::Readiness(ReadinessDimension::RealWorld),
            ],
        }
    }

    /// Whether questions of this instrument are rated on the Likert scale.
    pub fn is_likert(self) -> bool {
        !matches!(self, Instrument::Knowledge)
    }

    /// The stage in which this instrument is administered.
    pub fn stage(self) -> Stage {
        match self {
            Instrument::Trait => Stage::Trait,
            Instrument::Knowledge => Stage::Knowledge,
            Instrument::Readiness => Stage::Readiness,
        }
    }

    /// Human-readable title.
    pub fn title(self) -> &'static str {
        match self {
            Instrument::Trait => "Psychological Fit",
            Instrument::Knowledge => "Technical Aptitude",
            Instrument::Readiness => "Readiness Analysis",
        }
    }

    /// Parse a category name declared for this instrument.
    pub fn parse_category(self, name: &str) -> Option<Category> {
        self.categories()
            .iter()
            .copied()
            .find(|c| c.name() == name.trim())
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instrument::Trait => write!(f, "trait"),
            Instrument::Knowledge => write!(f, "knowledge"),
            Instrument::Readiness => write!(f, "readiness"),
        }
    }
}

impl FromStr for Instrument {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trait" | "psychometric" | "psychological" => Ok(Instrument::Trait),
            "knowledge" | "technical" => Ok(Instrument::Knowledge),
            "readiness" | "wiscar" => Ok(Instrument::Readiness),
            other => Err(format!("unknown instrument: {other}")),
        }
    }
}

/// A step in the linear assessment flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Intro,
    Trait,
    Knowledge,
    Readiness,
    Results,
}

impl Stage {
    /// All stages in flow order.
    pub const ALL: [Stage; 5] = [
        Stage::Intro,
        Stage::Trait,
        Stage::Knowledge,
        Stage::Readiness,
        Stage::Results,
    ];

    /// The instrument administered in this stage, if any.
    pub fn instrument(self) -> Option<Instrument> {
        match self {
            Stage::Trait => Some(Instrument::Trait),
            Stage::Knowledge => Some(Instrument::Knowledge),
            Stage::Readiness => Some(Instrument::Readiness),
            Stage::Intro | Stage::Results => None,
        }
    }

    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Intro => Some(Stage::Trait),
            Stage::Trait => Some(Stage::Knowledge),
            Stage::Knowledge => Some(Stage::Readiness),
            Stage::Readiness => Some(Stage::Results),
            Stage::Results => None,
        }
    }

    pub fn previous(self) -> Option<Stage> {
        match self {
            Stage::Intro => None,
            Stage::Trait => Some(Stage::Intro),
            Stage::Knowledge => Some(Stage::Trait),
            Stage::Readiness => Some(Stage::Knowledge),
            Stage::Results => Some(Stage::Readiness),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Intro => write!(f, "intro"),
            Stage::Trait => write!(f, "trait"),
            Stage::Knowledge => write!(f, "knowledge"),
            Stage::Readiness => write!(f, "readiness"),
            Stage::Results => write!(f, "results"),
        }
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "intro" | "introduction" => Ok(Stage::Intro),
            "results" => Ok(Stage::Results),
            other => other
                .parse::<Instrument>()
                .map(Instrument::stage)
                .map_err(|_| format!("unknown stage: {other}")),
        }
    }
}

/// Sub-scales of the trait inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitCategory {
    Interest,
    Personality,
    Cognitive,
    Motivation,
}

/// Sub-scales of the knowledge quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnowledgeCategory {
    Aptitude,
    Crypto,
    Programming,
    Blockchain,
}

/// Dimensions of the readiness framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessDimension {
    Will,
    Interest,
    Skill,
    Cognitive,
    Ability,
    RealWorld,
}

/// A category tagged with the instrument that declares it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "instrument", content = "name", rename_all = "lowercase")]
pub enum Category {
    Trait(TraitCategory),
    Knowledge(KnowledgeCategory),
    Readiness(ReadinessDimension),
}

impl Category {
    pub fn instrument(self) -> Instrument {
        match self {
            Category::Trait(_) => Instrument::Trait,
            Category::Knowledge(_) => Instrument::Knowledge,
            Category::Readiness(_) => Instrument::Readiness,
        }
    }

    /// Machine name, as used in bank files.
    pub fn name(self) -> &'static str {
        match self {
            Category::Trait(TraitCategory::Interest) => "interest",
            Category::Trait(TraitCategory::Personality) => "personality",
            Category::Trait(TraitCategory::Cognitive) => "cognitive",
            Category::Trait(TraitCategory::Motivation) => "motivation",
            Category::Knowledge(KnowledgeCategory::Aptitude) => "aptitude",
            Category::Knowledge(KnowledgeCategory::Crypto) => "crypto",
            Category::Knowledge(KnowledgeCategory::Programming) => "programming",
            Category::Knowledge(KnowledgeCategory::Blockchain) => "blockchain",
            Category::Readiness(ReadinessDimension::Will) => "will",
            Category::Readiness(ReadinessDimension::Interest) => "interest",
            Category::Readiness(ReadinessDimension::Skill) => "skill",
            Category::Readiness(ReadinessDimension::Cognitive) => "cognitive",
            Category::Readiness(ReadinessDimension::Ability) => "ability",
            Category::Readiness(ReadinessDimension::RealWorld) => "real_world",
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Category::Trait(TraitCategory::Interest) => "Interest",
            Category::Trait(TraitCategory::Personality) => "Personality",
            Category::Trait(TraitCategory::Cognitive) => "Cognitive Style",
            Category::Trait(TraitCategory::Motivation) => "Motivation",
            Category::Knowledge(KnowledgeCategory::Aptitude) => "General Aptitude",
            Category::Knowledge(KnowledgeCategory::Crypto) => "Cryptography & Math",
            Category::Knowledge(KnowledgeCategory::Programming) => "Programming",
            Category::Knowledge(KnowledgeCategory::Blockchain) => "Blockchain Concepts",
            Category::Readiness(ReadinessDimension::Will) => "Will",
            Category::Readiness(ReadinessDimension::Interest) => "Interest",
            Category::Readiness(ReadinessDimension::Skill) => "Skill",
            Category::Readiness(ReadinessDimension::Cognitive) => "Cognitive",
            Category::Readiness(ReadinessDimension::Ability) => "Ability to Learn",
            Category::Readiness(ReadinessDimension::RealWorld) => "Real-World Alignment",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.instrument(), self.name())
    }
}

/// Points on the agreement scale used by Likert instruments.
pub const LIKERT_MAX: u8 = 5;

/// Labels for Likert values 1 through 5.
pub const LIKERT_LABELS: [&str; 5] = [
    "Strongly Disagree",
    "Disagree",
    "Neutral",
    "Agree",
    "Strongly Agree",
];

/// Label for a Likert value, if it is on the scale.
pub fn likert_label(value: u8) -> Option<&'static str> {
    value
        .checked_sub(1)
        .and_then(|i| LIKERT_LABELS.get(usize::from(i)).copied())
}

/// A single assessment question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Identifier, unique within its catalog.
    pub id: String,
    /// The statement or question shown to the respondent.
    pub prompt: String,
    pub category: Category,
    /// Answer choices. Empty for Likert questions.
    #[serde(default)]
    pub options: Vec<String>,
    /// Index of the correct option (knowledge questions only).
    #[serde(default)]
    pub correct_index: Option<usize>,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl Question {
    pub fn instrument(&self) -> Instrument {
        self.category.instrument()
    }

    /// Whether `value` is a legal answer to this question.
    pub fn accepts(&self, value: u8) -> bool {
        if self.instrument().is_likert() {
            (1..=LIKERT_MAX).contains(&value)
        } else {
            usize::from(value) < self.options.len()
        }
    }

    /// Whether `value` is the correct option. Always false for Likert questions.
    pub fn is_correct(&self, value: u8) -> bool {
        self.correct_index == Some(usize::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instrument_display_and_parse() {
        assert_eq!(Instrument::Trait.to_string(), "trait");
        assert_eq!("knowledge".parse::<Instrument>().unwrap(), Instrument::Knowledge);
        assert_eq!("WISCAR".parse::<Instrument>().unwrap(), Instrument::Readiness);
        assert!("history".parse::<Instrument>().is_err());
    }

    #[test]
    fn stage_order_is_linear() {
        assert!(Stage::Intro < Stage::Trait);
        assert!(Stage::Readiness < Stage::Results);
        assert_eq!(Stage::Intro.next(), Some(Stage::Trait));
        assert_eq!(Stage::Results.next(), None);
        assert_eq!(Stage::Trait.previous(), Some(Stage::Intro));
        assert_eq!("results".parse::<Stage>().unwrap(), Stage::Results);
        assert_eq!("technical".parse::<Stage>().unwrap(), Stage::Knowledge);
    }

    #[test]
    fn categories_belong_to_their_instrument() {
        for instrument in Instrument::ALL {
            for category in instrument.categories() {
                assert_eq!(category.instrument(), instrument);
            }
        }
        assert_eq!(Instrument::Readiness.categories().len(), 6);
    }

    #[test]
    fn parse_category_is_scoped_to_instrument() {
        assert_eq!(
            Instrument::Readiness.parse_category("real_world"),
            Some(Category::Readiness(ReadinessDimension::RealWorld))
        );
        assert_eq!(
            Instrument::Trait.parse_category("interest"),
            Some(Category::Trait(TraitCategory::Interest))
        );
        assert_eq!(Instrument::Trait.parse_category("crypto"), None);
    }

    #[test]
    fn likert_labels() {
        assert_eq!(likert_label(4), Some("Agree"));
        assert_eq!(likert_label(0), None);
        assert_eq!(likert_label(6), None);
    }

    #[test]
    fn question_accepts_values_for_its_instrument() {
        let likert = Question {
            id: "will_1".into(),
            prompt: "I finish what I start.".into(),
            category: Category::Readiness(ReadinessDimension::Will),
            options: vec![],
            correct_index: None,
            explanation: None,
        };
        assert!(likert.accepts(1));
        assert!(likert.accepts(5));
        assert!(!likert.accepts(0));
        assert!(!likert.accepts(6));

        let mcq = Question {
            id: "crypto_1".into(),
            prompt: "Purpose of a digital signature?".into(),
            category: Category::Knowledge(KnowledgeCategory::Crypto),
            options: vec!["Encryption".into(), "Authentication".into()],
            correct_index: Some(1),
            explanation: None,
        };
        assert!(mcq.accepts(0));
        assert!(!mcq.accepts(2));
        assert!(mcq.is_correct(1));
        assert!(!mcq.is_correct(0));
    }

    #[test]
    fn category_serde_roundtrip() {
        let category = Category::Readiness(ReadinessDimension::RealWorld);
        let json = serde_json::to_string(&category).unwrap();
        assert_eq!(json, r#"{"instrument":"readiness","name":"real_world"}"#);
        let back: Category = serde_json::from_str(&json).unwrap();
        assert_eq!(back, category);
    }
}
