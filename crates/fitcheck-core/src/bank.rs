//! Question bank loading and validation.
//!
//! Banks are TOML files with a `[bank]` header and an ordered list of
//! `[[questions]]`. The built-in reference bank is compiled into the crate
//! and parsed once per process.

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::model::{Category, Instrument, Question};

const REFERENCE_BANK: &str = include_str!("../banks/blockchain.toml");

static REFERENCE: LazyLock<QuestionBank> = LazyLock::new(|| {
    parse_bank_str(REFERENCE_BANK, Path::new("banks/blockchain.toml"))
        .expect("built-in reference bank must be valid")
});

/// The built-in reference bank (24 trait, 24 knowledge, 36 readiness questions).
pub fn reference() -> &'static QuestionBank {
    &REFERENCE
}

/// The ordered questions of one instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub instrument: Instrument,
    pub questions: Vec<Question>,
}

impl Catalog {
    /// Build a catalog, rejecting anything malformed.
    pub fn new(instrument: Instrument, questions: Vec<Question>) -> Result<Self, CatalogError> {
        let catalog = Self {
            instrument,
            questions,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.questions.iter().position(|q| q.id == id)
    }

    /// Number of questions per declared category, in reporting order.
    pub fn category_counts(&self) -> Vec<(Category, usize)> {
        self.instrument
            .categories()
            .iter()
            .map(|&c| (c, self.questions.iter().filter(|q| q.category == c).count()))
            .collect()
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.questions.is_empty() {
            return Err(CatalogError::EmptyCatalog(self.instrument));
        }

        let mut seen_ids = HashSet::new();
        for q in &self.questions {
            if !seen_ids.insert(q.id.as_str()) {
                return Err(CatalogError::DuplicateId {
                    instrument: self.instrument,
                    id: q.id.clone(),
                });
            }
            if q.instrument() != self.instrument {
                return Err(CatalogError::WrongInstrument {
                    id: q.id.clone(),
                    expected: self.instrument,
                    actual: q.instrument(),
                });
            }
            if q.prompt.trim().is_empty() {
                return Err(CatalogError::EmptyPrompt { id: q.id.clone() });
            }

            if self.instrument.is_likert() {
                if !q.options.is_empty() || q.correct_index.is_some() {
                    return Err(CatalogError::UnexpectedOptions { id: q.id.clone() });
                }
                continue;
            }

            if q.options.len() < 2 {
                return Err(CatalogError::TooFewOptions {
                    id: q.id.clone(),
                    options: q.options.len(),
                });
            }
            // Answers are stored as u8 option indices.
            if q.options.len() > usize::from(u8::MAX) {
                return Err(CatalogError::TooManyOptions {
                    id: q.id.clone(),
                    options: q.options.len(),
                });
            }
            match q.correct_index {
                None => return Err(CatalogError::MissingCorrectIndex { id: q.id.clone() }),
                Some(index) if index >= q.options.len() => {
                    return Err(CatalogError::CorrectIndexOutOfBounds {
                        id: q.id.clone(),
                        index,
                        options: q.options.len(),
                    })
                }
                Some(_) => {}
            }
        }

        Ok(())
    }
}

/// Immutable question catalogs for all three instruments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionBank {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    trait_inventory: Catalog,
    knowledge_quiz: Catalog,
    readiness_framework: Catalog,
}

impl QuestionBank {
    /// Assemble a bank from one question list, split by instrument in order.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        questions: Vec<Question>,
    ) -> Result<Self, CatalogError> {
        let mut split: [Vec<Question>; 3] = Default::default();
        for q in questions {
            let slot = match q.instrument() {
                Instrument::Trait => 0,
                Instrument::Knowledge => 1,
                Instrument::Readiness => 2,
            };
            split[slot].push(q);
        }
        let [trait_qs, knowledge_qs, readiness_qs] = split;

        Ok(Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            trait_inventory: Catalog::new(Instrument::Trait, trait_qs)?,
            knowledge_quiz: Catalog::new(Instrument::Knowledge, knowledge_qs)?,
            readiness_framework: Catalog::new(Instrument::Readiness, readiness_qs)?,
        })
    }

    pub fn catalog(&self, instrument: Instrument) -> &Catalog {
        match instrument {
            Instrument::Trait => &self.trait_inventory,
            Instrument::Knowledge => &self.knowledge_quiz,
            Instrument::Readiness => &self.readiness_framework,
        }
    }

    /// Ordered questions of an instrument.
    pub fn questions(&self, instrument: Instrument) -> &[Question] {
        &self.catalog(instrument).questions
    }

    pub fn question(&self, instrument: Instrument, id: &str) -> Option<&Question> {
        self.catalog(instrument).get(id)
    }

    /// Questions per declared category of an instrument.
    pub fn category_counts(&self, instrument: Instrument) -> Vec<(Category, usize)> {
        self.catalog(instrument).category_counts()
    }

    pub fn total_questions(&self) -> usize {
        Instrument::ALL
            .iter()
            .map(|&i| self.catalog(i).len())
            .sum()
    }

    pub fn summary(&self) -> BankSummary {
        BankSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            question_count: self.total_questions(),
        }
    }
}

/// Summary of a bank (without the questions).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankSummary {
    pub id: String,
    pub name: String,
    pub question_count: usize,
}

/// Intermediate TOML structure for bank files.
#[derive(Debug, Deserialize)]
struct TomlBankFile {
    bank: TomlBankHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlBankHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    instrument: String,
    id: String,
    category: String,
    prompt: String,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    correct_index: Option<usize>,
    #[serde(default)]
    explanation: Option<String>,
}

/// Parse a bank file.
pub fn parse_bank(path: &Path) -> Result<QuestionBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question bank: {}", path.display()))?;

    parse_bank_str(&content, path)
}

/// Parse a bank from a TOML string (useful for testing).
pub fn parse_bank_str(content: &str, source_path: &Path) -> Result<QuestionBank> {
    let parsed: TomlBankFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| {
            let instrument: Instrument = q
                .instrument
                .parse()
                .map_err(|e: String| anyhow::anyhow!("question {}: {}", q.id, e))?;
            let category = instrument.parse_category(&q.category).ok_or_else(|| {
                CatalogError::UnknownCategory {
                    instrument,
                    id: q.id.clone(),
                    category: q.category.clone(),
                }
            })?;

            Ok(Question {
                id: q.id,
                prompt: q.prompt,
                category,
                options: q.options,
                correct_index: q.correct_index,
                explanation: q.explanation,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let bank = QuestionBank::new(
        parsed.bank.id,
        parsed.bank.name,
        parsed.bank.description,
        questions,
    )
    .with_context(|| format!("invalid question bank: {}", source_path.display()))?;

    tracing::debug!(
        bank = %bank.id,
        questions = bank.total_questions(),
        "loaded question bank"
    );

    Ok(bank)
}

/// Load the bank at `path`, or the reference bank when no path is given.
pub fn load_bank_or_reference(path: Option<&Path>) -> Result<QuestionBank> {
    match path {
        Some(p) => parse_bank(p),
        None => Ok(reference().clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{KnowledgeCategory, ReadinessDimension, TraitCategory};
    use std::path::PathBuf;

    const MINIMAL_BANK: &str = r#"
[bank]
id = "mini"
name = "Mini Bank"

[[questions]]
instrument = "trait"
id = "interest_1"
category = "interest"
prompt = "I follow new technology."

[[questions]]
instrument = "knowledge"
id = "crypto_1"
category = "crypto"
prompt = "What is the main purpose of a digital signature?"
options = ["Encryption", "Authentication", "Compression"]
correct_index = 1
explanation = "Signatures authenticate the sender."

[[questions]]
instrument = "readiness"
id = "interest_1"
category = "interest"
prompt = "I spend free time learning about this field."
"#;

    fn parse(toml: &str) -> Result<QuestionBank> {
        parse_bank_str(toml, &PathBuf::from("test.toml"))
    }

    #[test]
    fn reference_bank_shape() {
        let bank = reference();
        assert_eq!(bank.questions(Instrument::Trait).len(), 24);
        assert_eq!(bank.questions(Instrument::Knowledge).len(), 24);
        assert_eq!(bank.questions(Instrument::Readiness).len(), 36);

        let trait_counts = bank.catalog(Instrument::Trait).category_counts();
        assert_eq!(
            trait_counts,
            vec![
                (Category::Trait(TraitCategory::Interest), 5),
                (Category::Trait(TraitCategory::Personality), 8),
                (Category::Trait(TraitCategory::Cognitive), 6),
                (Category::Trait(TraitCategory::Motivation), 5),
            ]
        );
        for (_, count) in bank.catalog(Instrument::Readiness).category_counts() {
            assert_eq!(count, 6);
        }
        for (_, count) in bank.catalog(Instrument::Knowledge).category_counts() {
            assert_eq!(count, 6);
        }
    }

    #[test]
    fn reference_order_is_stable() {
        let first = reference().questions(Instrument::Trait)[0].id.clone();
        let again = reference().questions(Instrument::Trait)[0].id.clone();
        assert_eq!(first, "interest_1");
        assert_eq!(first, again);
    }

    #[test]
    fn parse_minimal_bank() {
        let bank = parse(MINIMAL_BANK).unwrap();
        assert_eq!(bank.id, "mini");
        assert_eq!(bank.total_questions(), 3);
        let q = bank.question(Instrument::Knowledge, "crypto_1").unwrap();
        assert_eq!(q.category, Category::Knowledge(KnowledgeCategory::Crypto));
        assert_eq!(q.correct_index, Some(1));
        // Same id in two catalogs is fine.
        assert_eq!(
            bank.question(Instrument::Readiness, "interest_1").unwrap().category,
            Category::Readiness(ReadinessDimension::Interest)
        );
    }

    #[test]
    fn reject_duplicate_id_within_catalog() {
        let toml = format!(
            "{MINIMAL_BANK}\n[[questions]]\ninstrument = \"trait\"\nid = \"interest_1\"\ncategory = \"motivation\"\nprompt = \"Again\"\n"
        );
        let err = parse(&toml).unwrap_err();
        assert!(format!("{err:#}").contains("duplicate question id"));
    }

    #[test]
    fn reject_category_outside_instrument() {
        let toml = format!(
            "{MINIMAL_BANK}\n[[questions]]\ninstrument = \"trait\"\nid = \"x_1\"\ncategory = \"crypto\"\nprompt = \"Misfiled\"\n"
        );
        let err = parse(&toml).unwrap_err();
        assert!(format!("{err:#}").contains("not declared for trait"));
    }

    #[test]
    fn reject_correct_index_out_of_bounds() {
        let toml = format!(
            "{MINIMAL_BANK}\n[[questions]]\ninstrument = \"knowledge\"\nid = \"crypto_2\"\ncategory = \"crypto\"\nprompt = \"?\"\noptions = [\"a\", \"b\"]\ncorrect_index = 2\n"
        );
        let err = parse(&toml).unwrap_err();
        assert!(format!("{err:#}").contains("out of bounds"));
    }

    #[test]
    fn reject_likert_with_options() {
        let toml = format!(
            "{MINIMAL_BANK}\n[[questions]]\ninstrument = \"readiness\"\nid = \"will_1\"\ncategory = \"will\"\nprompt = \"?\"\noptions = [\"a\", \"b\"]\n"
        );
        assert!(parse(&toml).is_err());
    }

    #[test]
    fn reject_empty_catalog() {
        let toml = r#"
[bank]
id = "empty"
name = "Empty"

[[questions]]
instrument = "trait"
id = "interest_1"
category = "interest"
prompt = "Only trait questions here."
"#;
        let err = parse(toml).unwrap_err();
        assert!(format!("{err:#}").contains("knowledge catalog has no questions"));
    }

    #[test]
    fn catalog_rejects_wrong_instrument() {
        let q = reference().questions(Instrument::Trait)[0].clone();
        let err = Catalog::new(Instrument::Readiness, vec![q]).unwrap_err();
        assert!(matches!(err, CatalogError::WrongInstrument { .. }));
    }

    #[test]
    fn parse_malformed_toml() {
        assert!(parse("this is not [valid toml }{").is_err());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bank.toml");
        std::fs::write(&path, MINIMAL_BANK).unwrap();

        let bank = parse_bank(&path).unwrap();
        assert_eq!(bank.name, "Mini Bank");
        assert!(parse_bank(&dir.path().join("missing.toml")).is_err());
    }
}
