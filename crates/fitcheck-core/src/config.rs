//! fitcheck configuration.
//!
//! Search order:
//! 1. an explicit path
//! 2. `fitcheck.toml` in the current directory
//! 3. `~/.config/fitcheck/config.toml`
//!
//! `FITCHECK_BANK` overrides the configured question bank path.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::Stage;

/// Progress indicator value associated with each stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressConfig {
    #[serde(default = "default_intro")]
    pub intro: u8,
    #[serde(rename = "trait", default = "default_trait")]
    pub trait_stage: u8,
    #[serde(default = "default_knowledge")]
    pub knowledge: u8,
    #[serde(default = "default_readiness")]
    pub readiness: u8,
    #[serde(default = "default_results")]
    pub results: u8,
}

fn default_intro() -> u8 {
    20
}
fn default_trait() -> u8 {
    25
}
fn default_knowledge() -> u8 {
    50
}
fn default_readiness() -> u8 {
    75
}
fn default_results() -> u8 {
    100
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            intro: default_intro(),
            trait_stage: default_trait(),
            knowledge: default_knowledge(),
            readiness: default_readiness(),
            results: default_results(),
        }
    }
}

impl ProgressConfig {
    /// Baseline progress for a stage.
    pub fn baseline(&self, stage: Stage) -> u8 {
        match stage {
            Stage::Intro => self.intro,
            Stage::Trait => self.trait_stage,
            Stage::Knowledge => self.knowledge,
            Stage::Readiness => self.readiness,
            Stage::Results => self.results,
        }
    }

    /// Baselines must not decrease along the flow and must stay within 0..=100.
    pub fn validate(&self) -> Result<()> {
        let values: Vec<u8> = Stage::ALL.iter().map(|&s| self.baseline(s)).collect();
        anyhow::ensure!(
            values.windows(2).all(|w| w[0] <= w[1]),
            "progress baselines must be non-decreasing: {values:?}"
        );
        anyhow::ensure!(
            values.iter().all(|&v| v <= 100),
            "progress baselines must be at most 100: {values:?}"
        );
        Ok(())
    }
}

/// Thresholds used by the recommendation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationPolicy {
    /// Final score at or above which the tier is Proceed.
    #[serde(default = "default_proceed")]
    pub proceed_at: u8,
    /// Final score at or above which the tier is Conditional.
    #[serde(default = "default_conditional")]
    pub conditional_at: u8,
    /// Instrument overall at or above which it is named as a strength.
    #[serde(default = "default_strength")]
    pub strength_at: u8,
}

fn default_proceed() -> u8 {
    75
}
fn default_conditional() -> u8 {
    55
}
fn default_strength() -> u8 {
    70
}

impl Default for RecommendationPolicy {
    fn default() -> Self {
        Self {
            proceed_at: default_proceed(),
            conditional_at: default_conditional(),
            strength_at: default_strength(),
        }
    }
}

impl RecommendationPolicy {
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.conditional_at <= self.proceed_at,
            "conditional_at ({}) must not exceed proceed_at ({})",
            self.conditional_at,
            self.proceed_at
        );
        anyhow::ensure!(
            self.proceed_at <= 100 && self.strength_at <= 100,
            "policy thresholds must be at most 100"
        );
        Ok(())
    }
}

/// Top-level fitcheck configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitcheckConfig {
    /// Custom question bank; the built-in bank is used when unset.
    #[serde(default)]
    pub bank: Option<PathBuf>,
    /// Directory reports are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Default report format: json, html, markdown or all.
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default)]
    pub progress: ProgressConfig,
    #[serde(default)]
    pub policy: RecommendationPolicy,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./fitcheck-results")
}
fn default_format() -> String {
    "json".to_string()
}

impl Default for FitcheckConfig {
    fn default() -> Self {
        Self {
            bank: None,
            output_dir: default_output_dir(),
            format: default_format(),
            progress: ProgressConfig::default(),
            policy: RecommendationPolicy::default(),
        }
    }
}

/// Load configuration from the default locations.
pub fn load_config() -> Result<FitcheckConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<FitcheckConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("fitcheck.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match &config_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => FitcheckConfig::default(),
    };

    if let Ok(bank) = std::env::var("FITCHECK_BANK") {
        if !bank.trim().is_empty() {
            config.bank = Some(PathBuf::from(bank));
        }
    }

    let source = config_path
        .as_ref()
        .map_or_else(|| "defaults".to_string(), |p| p.display().to_string());
    tracing::debug!(%source, "loaded configuration");

    Ok(config)
}

/// Parse and validate a configuration string.
pub fn parse_config_str(content: &str) -> Result<FitcheckConfig> {
    let config: FitcheckConfig = toml::from_str(content)?;
    config.progress.validate()?;
    config.policy.validate()?;
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("fitcheck"))
}
