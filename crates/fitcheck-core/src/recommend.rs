//! Final aggregation and tier-keyed guidance.
//!
//! The final score is the rounded mean of the three instrument overalls.
//! Next steps and suggested roles are a static table per tier; the
//! narrative additionally names which instruments cleared the strength bar.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::RecommendationPolicy;
use crate::model::Instrument;
use crate::scoring::{round_mean, ScoreSet};

/// Final recommendation band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Proceed,
    Conditional,
    Reconsider,
}

impl Tier {
    /// Band for a final score; each band includes its lower edge.
    pub fn for_score(score: u8, policy: &RecommendationPolicy) -> Self {
        if score >= policy.proceed_at {
            Tier::Proceed
        } else if score >= policy.conditional_at {
            Tier::Conditional
        } else {
            Tier::Reconsider
        }
    }

    /// Short answer to "should I pursue this career?".
    pub fn verdict(self) -> &'static str {
        match self {
            Tier::Proceed => "Yes",
            Tier::Conditional => "Maybe",
            Tier::Reconsider => "No",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Proceed => write!(f, "proceed"),
            Tier::Conditional => write!(f, "conditional"),
            Tier::Reconsider => write!(f, "reconsider"),
        }
    }
}

/// How closely a suggested role fits the respondent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchLevel {
    High,
    Medium,
    Low,
}

impl fmt::Display for MatchLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchLevel::High => write!(f, "High"),
            MatchLevel::Medium => write!(f, "Medium"),
            MatchLevel::Low => write!(f, "Low"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedRole {
    pub title: String,
    pub match_level: MatchLevel,
    pub skills: Vec<String>,
}

/// Output of the recommendation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub final_score: u8,
    pub tier: Tier,
    pub narrative: String,
    pub next_steps: Vec<String>,
    pub suggested_roles: Vec<SuggestedRole>,
    /// Instruments whose overall cleared the strength bar.
    pub strengths: Vec<Instrument>,
    /// Instruments whose overall did not.
    pub gaps: Vec<Instrument>,
}

struct RoleTemplate {
    title: &'static str,
    match_level: MatchLevel,
    skills: &'static [&'static str],
}

struct TierGuidance {
    next_steps: &'static [&'static str],
    roles: &'static [RoleTemplate],
}

const PROCEED: TierGuidance = TierGuidance {
    next_steps: &[
        "Start with Solidity fundamentals and smart contract development",
        "Explore Ethereum or Polygon ecosystems hands-on",
        "Contribute to open-source blockchain projects",
        "Build a portfolio of DApps and smart contracts",
        "Join blockchain developer communities and hackathons",
    ],
    roles: &[
        RoleTemplate {
            title: "Blockchain Developer",
            match_level: MatchLevel::High,
            skills: &["Solidity", "Web3", "Smart Contracts"],
        },
        RoleTemplate {
            title: "Smart Contract Engineer",
            match_level: MatchLevel::High,
            skills: &["Security", "Auditing", "Ethereum"],
        },
        RoleTemplate {
            title: "DApp Developer",
            match_level: MatchLevel::High,
            skills: &["React", "Web3.js", "Frontend"],
        },
    ],
};

const CONDITIONAL: TierGuidance = TierGuidance {
    next_steps: &[
        "Strengthen foundational programming skills (JavaScript/Python)",
        "Learn cryptography basics and hash functions",
        "Complete online blockchain courses (Coursera, Udemy)",
        "Practice with blockchain tutorials and simple projects",
        "Reassess in 3-6 months after building core skills",
    ],
    roles: &[
        RoleTemplate {
            title: "Web3 Product Manager",
            match_level: MatchLevel::Medium,
            skills: &["Strategy", "UX", "Blockchain Knowledge"],
        },
        RoleTemplate {
            title: "Blockchain Analyst",
            match_level: MatchLevel::Medium,
            skills: &["Research", "DeFi", "Market Analysis"],
        },
        RoleTemplate {
            title: "Junior Blockchain Developer",
            match_level: MatchLevel::Medium,
            skills: &["Learning Path", "Mentorship"],
        },
    ],
};

const RECONSIDER: TierGuidance = TierGuidance {
    next_steps: &[
        "Focus on general programming fundamentals first",
        "Explore web development (HTML, CSS, JavaScript)",
        "Consider roles in Web3 product management or marketing",
        "Learn about blockchain from a business perspective",
        "Build technical skills gradually before specializing",
    ],
    roles: &[
        RoleTemplate {
            title: "Crypto Community Manager",
            match_level: MatchLevel::Medium,
            skills: &["Communication", "Social Media"],
        },
        RoleTemplate {
            title: "Blockchain Content Creator",
            match_level: MatchLevel::Medium,
            skills: &["Writing", "Education"],
        },
        RoleTemplate {
            title: "Web3 Marketing Specialist",
            match_level: MatchLevel::Low,
            skills: &["Marketing", "Brand Strategy"],
        },
    ],
};

fn guidance(tier: Tier) -> &'static TierGuidance {
    match tier {
        Tier::Proceed => &PROCEED,
        Tier::Conditional => &CONDITIONAL,
        Tier::Reconsider => &RECONSIDER,
    }
}

/// How an instrument is named when it is a strength.
fn strength_phrase(instrument: Instrument) -> &'static str {
    match instrument {
        Instrument::Trait => "psychological fit",
        Instrument::Knowledge => "technical aptitude",
        Instrument::Readiness => "readiness framework fit",
    }
}

/// How an instrument is named when it is a gap.
fn gap_phrase(instrument: Instrument) -> &'static str {
    match instrument {
        Instrument::Trait => "psychological alignment",
        Instrument::Knowledge => "technical skills",
        Instrument::Readiness => "overall readiness factors",
    }
}

fn join_phrases(instruments: &[Instrument], phrase: fn(Instrument) -> &'static str) -> Option<String> {
    if instruments.is_empty() {
        return None;
    }
    Some(
        instruments
            .iter()
            .map(|&i| phrase(i))
            .collect::<Vec<_>>()
            .join(" and "),
    )
}

fn narrative(tier: Tier, strengths: &[Instrument], gaps: &[Instrument]) -> String {
    let strong = join_phrases(strengths, strength_phrase);
    let weak = join_phrases(gaps, gap_phrase);

    match tier {
        Tier::Proceed => format!(
            "Excellent! You demonstrate strong {}. You're well-positioned to succeed in blockchain development.",
            strong.as_deref().unwrap_or("overall readiness")
        ),
        Tier::Conditional => {
            let opening = match &strong {
                Some(s) => format!("You show promise with good {s}"),
                None => "You show promise".to_string(),
            };
            let focus = match &weak {
                Some(w) => format!("strengthening your {w}"),
                None => "more hands-on practice".to_string(),
            };
            format!("{opening}, but may benefit from {focus} before diving deep into blockchain.")
        }
        Tier::Reconsider => format!(
            "While blockchain is exciting, you may want to focus on building stronger {} first. Consider exploring related fields or building foundational skills.",
            weak.as_deref().unwrap_or("foundations")
        ),
    }
}

/// Aggregate the three instrument scores into a recommendation.
pub fn recommend(scores: &ScoreSet, policy: &RecommendationPolicy) -> Recommendation {
    let overalls = scores.overalls();
    let final_score = round_mean(overalls.iter().map(|&(_, v)| v)).unwrap_or(0);
    let tier = Tier::for_score(final_score, policy);

    let (strengths, gaps): (Vec<_>, Vec<_>) = overalls
        .iter()
        .partition(|&&(_, overall)| overall >= policy.strength_at);
    let strengths: Vec<Instrument> = strengths.into_iter().map(|(i, _)| i).collect();
    let gaps: Vec<Instrument> = gaps.into_iter().map(|(i, _)| i).collect();

    let table = guidance(tier);
    let recommendation = Recommendation {
        final_score,
        tier,
        narrative: narrative(tier, &strengths, &gaps),
        next_steps: table.next_steps.iter().map(|s| s.to_string()).collect(),
        suggested_roles: table
            .roles
            .iter()
            .map(|r| SuggestedRole {
                title: r.title.to_string(),
                match_level: r.match_level,
                skills: r.skills.iter().map(|s| s.to_string()).collect(),
            })
            .collect(),
        strengths,
        gaps,
    };

    tracing::info!(
        final_score = recommendation.final_score,
        tier = %recommendation.tier,
        "recommendation computed"
    );

    recommendation
}
