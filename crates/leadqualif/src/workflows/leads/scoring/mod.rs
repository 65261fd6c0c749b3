mod config;
mod rules;

pub use config::ScoringRules;

use serde::{Deserialize, Serialize};

use super::domain::{PropertyInterest, QualificationTier};
use rules::{score_components, ScoreInput};

/// Upper bound of `score_ia`, whatever the configured weights.
pub const MAX_SCORE: u8 = 10;

/// Pure scorer: the same normalized lead always yields the same score.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    rules: ScoringRules,
}

impl ScoringEngine {
    pub fn new(rules: ScoringRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    pub fn score(
        &self,
        email: &str,
        phone: Option<&str>,
        interest: &PropertyInterest,
    ) -> ScoreOutcome {
        let input = ScoreInput {
            email,
            phone,
            interest,
        };
        let components = score_components(&input, &self.rules);
        let raw_total = components
            .iter()
            .fold(0i16, |total, component| total.saturating_add(component.points));
        let score = raw_total.clamp(0, i16::from(MAX_SCORE)) as u8;

        ScoreOutcome {
            score,
            tier: QualificationTier::from_score(score),
            raw_total,
            components,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    ContactQuality,
    BudgetTier,
    MarketCoherence,
}

/// Discrete contribution to a score, kept for audits and the CLI breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    pub points: i16,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreOutcome {
    pub score: u8,
    pub tier: QualificationTier,
    pub raw_total: i16,
    pub components: Vec<ScoreComponent>,
}
