use serde::{Deserialize, Serialize};

/// Point weights and thresholds of the qualification rubric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRules {
    pub phone_min_digits: usize,
    pub phone_points: i16,
    pub email_min_length: usize,
    pub email_points: i16,
    pub premium_budget_floor: u64,
    pub premium_budget_points: i16,
    pub mid_budget_range: (u64, u64),
    pub mid_budget_points: i16,
    pub entry_budget_ceiling: u64,
    pub entry_budget_points: i16,
    pub premium_market_budget_floor: u64,
    pub premium_market_penalty: i16,
    pub premium_markets: Vec<String>,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            phone_min_digits: 10,
            phone_points: 4,
            email_min_length: 6,
            email_points: 1,
            premium_budget_floor: 500_001,
            premium_budget_points: 5,
            mid_budget_range: (200_000, 500_000),
            mid_budget_points: 3,
            entry_budget_ceiling: 150_000,
            entry_budget_points: 1,
            premium_market_budget_floor: 250_000,
            premium_market_penalty: 3,
            premium_markets: [
                "paris",
                "lyon",
                "marseille",
                "nice",
                "cannes",
                "bordeaux",
                "monaco",
                "neuilly",
                "courchevel",
                "megeve",
                "megève",
                "biarritz",
                "tropez",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
        }
    }
}
