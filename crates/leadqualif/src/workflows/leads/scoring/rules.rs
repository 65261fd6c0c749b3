use super::super::domain::PropertyInterest;
use super::super::intake::phone_digit_count;
use super::config::ScoringRules;
use super::{ScoreComponent, ScoreFactor};

pub(crate) struct ScoreInput<'a> {
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub interest: &'a PropertyInterest,
}

pub(crate) fn score_components(
    input: &ScoreInput<'_>,
    rules: &ScoringRules,
) -> Vec<ScoreComponent> {
    vec![
        contact_quality(input, rules),
        budget_tier(input.interest.budget, rules),
        market_coherence(input.interest, rules),
    ]
}

/// Phone wins over e-mail; the two never add up.
fn contact_quality(input: &ScoreInput<'_>, rules: &ScoringRules) -> ScoreComponent {
    let digits = input.phone.map(phone_digit_count).unwrap_or(0);
    let email_length = input.email.trim().chars().count();

    if digits >= rules.phone_min_digits {
        ScoreComponent {
            factor: ScoreFactor::ContactQuality,
            points: rules.phone_points,
            notes: format!("reachable by phone ({digits} digits)"),
        }
    } else if email_length >= rules.email_min_length {
        ScoreComponent {
            factor: ScoreFactor::ContactQuality,
            points: rules.email_points,
            notes: "reachable by e-mail only".to_string(),
        }
    } else {
        ScoreComponent {
            factor: ScoreFactor::ContactQuality,
            points: 0,
            notes: "no usable contact channel".to_string(),
        }
    }
}

fn budget_tier(budget: u64, rules: &ScoringRules) -> ScoreComponent {
    let (mid_low, mid_high) = rules.mid_budget_range;
    let (points, notes) = if budget >= rules.premium_budget_floor {
        (rules.premium_budget_points, format!("premium budget {budget}"))
    } else if (mid_low..=mid_high).contains(&budget) {
        (rules.mid_budget_points, format!("mid-range budget {budget}"))
    } else if budget > 0 && budget < rules.entry_budget_ceiling {
        (rules.entry_budget_points, format!("entry budget {budget}"))
    } else if budget == 0 {
        (0, "no budget given".to_string())
    } else {
        (0, format!("budget {budget} outside scored brackets"))
    };

    ScoreComponent {
        factor: ScoreFactor::BudgetTier,
        points,
        notes,
    }
}

/// Low budgets aimed at premium markets are rarely realistic.
fn market_coherence(interest: &PropertyInterest, rules: &ScoringRules) -> ScoreComponent {
    let budget = interest.budget;
    let market = interest
        .location
        .as_deref()
        .and_then(|location| premium_market(location, rules));

    match market {
        Some(marker) if budget > 0 && budget < rules.premium_market_budget_floor => {
            ScoreComponent {
                factor: ScoreFactor::MarketCoherence,
                points: rules.premium_market_penalty.saturating_neg(),
                notes: format!(
                    "budget {budget} below {} for premium market '{marker}'",
                    rules.premium_market_budget_floor
                ),
            }
        }
        _ => ScoreComponent {
            factor: ScoreFactor::MarketCoherence,
            points: 0,
            notes: "budget coherent with location".to_string(),
        },
    }
}

fn premium_market<'r>(location: &str, rules: &'r ScoringRules) -> Option<&'r str> {
    let lowered = location.to_lowercase();
    let tokens: Vec<&str> = lowered
        .split(|ch: char| !ch.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .collect();

    rules
        .premium_markets
        .iter()
        .map(String::as_str)
        .find(|marker| tokens.contains(marker))
}
