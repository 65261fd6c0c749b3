use std::fmt::Write as _;

use clap::Args;
use leadqualif::error::AppError;
use leadqualif::workflows::leads::guidance::{acknowledgement, recommendation};
use leadqualif::workflows::leads::{
    AgencyId, IntakeValidator, LeadServiceError, NumericInput, RawLeadSubmission, ScoreOutcome,
    ScoringEngine,
};

#[derive(Args, Debug, Default, Clone)]
pub(crate) struct ScoreArgs {
    /// Prospect name
    #[arg(long)]
    pub(crate) name: String,
    /// Prospect e-mail address
    #[arg(long)]
    pub(crate) email: String,
    /// Phone number in any common format
    #[arg(long)]
    pub(crate) phone: Option<String>,
    /// Budget, e.g. "450000" or "600 000€"
    #[arg(long)]
    pub(crate) budget: Option<String>,
    /// City or address of the targeted property
    #[arg(long)]
    pub(crate) location: Option<String>,
    /// Print the score breakdown as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let as_json = args.json;
    let outcome = score_prospect(args)?;

    if as_json {
        match serde_json::to_string_pretty(&outcome) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("Score breakdown unavailable: {err}"),
        }
    } else {
        print!("{}", render(&outcome));
    }
    Ok(())
}

/// Runs the prospect through intake and the scoring engine; nothing is stored.
pub(crate) fn score_prospect(args: ScoreArgs) -> Result<ScoreOutcome, AppError> {
    let submission = RawLeadSubmission {
        name: Some(args.name),
        email: Some(args.email),
        phone: args.phone,
        location: args.location,
        budget: args.budget.as_deref().map(NumericInput::from),
        ..RawLeadSubmission::default()
    };

    let lead = IntakeValidator::single_tenant(AgencyId::new())
        .validate(submission)
        .map_err(LeadServiceError::from)?;

    Ok(ScoringEngine::default().score(
        &lead.contact.email,
        lead.contact.phone.as_deref(),
        &lead.interest,
    ))
}

fn render(outcome: &ScoreOutcome) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Score {}/10 -> {}",
        outcome.score,
        outcome.tier.label()
    );
    for component in &outcome.components {
        let _ = writeln!(
            out,
            "  - {:?}: {:+} ({})",
            component.factor, component.points, component.notes
        );
    }
    if i16::from(outcome.score) != outcome.raw_total {
        let _ = writeln!(out, "  Raw total {} clamped", outcome.raw_total);
    }
    let _ = writeln!(out, "Recommendation: {}", recommendation(outcome.score));
    let _ = writeln!(out, "Prospect message: {}", acknowledgement(outcome.tier));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadqualif::workflows::leads::{IntakeError, QualificationTier};

    fn args() -> ScoreArgs {
        ScoreArgs {
            name: "Jean Dupont".to_string(),
            email: "j@d.fr".to_string(),
            phone: Some("06 12 34 56 78".to_string()),
            budget: Some("600 000€".to_string()),
            location: Some("Lyon".to_string()),
            json: false,
        }
    }

    #[test]
    fn scores_a_premium_prospect_as_hot() {
        let outcome = score_prospect(args()).expect("prospect scores");
        assert_eq!(outcome.score, 9);
        assert_eq!(outcome.tier, QualificationTier::Hot);

        let text = render(&outcome);
        assert!(text.starts_with("Score 9/10 -> Hot"));
        assert!(text.contains("Recommendation: Lead très chaud"));
        assert!(!text.contains("clamped"));
    }

    #[test]
    fn reports_clamped_totals() {
        let outcome = score_prospect(ScoreArgs {
            phone: None,
            budget: Some("90000".to_string()),
            location: Some("Paris".to_string()),
            ..args()
        })
        .expect("prospect scores");
        assert_eq!(outcome.raw_total, -1);
        assert_eq!(outcome.score, 0);
        assert!(render(&outcome).contains("Raw total -1 clamped"));
    }

    #[test]
    fn malformed_email_surfaces_as_lead_error() {
        let err = score_prospect(ScoreArgs {
            email: "nobody".to_string(),
            ..args()
        })
        .expect_err("email rejected");
        assert!(matches!(
            err,
            AppError::Leads(LeadServiceError::Intake(IntakeError::MissingRequiredField {
                field: "email"
            }))
        ));
    }
}
