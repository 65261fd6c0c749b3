//! Lead qualification and CRM follow-up.
//!
//! Public submissions flow through intake validation, the scoring rubric and the
//! tier classifier before they are stored under their agency. Agents then work the
//! queue through the CRM status and the append-only interaction log.

pub mod crm;
pub mod dashboard;
pub mod domain;
pub mod guidance;
pub mod intake;
pub mod interactions;
pub mod listing;
pub mod memory;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use crm::{CrmError, StatusPolicy, DASHBOARD_STATUSES, UNTRIAGED_STATUS};
pub use dashboard::DashboardSummary;
pub use domain::{
    Agency, AgencyId, AgentContext, Clock, ContactDetails, Interaction, InteractionId, Lead,
    LeadId, LeadOrdering, LeadWithHistory, PropertyInterest, QualificationTier,
    SubscriptionPlan, SystemClock,
};
pub use intake::{IntakeError, IntakeValidator, NormalizedLead, NumericInput, RawLeadSubmission};
pub use interactions::InteractionLog;
pub use listing::{AdvertisementDrafter, DraftError, PropertyBrief};
pub use memory::InMemoryLeadStore;
pub use repository::{AgencyDirectory, LeadRepository, RepositoryError};
pub use router::lead_router;
pub use scoring::{ScoreComponent, ScoreFactor, ScoreOutcome, ScoringEngine, ScoringRules};
pub use service::{LeadQualificationService, LeadQuery, LeadServiceError, SubmissionReceipt};
