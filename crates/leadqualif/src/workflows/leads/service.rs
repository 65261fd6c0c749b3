use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::crm::{clean_details, resolve_action_type, CrmError, StatusPolicy, UNTRIAGED_STATUS};
use super::dashboard::DashboardSummary;
use super::domain::{
    AgencyId, AgentContext, Clock, Interaction, InteractionId, Lead, LeadId, LeadOrdering,
    LeadWithHistory, QualificationTier, SubscriptionPlan, SystemClock,
};
use super::guidance::{acknowledgement, recommendation};
use super::intake::{IntakeError, IntakeValidator, RawLeadSubmission};
use super::interactions::{newest_first, InteractionLog};
use super::listing::{AdvertisementDrafter, DraftError, PropertyBrief};
use super::repository::{order_leads, AgencyDirectory, LeadRepository, RepositoryError};
use super::scoring::{ScoreComponent, ScoringEngine, ScoringRules};
use crate::config::LeadsConfig;

/// Service composing intake, scoring, the lead repository and the interaction log.
pub struct LeadQualificationService<R, L, D> {
    intake: IntakeValidator,
    engine: Arc<ScoringEngine>,
    status_policy: StatusPolicy,
    repository: Arc<R>,
    interactions: Arc<L>,
    agencies: Arc<D>,
    clock: Arc<dyn Clock>,
}

/// Filters for dashboard listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LeadQuery {
    pub ordering: LeadOrdering,
    pub tier: Option<QualificationTier>,
}

/// Returned to the public submitter once a lead is stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionReceipt {
    pub lead_id: LeadId,
    pub agency_id: AgencyId,
    pub score: u8,
    pub tier: QualificationTier,
    pub recommendation: String,
    pub acknowledgement: &'static str,
    pub components: Vec<ScoreComponent>,
}

impl<R, L, D> LeadQualificationService<R, L, D>
where
    R: LeadRepository + 'static,
    L: InteractionLog + 'static,
    D: AgencyDirectory + 'static,
{
    pub fn new(repository: Arc<R>, interactions: Arc<L>, agencies: Arc<D>) -> Self {
        Self {
            intake: IntakeValidator::multi_tenant(),
            engine: Arc::new(ScoringEngine::default()),
            status_policy: StatusPolicy::Lenient,
            repository,
            interactions,
            agencies,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn from_config(
        repository: Arc<R>,
        interactions: Arc<L>,
        agencies: Arc<D>,
        config: &LeadsConfig,
    ) -> Self {
        let intake = match (config.multi_tenant, config.default_agency) {
            (false, Some(agency)) => IntakeValidator::single_tenant(agency),
            _ => IntakeValidator::multi_tenant(),
        };

        Self::new(repository, interactions, agencies)
            .with_intake(intake)
            .with_status_policy(config.status_policy())
    }

    pub fn with_intake(mut self, intake: IntakeValidator) -> Self {
        self.intake = intake;
        self
    }

    pub fn with_status_policy(mut self, policy: StatusPolicy) -> Self {
        self.status_policy = policy;
        self
    }

    pub fn with_rules(mut self, rules: ScoringRules) -> Self {
        self.engine = Arc::new(ScoringEngine::new(rules));
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    /// Validate, score and persist a public submission.
    pub fn submit(
        &self,
        submission: RawLeadSubmission,
    ) -> Result<SubmissionReceipt, LeadServiceError> {
        let normalized = self.intake.validate(submission).map_err(|err| {
            warn!(error = %err, "lead submission rejected");
            err
        })?;

        if self.agencies.fetch(&normalized.agency_id)?.is_none() {
            warn!(agency_id = %normalized.agency_id, "lead submitted for unknown agency");
            return Err(LeadServiceError::AgencyNotFound(normalized.agency_id));
        }

        let outcome = self.engine.score(
            &normalized.contact.email,
            normalized.contact.phone.as_deref(),
            &normalized.interest,
        );

        let now = self.clock.now();
        let lead = Lead {
            id: LeadId::new(),
            agency_id: normalized.agency_id,
            contact: normalized.contact,
            interest: normalized.interest,
            score_ia: outcome.score,
            tier: outcome.tier,
            recommendation: recommendation(outcome.score).to_string(),
            statut_crm: UNTRIAGED_STATUS.to_string(),
            created_at: now,
            updated_at: now,
        };

        let stored = self.repository.insert(lead)?;
        info!(
            lead_id = %stored.id,
            agency_id = %stored.agency_id,
            score = stored.score_ia,
            tier = stored.tier.label(),
            "lead qualified"
        );

        Ok(SubmissionReceipt {
            lead_id: stored.id,
            agency_id: stored.agency_id,
            score: stored.score_ia,
            tier: stored.tier,
            recommendation: stored.recommendation,
            acknowledgement: acknowledgement(stored.tier),
            components: outcome.components,
        })
    }

    /// Fetch a lead visible to the caller's agency.
    pub fn get(&self, context: &AgentContext, lead_id: &LeadId) -> Result<Lead, LeadServiceError> {
        match self.repository.fetch(lead_id)? {
            Some(lead) if lead.belongs_to(&context.agency_id) => Ok(lead),
            _ => Err(LeadServiceError::LeadNotFound(*lead_id)),
        }
    }

    pub fn get_with_history(
        &self,
        context: &AgentContext,
        lead_id: &LeadId,
    ) -> Result<LeadWithHistory, LeadServiceError> {
        let lead = self.get(context, lead_id)?;
        let interactions = newest_first(self.interactions.list_for(&lead.id)?);
        Ok(LeadWithHistory { lead, interactions })
    }

    /// All leads of the caller's agency with their follow-up history.
    pub fn list(
        &self,
        context: &AgentContext,
        query: LeadQuery,
    ) -> Result<Vec<LeadWithHistory>, LeadServiceError> {
        let mut leads = self.repository.list_for_agency(&context.agency_id)?;
        leads.retain(|lead| lead.belongs_to(&context.agency_id));
        if let Some(tier) = query.tier {
            leads.retain(|lead| lead.tier == tier);
        }
        order_leads(&mut leads, query.ordering);

        leads
            .into_iter()
            .map(|lead| -> Result<LeadWithHistory, LeadServiceError> {
                let interactions = newest_first(self.interactions.list_for(&lead.id)?);
                Ok(LeadWithHistory { lead, interactions })
            })
            .collect()
    }

    /// Overwrite `statut_crm`. Last write wins; no history is kept by this call.
    pub fn update_status(
        &self,
        context: &AgentContext,
        lead_id: &LeadId,
        status: &str,
    ) -> Result<Lead, LeadServiceError> {
        let current = self.get(context, lead_id)?;
        let status = self.status_policy.resolve(&current.statut_crm, status)?;

        let updated = self
            .repository
            .update_status(lead_id, status, self.clock.now())
            .map_err(|err| match err {
                RepositoryError::NotFound => LeadServiceError::LeadNotFound(*lead_id),
                other => LeadServiceError::Repository(other),
            })?;

        info!(
            lead_id = %updated.id,
            agent = context.agent.as_deref().unwrap_or("unknown"),
            status = %updated.statut_crm,
            "crm status updated"
        );
        Ok(updated)
    }

    /// Append an immutable follow-up event to a lead.
    pub fn add_interaction(
        &self,
        context: &AgentContext,
        lead_id: &LeadId,
        action_type: &str,
        details: Option<&str>,
    ) -> Result<Interaction, LeadServiceError> {
        let lead = self.get(context, lead_id)?;
        let action_type = resolve_action_type(action_type)?;

        let interaction = Interaction {
            id: InteractionId::new(),
            lead_id: lead.id,
            action_type,
            details: clean_details(details),
            recorded_by: context.agent.clone(),
            occurred_at: self.clock.now(),
        };

        let stored = self.interactions.append(interaction)?;
        info!(
            lead_id = %lead.id,
            action_type = %stored.action_type,
            "interaction recorded"
        );
        Ok(stored)
    }

    /// Follow-up history, newest first. Empty history is not an error.
    pub fn interactions(
        &self,
        context: &AgentContext,
        lead_id: &LeadId,
    ) -> Result<Vec<Interaction>, LeadServiceError> {
        let lead = self.get(context, lead_id)?;
        Ok(newest_first(self.interactions.list_for(&lead.id)?))
    }

    /// Queue statistics; only plans that include the dashboard may read them.
    pub fn dashboard(&self, context: &AgentContext) -> Result<DashboardSummary, LeadServiceError> {
        let agency = self
            .agencies
            .fetch(&context.agency_id)?
            .ok_or(LeadServiceError::AgencyNotFound(context.agency_id))?;
        if !agency.plan.includes_dashboard() {
            warn!(
                agency_id = %agency.id,
                plan = agency.plan.label(),
                "dashboard requested outside plan"
            );
            return Err(LeadServiceError::PlanRestricted(agency.plan));
        }

        let mut leads = self.repository.list_for_agency(&context.agency_id)?;
        leads.retain(|lead| lead.belongs_to(&context.agency_id));
        Ok(DashboardSummary::from_leads(&leads))
    }

    /// Ask the copywriter for advertisement text describing the lead's target property.
    pub fn draft_advertisement<W>(
        &self,
        context: &AgentContext,
        lead_id: &LeadId,
        drafter: &W,
    ) -> Result<String, LeadServiceError>
    where
        W: AdvertisementDrafter + ?Sized,
    {
        let lead = self.get(context, lead_id)?;
        let brief = PropertyBrief::from(&lead);
        Ok(drafter.draft(&brief)?)
    }
}

/// Error raised by the lead service.
#[derive(Debug, thiserror::Error)]
pub enum LeadServiceError {
    #[error(transparent)]
    Intake(#[from] IntakeError),
    #[error("agency {0} is not registered")]
    AgencyNotFound(AgencyId),
    #[error("lead {0} not found")]
    LeadNotFound(LeadId),
    #[error("the {} plan does not include the dashboard", .0.label())]
    PlanRestricted(SubscriptionPlan),
    #[error(transparent)]
    Crm(#[from] CrmError),
    #[error(transparent)]
    Draft(#[from] DraftError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl LeadServiceError {
    /// Whether the caller can fix the request and try again.
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            LeadServiceError::Repository(_) | LeadServiceError::Draft(_)
        )
    }
}
