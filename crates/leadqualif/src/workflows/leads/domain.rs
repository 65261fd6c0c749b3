use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of the agency owning a set of leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgencyId(pub Uuid);

impl AgencyId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AgencyId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AgencyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier wrapper for stored leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeadId(pub Uuid);

impl LeadId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LeadId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InteractionId(pub Uuid);

impl InteractionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InteractionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Commercial plan an agency subscribes to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionPlan {
    #[default]
    Starter,
    Pro,
    Agency,
}

impl SubscriptionPlan {
    pub const fn label(self) -> &'static str {
        match self {
            SubscriptionPlan::Starter => "starter",
            SubscriptionPlan::Pro => "pro",
            SubscriptionPlan::Agency => "agency",
        }
    }

    /// Statistics dashboards ship with the paid tiers only.
    pub const fn includes_dashboard(self) -> bool {
        matches!(self, SubscriptionPlan::Pro | SubscriptionPlan::Agency)
    }
}

/// Tenant root. Provisioned out of band; the lead workflow only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agency {
    pub id: AgencyId,
    pub display_name: String,
    pub plan: SubscriptionPlan,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Qualification tier derived from `score_ia`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QualificationTier {
    Hot,
    Warm,
    Cold,
}

impl QualificationTier {
    pub const HOT_THRESHOLD: u8 = 7;
    pub const WARM_THRESHOLD: u8 = 4;

    pub const fn from_score(score: u8) -> Self {
        if score >= Self::HOT_THRESHOLD {
            Self::Hot
        } else if score >= Self::WARM_THRESHOLD {
            Self::Warm
        } else {
            Self::Cold
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            QualificationTier::Hot => "Hot",
            QualificationTier::Warm => "Warm",
            QualificationTier::Cold => "Cold",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "hot" | "chaud" => Some(Self::Hot),
            "warm" | "tiede" | "tiède" => Some(Self::Warm),
            "cold" | "froid" => Some(Self::Cold),
            _ => None,
        }
    }
}

/// Contact coordinates captured at intake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// What the prospect is looking for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyInterest {
    pub property_type: Option<String>,
    pub location: Option<String>,
    pub budget: u64,
    pub surface: Option<u32>,
    pub rooms: Option<u32>,
    pub timeline: Option<String>,
    pub message: Option<String>,
}

/// Persisted lead. `score_ia` and `tier` are fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub agency_id: AgencyId,
    pub contact: ContactDetails,
    pub interest: PropertyInterest,
    pub score_ia: u8,
    pub tier: QualificationTier,
    pub recommendation: String,
    pub statut_crm: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lead {
    pub fn belongs_to(&self, agency_id: &AgencyId) -> bool {
        &self.agency_id == agency_id
    }
}

/// Immutable follow-up event attached to a lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: InteractionId,
    pub lead_id: LeadId,
    pub action_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded_by: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Explicit caller identity for agent-facing operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentContext {
    pub agency_id: AgencyId,
    pub agent: Option<String>,
}

impl AgentContext {
    pub fn new(agency_id: AgencyId) -> Self {
        Self {
            agency_id,
            agent: None,
        }
    }

    pub fn with_agent(mut self, agent: impl Into<String>) -> Self {
        self.agent = Some(agent.into());
        self
    }
}

/// Lead listing order for dashboards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadOrdering {
    #[default]
    Newest,
    Oldest,
    Score,
}

/// Lead with its follow-up history, as shown on the agency dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadWithHistory {
    #[serde(flatten)]
    pub lead: Lead,
    pub interactions: Vec<Interaction>,
}

/// Source of timestamps for created and updated records.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_is_a_step_function_over_the_whole_range() {
        for score in 0..=10u8 {
            let tier = QualificationTier::from_score(score);
            let expected = match score {
                7..=10 => QualificationTier::Hot,
                4..=6 => QualificationTier::Warm,
                _ => QualificationTier::Cold,
            };
            assert_eq!(tier, expected, "score {score}");
        }
    }

    #[test]
    fn only_paid_plans_include_the_dashboard() {
        assert!(!SubscriptionPlan::Starter.includes_dashboard());
        assert!(SubscriptionPlan::Pro.includes_dashboard());
        assert!(SubscriptionPlan::Agency.includes_dashboard());
        assert_eq!(SubscriptionPlan::default(), SubscriptionPlan::Starter);
    }

    #[test]
    fn tier_parses_french_and_english_labels() {
        assert_eq!(QualificationTier::parse("Chaud"), Some(QualificationTier::Hot));
        assert_eq!(QualificationTier::parse(" warm "), Some(QualificationTier::Warm));
        assert_eq!(QualificationTier::parse("tiède"), Some(QualificationTier::Warm));
        assert_eq!(QualificationTier::parse("froid"), Some(QualificationTier::Cold));
        assert_eq!(QualificationTier::parse("lukewarm"), None);
    }
}
