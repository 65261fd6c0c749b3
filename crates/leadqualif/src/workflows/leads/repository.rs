use chrono::{DateTime, Utc};

use super::domain::{Agency, AgencyId, Lead, LeadId, LeadOrdering};

/// Storage abstraction for leads so the service can be exercised in isolation.
///
/// Every write touches a single record and must be atomic; a failed insert leaves
/// nothing visible to later queries.
pub trait LeadRepository: Send + Sync {
    fn insert(&self, lead: Lead) -> Result<Lead, RepositoryError>;
    fn update_status(
        &self,
        id: &LeadId,
        status: String,
        updated_at: DateTime<Utc>,
    ) -> Result<Lead, RepositoryError>;
    fn fetch(&self, id: &LeadId) -> Result<Option<Lead>, RepositoryError>;
    fn list_for_agency(&self, agency_id: &AgencyId) -> Result<Vec<Lead>, RepositoryError>;
}

/// Read side of the tenant registry.
pub trait AgencyDirectory: Send + Sync {
    fn fetch(&self, id: &AgencyId) -> Result<Option<Agency>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Sort for display. Equal timestamps fall back to the lead id so the order is stable
/// across calls, and `Oldest` is always the exact reverse of `Newest`.
pub fn order_leads(leads: &mut [Lead], ordering: LeadOrdering) {
    let newest_first = |a: &Lead, b: &Lead| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    };
    match ordering {
        LeadOrdering::Newest => leads.sort_by(newest_first),
        LeadOrdering::Oldest => leads.sort_by(|a, b| newest_first(b, a)),
        LeadOrdering::Score => leads.sort_by(|a, b| {
            b.score_ia
                .cmp(&a.score_ia)
                .then_with(|| newest_first(a, b))
        }),
    }
}
