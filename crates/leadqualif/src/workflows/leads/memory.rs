use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use super::domain::{Agency, AgencyId, Interaction, Lead, LeadId};
use super::interactions::InteractionLog;
use super::repository::{AgencyDirectory, LeadRepository, RepositoryError};

/// Process-local store backing the tenant registry, leads and interaction log.
#[derive(Default, Clone)]
pub struct InMemoryLeadStore {
    agencies: Arc<Mutex<HashMap<AgencyId, Agency>>>,
    leads: Arc<Mutex<HashMap<LeadId, Lead>>>,
    interactions: Arc<Mutex<HashMap<LeadId, Vec<Interaction>>>>,
}

fn lock<'a, T>(mutex: &'a Mutex<T>, name: &str) -> Result<MutexGuard<'a, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable(format!("{name} store poisoned")))
}

impl InMemoryLeadStore {
    /// Provision an agency; replaces an existing entry with the same id.
    pub fn register_agency(&self, agency: Agency) -> Result<(), RepositoryError> {
        lock(&self.agencies, "agency")?.insert(agency.id, agency);
        Ok(())
    }

    pub fn lead_count(&self) -> Result<usize, RepositoryError> {
        Ok(lock(&self.leads, "lead")?.len())
    }

    pub fn interaction_count(&self) -> Result<usize, RepositoryError> {
        Ok(lock(&self.interactions, "interaction")?
            .values()
            .map(Vec::len)
            .sum())
    }
}

impl AgencyDirectory for InMemoryLeadStore {
    fn fetch(&self, id: &AgencyId) -> Result<Option<Agency>, RepositoryError> {
        Ok(lock(&self.agencies, "agency")?.get(id).cloned())
    }
}

impl LeadRepository for InMemoryLeadStore {
    fn insert(&self, lead: Lead) -> Result<Lead, RepositoryError> {
        let mut guard = lock(&self.leads, "lead")?;
        if guard.contains_key(&lead.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(lead.id, lead.clone());
        Ok(lead)
    }

    fn update_status(
        &self,
        id: &LeadId,
        status: String,
        updated_at: DateTime<Utc>,
    ) -> Result<Lead, RepositoryError> {
        let mut guard = lock(&self.leads, "lead")?;
        let lead = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        lead.statut_crm = status;
        lead.updated_at = updated_at;
        Ok(lead.clone())
    }

    fn fetch(&self, id: &LeadId) -> Result<Option<Lead>, RepositoryError> {
        Ok(lock(&self.leads, "lead")?.get(id).cloned())
    }

    fn list_for_agency(&self, agency_id: &AgencyId) -> Result<Vec<Lead>, RepositoryError> {
        Ok(lock(&self.leads, "lead")?
            .values()
            .filter(|lead| lead.belongs_to(agency_id))
            .cloned()
            .collect())
    }
}

impl InteractionLog for InMemoryLeadStore {
    fn append(&self, interaction: Interaction) -> Result<Interaction, RepositoryError> {
        lock(&self.interactions, "interaction")?
            .entry(interaction.lead_id)
            .or_default()
            .push(interaction.clone());
        Ok(interaction)
    }

    fn list_for(&self, lead_id: &LeadId) -> Result<Vec<Interaction>, RepositoryError> {
        Ok(lock(&self.interactions, "interaction")?
            .get(lead_id)
            .cloned()
            .unwrap_or_default())
    }
}
