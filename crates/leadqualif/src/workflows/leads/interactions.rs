use super::domain::{Interaction, LeadId};
use super::repository::RepositoryError;

/// Append-only follow-up log; entries are never updated or deleted.
///
/// Concurrent appends are not coordinated; each one persists on its own.
pub trait InteractionLog: Send + Sync {
    fn append(&self, interaction: Interaction) -> Result<Interaction, RepositoryError>;
    /// Entries for `lead_id` in append order.
    fn list_for(&self, lead_id: &LeadId) -> Result<Vec<Interaction>, RepositoryError>;
}

/// Display order: latest timestamp first, later appends first among equal timestamps.
pub fn newest_first(mut entries: Vec<Interaction>) -> Vec<Interaction> {
    entries.reverse();
    entries.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
    entries
}
