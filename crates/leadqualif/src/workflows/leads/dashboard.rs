use serde::Serialize;

use super::crm::UNTRIAGED_STATUS;
use super::domain::{Lead, QualificationTier};

/// Minutes of manual triage each automatically qualified lead is assumed to save.
pub const MINUTES_SAVED_PER_LEAD: u64 = 5;

/// Headline figures for one agency's lead queue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_leads: usize,
    pub hot_leads: usize,
    pub warm_leads: usize,
    pub cold_leads: usize,
    pub untriaged_leads: usize,
    pub hot_rate_percent: f64,
    pub minutes_saved: u64,
}

impl DashboardSummary {
    pub fn from_leads(leads: &[Lead]) -> Self {
        let count_tier = |tier: QualificationTier| {
            leads.iter().filter(|lead| lead.tier == tier).count()
        };

        let total_leads = leads.len();
        let hot_leads = count_tier(QualificationTier::Hot);
        let untriaged_leads = leads
            .iter()
            .filter(|lead| lead.statut_crm.trim() == UNTRIAGED_STATUS)
            .count();

        let hot_rate_percent = if total_leads == 0 {
            0.0
        } else {
            let rate = hot_leads as f64 / total_leads as f64 * 100.0;
            (rate * 100.0).round() / 100.0
        };

        Self {
            total_leads,
            hot_leads,
            warm_leads: count_tier(QualificationTier::Warm),
            cold_leads: count_tier(QualificationTier::Cold),
            untriaged_leads,
            hot_rate_percent,
            minutes_saved: total_leads as u64 * MINUTES_SAVED_PER_LEAD,
        }
    }
}
