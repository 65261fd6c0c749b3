use chrono::Utc;
use leadqualif::config::LeadsConfig;
use leadqualif::workflows::leads::{
    Agency, AgencyId, InMemoryLeadStore, RepositoryError, SubscriptionPlan,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Registers the agency public submissions default to, creating an id when none is configured.
/// The seeded agency is on the pro plan so the dashboard is reachable.
pub(crate) fn seed_default_agency(
    store: &InMemoryLeadStore,
    config: &LeadsConfig,
) -> Result<Agency, RepositoryError> {
    let now = Utc::now();
    let agency = Agency {
        id: config.default_agency.unwrap_or_default(),
        display_name: "Agence par défaut".to_string(),
        plan: SubscriptionPlan::Pro,
        created_at: now,
        updated_at: now,
    };
    store.register_agency(agency.clone())?;
    Ok(agency)
}

/// Config with the seeded agency filled in so single-tenant intake can route to it.
pub(crate) fn resolved_leads_config(config: &LeadsConfig, seeded: AgencyId) -> LeadsConfig {
    LeadsConfig {
        default_agency: Some(seeded),
        ..config.clone()
    }
}
