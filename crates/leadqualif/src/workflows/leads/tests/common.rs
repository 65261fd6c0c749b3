use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::leads::domain::{
    Agency, AgencyId, AgentContext, Clock, Interaction, Lead, LeadId, SubscriptionPlan,
};
use crate::workflows::leads::intake::{NumericInput, RawLeadSubmission};
use crate::workflows::leads::interactions::InteractionLog;
use crate::workflows::leads::listing::{AdvertisementDrafter, DraftError, PropertyBrief};
use crate::workflows::leads::memory::InMemoryLeadStore;
use crate::workflows::leads::repository::{AgencyDirectory, LeadRepository, RepositoryError};
use crate::workflows::leads::service::LeadQualificationService;

pub(super) type MemoryService =
    LeadQualificationService<InMemoryLeadStore, InMemoryLeadStore, InMemoryLeadStore>;

pub(super) fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn agency(name: &str) -> Agency {
    Agency {
        id: AgencyId::new(),
        display_name: name.to_string(),
        plan: SubscriptionPlan::Pro,
        created_at: epoch(),
        updated_at: epoch(),
    }
}

/// Advances one minute per reading so successive records never share a timestamp.
pub(super) struct SteppingClock {
    next: Mutex<DateTime<Utc>>,
}

impl Default for SteppingClock {
    fn default() -> Self {
        Self {
            next: Mutex::new(epoch()),
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let mut guard = self.next.lock().expect("clock mutex poisoned");
        let current = *guard;
        *guard = current + Duration::minutes(1);
        current
    }
}

/// Always returns the same instant.
pub(super) struct FrozenClock(pub(super) DateTime<Utc>);

impl Clock for FrozenClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub(super) struct Fixture {
    pub(super) service: MemoryService,
    pub(super) store: Arc<InMemoryLeadStore>,
    pub(super) agency: Agency,
    pub(super) other_agency: Agency,
}

impl Fixture {
    pub(super) fn context(&self) -> AgentContext {
        AgentContext::new(self.agency.id).with_agent("camille")
    }

    pub(super) fn other_context(&self) -> AgentContext {
        AgentContext::new(self.other_agency.id)
    }
}

pub(super) fn fixture() -> Fixture {
    let store = Arc::new(InMemoryLeadStore::default());
    let home = agency("Agence du Rhône");
    let other_agency = agency("Agence Côte d'Azur");
    store
        .register_agency(home.clone())
        .expect("agency registered");
    store
        .register_agency(other_agency.clone())
        .expect("agency registered");

    let service = LeadQualificationService::new(store.clone(), store.clone(), store.clone())
        .with_clock(Arc::new(SteppingClock::default()));

    Fixture {
        service,
        store,
        agency: home,
        other_agency,
    }
}

/// Phone, premium budget, Lyon: scores 9.
pub(super) fn hot_submission(agency_id: AgencyId) -> RawLeadSubmission {
    RawLeadSubmission {
        name: Some("Jean Dupont".to_string()),
        email: Some("j@d.fr".to_string()),
        phone: Some("0612345678".to_string()),
        location: Some("Lyon".to_string()),
        budget: Some(NumericInput::from("600 000€")),
        property_type: Some("Maison".to_string()),
        surface: Some(NumericInput::Integer(140)),
        rooms: Some(NumericInput::Integer(5)),
        agency_id: Some(agency_id.to_string()),
        ..RawLeadSubmission::default()
    }
}

/// E-mail only, no budget: scores 1.
pub(super) fn cold_submission(agency_id: AgencyId) -> RawLeadSubmission {
    RawLeadSubmission {
        name: Some("Lucie Bernard".to_string()),
        email: Some("lucie@exemple.fr".to_string()),
        budget: Some(NumericInput::Integer(0)),
        location: Some(String::new()),
        agency_id: Some(agency_id.to_string()),
        ..RawLeadSubmission::default()
    }
}

/// Phone and mid-range budget: scores 7.
pub(super) fn mid_budget_submission(agency_id: AgencyId) -> RawLeadSubmission {
    RawLeadSubmission {
        name: Some("Marc Petit".to_string()),
        email: Some("marc@exemple.fr".to_string()),
        phone: Some("06 98 76 54 32".to_string()),
        budget: Some(NumericInput::from("320000")),
        location: Some("Villeurbanne".to_string()),
        agency_id: Some(agency_id.to_string()),
        ..RawLeadSubmission::default()
    }
}

/// Directory knows the agency; every lead or interaction access fails.
pub(super) struct UnavailableStore {
    pub(super) agency: Agency,
}

impl AgencyDirectory for UnavailableStore {
    fn fetch(&self, id: &AgencyId) -> Result<Option<Agency>, RepositoryError> {
        Ok((id == &self.agency.id).then(|| self.agency.clone()))
    }
}

impl LeadRepository for UnavailableStore {
    fn insert(&self, _lead: Lead) -> Result<Lead, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_status(
        &self,
        _id: &LeadId,
        _status: String,
        _updated_at: DateTime<Utc>,
    ) -> Result<Lead, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &LeadId) -> Result<Option<Lead>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_for_agency(&self, _agency_id: &AgencyId) -> Result<Vec<Lead>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

impl InteractionLog for UnavailableStore {
    fn append(&self, _interaction: Interaction) -> Result<Interaction, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_for(&self, _lead_id: &LeadId) -> Result<Vec<Interaction>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Records the briefs it receives and answers with canned copy.
#[derive(Default)]
pub(super) struct RecordingDrafter {
    pub(super) briefs: Mutex<Vec<PropertyBrief>>,
}

impl AdvertisementDrafter for RecordingDrafter {
    fn draft(&self, brief: &PropertyBrief) -> Result<String, DraftError> {
        self.briefs
            .lock()
            .expect("drafter mutex poisoned")
            .push(brief.clone());
        Ok("Superbe maison familiale".to_string())
    }
}

pub(super) struct OfflineDrafter;

impl AdvertisementDrafter for OfflineDrafter {
    fn draft(&self, _brief: &PropertyBrief) -> Result<String, DraftError> {
        Err(DraftError::Unavailable("quota exceeded".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
