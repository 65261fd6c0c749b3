use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use super::crm::CrmError;
use super::domain::{AgencyId, AgentContext, LeadId, LeadOrdering, QualificationTier};
use super::intake::{IntakeError, RawLeadSubmission};
use super::interactions::InteractionLog;
use super::repository::{AgencyDirectory, LeadRepository};
use super::service::{LeadQualificationService, LeadQuery, LeadServiceError};

/// Header carrying the caller's agency; authentication happens upstream.
pub const AGENCY_HEADER: &str = "x-agency-id";
pub const AGENT_HEADER: &str = "x-agent";

/// Router builder exposing the public intake and the agency dashboard endpoints.
pub fn lead_router<R, L, D>(service: Arc<LeadQualificationService<R, L, D>>) -> Router
where
    R: LeadRepository + 'static,
    L: InteractionLog + 'static,
    D: AgencyDirectory + 'static,
{
    Router::new()
        .route(
            "/api/v1/leads",
            post(submit_handler::<R, L, D>).get(list_handler::<R, L, D>),
        )
        .route("/api/v1/leads/:lead_id", get(lead_handler::<R, L, D>))
        .route(
            "/api/v1/leads/:lead_id/status",
            put(status_handler::<R, L, D>),
        )
        .route(
            "/api/v1/leads/:lead_id/interactions",
            post(add_interaction_handler::<R, L, D>).get(interactions_handler::<R, L, D>),
        )
        .route("/api/v1/dashboard", get(dashboard_handler::<R, L, D>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListParams {
    #[serde(default)]
    order: Option<String>,
    #[serde(default)]
    tier: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusUpdateRequest {
    #[serde(default, alias = "statut_crm", alias = "statut")]
    status: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InteractionRequest {
    #[serde(default, alias = "type_action")]
    action_type: String,
    #[serde(default)]
    details: Option<String>,
}

type Service<R, L, D> = State<Arc<LeadQualificationService<R, L, D>>>;

pub(crate) async fn submit_handler<R, L, D>(
    State(service): Service<R, L, D>,
    payload: Result<Json<RawLeadSubmission>, JsonRejection>,
) -> Response
where
    R: LeadRepository + 'static,
    L: InteractionLog + 'static,
    D: AgencyDirectory + 'static,
{
    let submission = match json_body(payload) {
        Ok(submission) => submission,
        Err(response) => return response,
    };

    match service.submit(submission) {
        Ok(receipt) => (StatusCode::CREATED, Json(receipt)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_handler<R, L, D>(
    State(service): Service<R, L, D>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Response
where
    R: LeadRepository + 'static,
    L: InteractionLog + 'static,
    D: AgencyDirectory + 'static,
{
    let context = match agent_context(&headers) {
        Ok(context) => context,
        Err(response) => return response,
    };
    let query = match lead_query(&params) {
        Ok(query) => query,
        Err(response) => return response,
    };

    match service.list(&context, query) {
        Ok(leads) => (
            StatusCode::OK,
            Json(json!({ "count": leads.len(), "leads": leads })),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn lead_handler<R, L, D>(
    State(service): Service<R, L, D>,
    headers: HeaderMap,
    Path(lead_id): Path<String>,
) -> Response
where
    R: LeadRepository + 'static,
    L: InteractionLog + 'static,
    D: AgencyDirectory + 'static,
{
    let (context, lead_id) = match scoped_lead(&headers, &lead_id) {
        Ok(scope) => scope,
        Err(response) => return response,
    };

    match service.get_with_history(&context, &lead_id) {
        Ok(lead) => (StatusCode::OK, Json(lead)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn status_handler<R, L, D>(
    State(service): Service<R, L, D>,
    headers: HeaderMap,
    Path(lead_id): Path<String>,
    payload: Result<Json<StatusUpdateRequest>, JsonRejection>,
) -> Response
where
    R: LeadRepository + 'static,
    L: InteractionLog + 'static,
    D: AgencyDirectory + 'static,
{
    let (context, lead_id) = match scoped_lead(&headers, &lead_id) {
        Ok(scope) => scope,
        Err(response) => return response,
    };
    let request = match json_body(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    match service.update_status(&context, &lead_id, &request.status) {
        Ok(lead) => (StatusCode::OK, Json(lead)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn add_interaction_handler<R, L, D>(
    State(service): Service<R, L, D>,
    headers: HeaderMap,
    Path(lead_id): Path<String>,
    payload: Result<Json<InteractionRequest>, JsonRejection>,
) -> Response
where
    R: LeadRepository + 'static,
    L: InteractionLog + 'static,
    D: AgencyDirectory + 'static,
{
    let (context, lead_id) = match scoped_lead(&headers, &lead_id) {
        Ok(scope) => scope,
        Err(response) => return response,
    };
    let request = match json_body(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    match service.add_interaction(
        &context,
        &lead_id,
        &request.action_type,
        request.details.as_deref(),
    ) {
        Ok(interaction) => (StatusCode::CREATED, Json(interaction)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn interactions_handler<R, L, D>(
    State(service): Service<R, L, D>,
    headers: HeaderMap,
    Path(lead_id): Path<String>,
) -> Response
where
    R: LeadRepository + 'static,
    L: InteractionLog + 'static,
    D: AgencyDirectory + 'static,
{
    let (context, lead_id) = match scoped_lead(&headers, &lead_id) {
        Ok(scope) => scope,
        Err(response) => return response,
    };

    match service.interactions(&context, &lead_id) {
        Ok(interactions) => (StatusCode::OK, Json(interactions)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn dashboard_handler<R, L, D>(
    State(service): Service<R, L, D>,
    headers: HeaderMap,
) -> Response
where
    R: LeadRepository + 'static,
    L: InteractionLog + 'static,
    D: AgencyDirectory + 'static,
{
    let context = match agent_context(&headers) {
        Ok(context) => context,
        Err(response) => return response,
    };

    match service.dashboard(&context) {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(err) => error_response(err),
    }
}

fn agent_context(headers: &HeaderMap) -> Result<AgentContext, Response> {
    let agency = headers
        .get(AGENCY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| error_response(IntakeError::TenantRequired.into()))?;

    let agency_id = Uuid::parse_str(agency).map(AgencyId).map_err(|_| {
        error_response(
            IntakeError::InvalidAgencyId {
                value: agency.to_string(),
            }
            .into(),
        )
    })?;

    let context = AgentContext::new(agency_id);
    let agent = headers
        .get(AGENT_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    Ok(match agent {
        Some(agent) => context.with_agent(agent),
        None => context,
    })
}

fn scoped_lead(headers: &HeaderMap, raw_id: &str) -> Result<(AgentContext, LeadId), Response> {
    let context = agent_context(headers)?;
    let lead_id = Uuid::parse_str(raw_id.trim()).map(LeadId).map_err(|_| {
        let payload = json!({
            "error": format!("'{raw_id}' is not a valid lead identifier"),
            "code": "invalid_lead_id",
        });
        (StatusCode::BAD_REQUEST, Json(payload)).into_response()
    })?;
    Ok((context, lead_id))
}

fn lead_query(params: &ListParams) -> Result<LeadQuery, Response> {
    let ordering = match params.order.as_deref().map(str::trim) {
        None | Some("") | Some("newest") => LeadOrdering::Newest,
        Some("oldest") => LeadOrdering::Oldest,
        Some("score") => LeadOrdering::Score,
        Some(other) => return Err(bad_query(format!("unknown ordering '{other}'"))),
    };

    let tier = match params.tier.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => match QualificationTier::parse(raw) {
            Some(tier) => Some(tier),
            None => return Err(bad_query(format!("unknown tier '{raw}'"))),
        },
    };

    Ok(LeadQuery { ordering, tier })
}

/// Body rejections keep axum's status but use the same JSON error shape as everything else.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    payload.map(|Json(value)| value).map_err(|rejection| {
        let payload = json!({ "error": rejection.body_text(), "code": "invalid_body" });
        (rejection.status(), Json(payload)).into_response()
    })
}

fn bad_query(message: String) -> Response {
    let payload = json!({ "error": message, "code": "invalid_query" });
    (StatusCode::BAD_REQUEST, Json(payload)).into_response()
}

pub(crate) fn error_code(err: &LeadServiceError) -> &'static str {
    match err {
        LeadServiceError::Intake(IntakeError::MissingRequiredField { .. }) => {
            "missing_required_field"
        }
        LeadServiceError::Intake(IntakeError::TenantRequired) => "tenant_required",
        LeadServiceError::Intake(IntakeError::InvalidAgencyId { .. }) => "invalid_agency_id",
        LeadServiceError::AgencyNotFound(_) => "agency_not_found",
        LeadServiceError::LeadNotFound(_) => "lead_not_found",
        LeadServiceError::PlanRestricted(_) => "plan_restricted",
        LeadServiceError::Crm(CrmError::MissingValue { .. }) => "missing_value",
        LeadServiceError::Crm(CrmError::UnknownStatus(_)) => "unknown_status",
        LeadServiceError::Draft(_) => "copywriter_unavailable",
        LeadServiceError::Repository(_) => "storage_unavailable",
    }
}

pub(crate) fn error_response(err: LeadServiceError) -> Response {
    let status = match &err {
        LeadServiceError::Intake(_) | LeadServiceError::Crm(CrmError::MissingValue { .. }) => {
            StatusCode::BAD_REQUEST
        }
        LeadServiceError::Crm(CrmError::UnknownStatus(_)) => StatusCode::UNPROCESSABLE_ENTITY,
        LeadServiceError::AgencyNotFound(_) | LeadServiceError::LeadNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        LeadServiceError::PlanRestricted(_) => StatusCode::FORBIDDEN,
        LeadServiceError::Draft(_) => StatusCode::BAD_GATEWAY,
        LeadServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let message = match &err {
        LeadServiceError::Repository(_) => {
            error!(error = %err, "lead storage failure");
            "internal storage error".to_string()
        }
        LeadServiceError::Draft(_) => {
            error!(error = %err, "advertisement copywriter failure");
            "advertisement copywriter unavailable".to_string()
        }
        _ => err.to_string(),
    };

    let payload = json!({ "error": message, "code": error_code(&err) });
    (status, Json(payload)).into_response()
}
