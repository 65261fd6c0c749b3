use crate::cli::ServeArgs;
use crate::infra::{resolved_leads_config, seed_default_agency, AppState};
use crate::routes::with_lead_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use leadqualif::config::AppConfig;
use leadqualif::error::AppError;
use leadqualif::telemetry;
use leadqualif::workflows::leads::{InMemoryLeadStore, LeadQualificationService};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{error, info};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemoryLeadStore::default());
    let agency = seed_default_agency(&store, &config.leads).map_err(|err| {
        error!(error = %err, "failed to seed default agency");
        AppError::Leads(err.into())
    })?;
    info!(
        agency_id = %agency.id,
        multi_tenant = config.leads.multi_tenant,
        "default agency registered"
    );

    let leads_config = resolved_leads_config(&config.leads, agency.id);
    let lead_service = Arc::new(LeadQualificationService::from_config(
        store.clone(),
        store.clone(),
        store,
        &leads_config,
    ));

    let app = with_lead_routes(lead_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "lead qualification service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
