use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryContactStore};
use crate::routes::with_enrichment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use contact_enrichment::config::AppConfig;
use contact_enrichment::error::AppError;
use contact_enrichment::telemetry;
use contact_enrichment::workflows::enrichment::{
    ContactEnrichmentService, HubSpotContactStore, ReferenceData,
};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let reference = Arc::new(ReferenceData::load(&config.reference_data)?);
    info!(
        companies = reference.companies.len(),
        title_patterns = reference.patterns.len(),
        "reference data loaded"
    );

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let router = if args.in_memory {
        let store = Arc::new(InMemoryContactStore::seeded());
        let service = ContactEnrichmentService::new(store.clone(), store, reference);
        with_enrichment_routes(Arc::new(service))
    } else {
        let store = Arc::new(HubSpotContactStore::new(
            &config.crm.base_url,
            config.crm.require_access_token()?,
            config.crm.timeout,
        )?);
        let service = ContactEnrichmentService::new(store.clone(), store, reference);
        with_enrichment_routes(Arc::new(service))
    };

    let app = router
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        in_memory = args.in_memory,
        "contact enrichment service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
