use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryAnalysisRepository};
use crate::routes::with_origin_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};
use triangle_origin::config::AppConfig;
use triangle_origin::error::AppError;
use triangle_origin::telemetry;
use triangle_origin::workflows::origin::QualificationService;
use triangle_origin::workflows::reference::{InMemoryReferenceStore, ReferenceImporter};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let store = match &config.origin.rate_table_path {
        Some(path) => ReferenceImporter::from_path(path)?,
        None => {
            warn!("ORIGIN_RATE_TABLE not set; every rate lookup will report not found");
            InMemoryReferenceStore::new()
        }
    };

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryAnalysisRepository::default());
    let qualification_service = Arc::new(QualificationService::with_timeout(
        Arc::new(store),
        repository,
        config.origin.engine_config(),
        config.origin.lookup_timeout,
    ));

    let app = with_origin_routes(qualification_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        lookup_timeout_ms = config.origin.lookup_timeout.as_millis() as u64,
        "origin qualification service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
