use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use triangle_origin::workflows::origin::{
    origin_router, AnalysisRepository, QualificationService, ReferenceStore,
};

pub(crate) fn with_origin_routes<S, R>(service: Arc<QualificationService<S, R>>) -> axum::Router
where
    S: ReferenceStore + 'static,
    R: AnalysisRepository + 'static,
{
    origin_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "checked_at": Utc::now() }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryAnalysisRepository;
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt;
    use triangle_origin::workflows::origin::EngineConfig;
    use triangle_origin::workflows::reference::InMemoryReferenceStore;

    fn app(ready: bool) -> axum::Router {
        let service = Arc::new(QualificationService::new(
            Arc::new(InMemoryReferenceStore::new()),
            Arc::new(InMemoryAnalysisRepository::default()),
            EngineConfig::standard(),
        ));
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_origin_routes(service).layer(Extension(state))
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).expect("request")
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = app(true).oneshot(get("/health")).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn readiness_follows_flag() {
        let response = app(false).oneshot(get("/ready")).await.expect("response");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let state = AppState {
            readiness: Arc::new(AtomicBool::new(false)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        state.readiness.store(true, Ordering::Release);
        let response = readiness_endpoint(Extension(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn metrics_are_plain_text() {
        let response = app(true).oneshot(get("/metrics")).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()),
            Some("text/plain; version=0.0.4")
        );
    }

    #[tokio::test]
    async fn origin_routes_are_mounted() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/origin/normalize")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"mfn_tariff_rate": 3}"#))
            .expect("request");

        let response = app(true).oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }
}
