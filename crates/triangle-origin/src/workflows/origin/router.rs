use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use super::engine::QualificationRequest;
use super::error::OriginError;
use super::lookup::ReferenceStore;
use super::normalizer;
use super::repository::{AnalysisId, AnalysisRepository, RepositoryError};
use super::service::{QualificationService, QualificationServiceError};

const LIST_LIMIT: usize = 100;

/// Router builder exposing qualification, normalization, and analysis CRUD endpoints.
pub fn origin_router<S, R>(service: Arc<QualificationService<S, R>>) -> Router
where
    S: ReferenceStore + 'static,
    R: AnalysisRepository + 'static,
{
    Router::new()
        .route("/api/v1/origin/qualify", post(qualify_handler::<S, R>))
        .route("/api/v1/origin/normalize", post(normalize_handler))
        .route(
            "/api/v1/origin/analyses",
            post(create_handler::<S, R>).get(list_handler::<S, R>),
        )
        .route(
            "/api/v1/origin/analyses/:analysis_id",
            get(fetch_handler::<S, R>)
                .put(update_handler::<S, R>)
                .delete(delete_handler::<S, R>),
        )
        .route(
            "/api/v1/origin/analyses/:analysis_id/evaluate",
            post(evaluate_handler::<S, R>),
        )
        .with_state(service)
}

pub(crate) async fn qualify_handler<S, R>(
    State(service): State<Arc<QualificationService<S, R>>>,
    Json(request): Json<QualificationRequest>,
) -> Response
where
    S: ReferenceStore + 'static,
    R: AnalysisRepository + 'static,
{
    match service.analyze(&request).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn normalize_handler(Json(records): Json<Value>) -> Response {
    (StatusCode::OK, Json(normalizer::normalize(records))).into_response()
}

pub(crate) async fn create_handler<S, R>(
    State(service): State<Arc<QualificationService<S, R>>>,
    Json(request): Json<QualificationRequest>,
) -> Response
where
    S: ReferenceStore + 'static,
    R: AnalysisRepository + 'static,
{
    match service.create_draft(request) {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<S, R>(
    State(service): State<Arc<QualificationService<S, R>>>,
) -> Response
where
    S: ReferenceStore + 'static,
    R: AnalysisRepository + 'static,
{
    match service.list(LIST_LIMIT) {
        Ok(records) => {
            let views: Vec<_> = records.iter().map(|record| record.status_view()).collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn fetch_handler<S, R>(
    State(service): State<Arc<QualificationService<S, R>>>,
    Path(analysis_id): Path<String>,
) -> Response
where
    S: ReferenceStore + 'static,
    R: AnalysisRepository + 'static,
{
    match service.get(&AnalysisId(analysis_id)) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_handler<S, R>(
    State(service): State<Arc<QualificationService<S, R>>>,
    Path(analysis_id): Path<String>,
    Json(request): Json<QualificationRequest>,
) -> Response
where
    S: ReferenceStore + 'static,
    R: AnalysisRepository + 'static,
{
    match service.update_draft(&AnalysisId(analysis_id), request) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_handler<S, R>(
    State(service): State<Arc<QualificationService<S, R>>>,
    Path(analysis_id): Path<String>,
) -> Response
where
    S: ReferenceStore + 'static,
    R: AnalysisRepository + 'static,
{
    match service.delete(&AnalysisId(analysis_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn evaluate_handler<S, R>(
    State(service): State<Arc<QualificationService<S, R>>>,
    Path(analysis_id): Path<String>,
) -> Response
where
    S: ReferenceStore + 'static,
    R: AnalysisRepository + 'static,
{
    match service.evaluate(&AnalysisId(analysis_id)).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: QualificationServiceError) -> Response {
    let (status, kind) = match &error {
        QualificationServiceError::Origin(origin) => {
            let status = match origin {
                OriginError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                OriginError::NotFound(_) => StatusCode::NOT_FOUND,
                OriginError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                OriginError::ReferenceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            };
            (status, origin.kind())
        }
        QualificationServiceError::Repository(RepositoryError::NotFound) => {
            (StatusCode::NOT_FOUND, "analysis_not_found")
        }
        QualificationServiceError::Repository(RepositoryError::Conflict) => {
            (StatusCode::CONFLICT, "conflict")
        }
        QualificationServiceError::Repository(RepositoryError::Unavailable(_)) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "repository_unavailable")
        }
    };

    let payload = json!({
        "error": error.to_string(),
        "kind": kind,
    });
    (status, Json(payload)).into_response()
}
