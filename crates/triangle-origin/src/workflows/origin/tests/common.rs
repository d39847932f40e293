use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::{json, Value};

use crate::workflows::origin::{
    origin_router, AnalysisId, AnalysisRecord, AnalysisRepository, ClassificationCode,
    EngineConfig, OriginComponent, QualificationRequest, QualificationService, RawRecord,
    ReferenceError, ReferenceStore, RepositoryError, ThresholdTable, TradeVolume,
};
use crate::workflows::reference::InMemoryReferenceStore;

pub(super) fn code(raw: &str) -> ClassificationCode {
    ClassificationCode::parse(raw).expect("valid classification code")
}

pub(super) fn engine_config() -> EngineConfig {
    let mut config = EngineConfig::standard().with_tolerance(0.5);
    config.thresholds = ThresholdTable::new(60.0).with_chapter("87", 75.0);
    config
}

pub(super) fn mexico_china_components() -> Vec<OriginComponent> {
    vec![
        OriginComponent::new("MX", 60.0).described("assembly", "Final assembly"),
        OriginComponent::new("CN", 40.0).described("electronics", "Control board"),
    ]
}

pub(super) fn mixed_components() -> Vec<OriginComponent> {
    vec![
        OriginComponent::new("US", 30.0).described("housing", "Aluminum housing"),
        OriginComponent::new("CA", 20.0).described("wiring", "Harness"),
        OriginComponent::new("CN", 50.0).described("electronics", "Display module"),
    ]
}

pub(super) fn request(components: Vec<OriginComponent>) -> QualificationRequest {
    QualificationRequest {
        product_description: "Industrial control panel".to_string(),
        classification_code: code("8537.10.90"),
        components,
        trade_volume: TradeVolume::Amount(1_000_000.0),
    }
}

pub(super) fn reference_store() -> InMemoryReferenceStore {
    InMemoryReferenceStore::new()
        .with_record(
            code("8537.10.90"),
            json!({ "mfn_tariff_rate": 10, "usmca_tariff_rate": 0, "origin_country": "CN" }),
        )
        .with_record(
            code("9403.20"),
            json!({ "mfn_rate": "4.5%", "origin_country": "Mexico" }),
        )
}

pub(super) type MemoryService = QualificationService<InMemoryReferenceStore, MemoryRepository>;

pub(super) fn build_service() -> (MemoryService, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = QualificationService::new(
        Arc::new(reference_store()),
        repository.clone(),
        engine_config(),
    );
    (service, repository)
}

pub(super) fn origin_router_with_service(service: MemoryService) -> axum::Router {
    origin_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<AnalysisId, AnalysisRecord>>>,
}

impl AnalysisRepository for MemoryRepository {
    fn insert(&self, record: AnalysisRecord) -> Result<AnalysisRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: AnalysisRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &AnalysisId) -> Result<Option<AnalysisRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self, limit: usize) -> Result<Vec<AnalysisRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().take(limit).cloned().collect())
    }

    fn delete(&self, id: &AnalysisId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }
}

pub(super) struct UnavailableRepository;

impl AnalysisRepository for UnavailableRepository {
    fn insert(&self, _record: AnalysisRecord) -> Result<AnalysisRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: AnalysisRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &AnalysisId) -> Result<Option<AnalysisRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self, _limit: usize) -> Result<Vec<AnalysisRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: &AnalysisId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Store that never answers within a short deadline.
pub(super) struct SlowStore {
    pub(super) delay: Duration,
}

#[async_trait]
impl ReferenceStore for SlowStore {
    async fn rate_record(
        &self,
        _classification_code: &ClassificationCode,
    ) -> Result<Option<RawRecord>, ReferenceError> {
        tokio::time::sleep(self.delay).await;
        Ok(Some(json!({ "mfn_rate": 5, "usmca_rate": 0 })))
    }
}

pub(super) struct OfflineStore;

#[async_trait]
impl ReferenceStore for OfflineStore {
    async fn rate_record(
        &self,
        _classification_code: &ClassificationCode,
    ) -> Result<Option<RawRecord>, ReferenceError> {
        Err(ReferenceError::Unavailable("connection refused".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
