use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use triangle_origin::workflows::origin::{
    AnalysisId, AnalysisRecord, AnalysisRepository, RepositoryError,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAnalysisRepository {
    records: Arc<Mutex<HashMap<AnalysisId, AnalysisRecord>>>,
}

impl AnalysisRepository for InMemoryAnalysisRepository {
    fn insert(&self, record: AnalysisRecord) -> Result<AnalysisRecord, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: AnalysisRecord) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        if guard.contains_key(&record.id) {
            guard.insert(record.id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &AnalysisId) -> Result<Option<AnalysisRecord>, RepositoryError> {
        Ok(self.lock()?.get(id).cloned())
    }

    /// Most recently touched first.
    fn list(&self, limit: usize) -> Result<Vec<AnalysisRecord>, RepositoryError> {
        let guard = self.lock()?;
        let mut records: Vec<_> = guard.values().cloned().collect();
        records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id)));
        records.truncate(limit);
        Ok(records)
    }

    fn delete(&self, id: &AnalysisId) -> Result<(), RepositoryError> {
        self.lock()?
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

impl InMemoryAnalysisRepository {
    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<AnalysisId, AnalysisRecord>>, RepositoryError>
    {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("analysis store lock poisoned".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use triangle_origin::workflows::origin::{
        ClassificationCode, OriginComponent, QualificationRequest, TradeVolume,
    };

    fn record() -> AnalysisRecord {
        AnalysisRecord::draft(QualificationRequest {
            product_description: "Seat frame".to_string(),
            classification_code: ClassificationCode::parse("9401.90").expect("valid code"),
            components: vec![OriginComponent::new("CA", 100.0)],
            trade_volume: TradeVolume::Amount(10_000.0),
        })
    }

    #[test]
    fn list_returns_most_recent_first() {
        let repository = InMemoryAnalysisRepository::default();
        let older = record();
        let mut newer = record();
        newer.updated_at = older.updated_at + Duration::seconds(5);

        repository.insert(older.clone()).expect("insert");
        repository.insert(newer.clone()).expect("insert");

        let listed = repository.list(10).expect("list");
        assert_eq!(listed[0].id, newer.id);
        assert_eq!(repository.list(1).expect("list").len(), 1);
    }

    #[test]
    fn update_requires_existing_record() {
        let repository = InMemoryAnalysisRepository::default();
        assert!(matches!(
            repository.update(record()),
            Err(RepositoryError::NotFound)
        ));

        let stored = repository.insert(record()).expect("insert");
        assert!(matches!(
            repository.insert(stored),
            Err(RepositoryError::Conflict)
        ));
    }
}
