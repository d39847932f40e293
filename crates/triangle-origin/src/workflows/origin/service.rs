use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::info;

use super::config::EngineConfig;
use super::engine::{AnalysisReport, OriginEngine, QualificationRequest};
use super::error::OriginError;
use super::lookup::{RateTableLookup, ReferenceStore, DEFAULT_LOOKUP_TIMEOUT};
use super::repository::{
    AnalysisId, AnalysisRecord, AnalysisRepository, AnalysisStatus, RepositoryError,
};

/// Service composing the rules engine, the reference lookup, and analysis storage.
pub struct QualificationService<S, R> {
    engine: Arc<OriginEngine>,
    lookup: RateTableLookup<S>,
    repository: Arc<R>,
}

impl<S, R> QualificationService<S, R>
where
    S: ReferenceStore + 'static,
    R: AnalysisRepository + 'static,
{
    pub fn new(store: Arc<S>, repository: Arc<R>, config: EngineConfig) -> Self {
        Self::with_timeout(store, repository, config, DEFAULT_LOOKUP_TIMEOUT)
    }

    pub fn with_timeout(
        store: Arc<S>,
        repository: Arc<R>,
        config: EngineConfig,
        lookup_timeout: Duration,
    ) -> Self {
        Self {
            engine: Arc::new(OriginEngine::new(config)),
            lookup: RateTableLookup::with_timeout(store, lookup_timeout),
            repository,
        }
    }

    pub fn engine(&self) -> &OriginEngine {
        &self.engine
    }

    /// Run the full pipeline for one request without persisting anything.
    pub async fn analyze(
        &self,
        request: &QualificationRequest,
    ) -> Result<AnalysisReport, QualificationServiceError> {
        let trade_volume = request.trade_volume.amount()?;
        let qualification = self
            .engine
            .qualify(&request.components, &request.classification_code)?;
        let rates = self.lookup.lookup(&request.classification_code).await?;

        Ok(self
            .engine
            .report(request, trade_volume, qualification, rates))
    }

    /// Store a request as a draft for later evaluation.
    pub fn create_draft(
        &self,
        request: QualificationRequest,
    ) -> Result<AnalysisRecord, QualificationServiceError> {
        let record = AnalysisRecord::draft(request);
        let stored = self.repository.insert(record)?;
        info!(analysis_id = %stored.id.0, "analysis draft created");
        Ok(stored)
    }

    /// Replace a stored request; any earlier report no longer applies.
    pub fn update_draft(
        &self,
        id: &AnalysisId,
        request: QualificationRequest,
    ) -> Result<AnalysisRecord, QualificationServiceError> {
        let mut record = self.get(id)?;
        record.request = request;
        record.report = None;
        record.status = AnalysisStatus::Draft;
        record.updated_at = Utc::now();

        self.repository.update(record.clone())?;
        Ok(record)
    }

    /// Evaluate a stored analysis and persist the report.
    pub async fn evaluate(
        &self,
        id: &AnalysisId,
    ) -> Result<AnalysisRecord, QualificationServiceError> {
        let mut record = self.get(id)?;
        let report = self.analyze(&record.request).await?;

        record.report = Some(report);
        record.status = AnalysisStatus::Evaluated;
        record.updated_at = Utc::now();

        self.repository.update(record.clone())?;
        Ok(record)
    }

    pub fn get(&self, id: &AnalysisId) -> Result<AnalysisRecord, QualificationServiceError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn list(&self, limit: usize) -> Result<Vec<AnalysisRecord>, QualificationServiceError> {
        Ok(self.repository.list(limit)?)
    }

    pub fn delete(&self, id: &AnalysisId) -> Result<(), QualificationServiceError> {
        self.repository.delete(id)?;
        info!(analysis_id = %id.0, "analysis deleted");
        Ok(())
    }
}

/// Error raised by the qualification service.
#[derive(Debug, thiserror::Error)]
pub enum QualificationServiceError {
    #[error(transparent)]
    Origin(#[from] OriginError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
