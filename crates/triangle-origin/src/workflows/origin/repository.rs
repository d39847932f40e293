use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::engine::{AnalysisReport, QualificationRequest};

/// Identifier wrapper for stored analyses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnalysisId(pub String);

impl AnalysisId {
    pub fn generate() -> Self {
        Self(format!("analysis-{}", Uuid::new_v4()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Draft,
    Evaluated,
}

impl AnalysisStatus {
    pub const fn label(self) -> &'static str {
        match self {
            AnalysisStatus::Draft => "draft",
            AnalysisStatus::Evaluated => "evaluated",
        }
    }
}

/// Persisted analysis: the request as entered plus the latest report, if any.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: AnalysisId,
    pub status: AnalysisStatus,
    pub request: QualificationRequest,
    pub report: Option<AnalysisReport>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AnalysisRecord {
    pub fn draft(request: QualificationRequest) -> Self {
        let now = Utc::now();
        Self {
            id: AnalysisId::generate(),
            status: AnalysisStatus::Draft,
            request,
            report: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn status_view(&self) -> AnalysisStatusView {
        AnalysisStatusView {
            analysis_id: self.id.clone(),
            status: self.status.label(),
            classification_code: self.request.classification_code.to_string(),
            qualified: self
                .report
                .as_ref()
                .map(|report| report.qualification.qualified),
            summary: self
                .report
                .as_ref()
                .map(|report| report.summary.clone())
                .unwrap_or_else(|| "pending evaluation".to_string()),
            updated_at: self.updated_at,
        }
    }
}

/// Persistence collaborator for analyses. Implementations own storage; the engine keeps none.
pub trait AnalysisRepository: Send + Sync {
    fn insert(&self, record: AnalysisRecord) -> Result<AnalysisRecord, RepositoryError>;
    fn update(&self, record: AnalysisRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &AnalysisId) -> Result<Option<AnalysisRecord>, RepositoryError>;
    fn list(&self, limit: usize) -> Result<Vec<AnalysisRecord>, RepositoryError>;
    fn delete(&self, id: &AnalysisId) -> Result<(), RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Compact view returned by listing and status endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisStatusView {
    pub analysis_id: AnalysisId,
    pub status: &'static str,
    pub classification_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualified: Option<bool>,
    pub summary: String,
    pub updated_at: DateTime<Utc>,
}
