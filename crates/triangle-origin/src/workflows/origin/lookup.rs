use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::domain::{ClassificationCode, TariffRateRecord};
use super::error::OriginError;
use super::normalizer::{self, RawRecord};

pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(2);

/// Read-only reference data keyed by classification code. Missing keys are `Ok(None)`.
#[async_trait]
pub trait ReferenceStore: Send + Sync {
    async fn rate_record(
        &self,
        classification_code: &ClassificationCode,
    ) -> Result<Option<RawRecord>, ReferenceError>;
}

/// Transport-level failure of the reference store.
#[derive(Debug, thiserror::Error)]
pub enum ReferenceError {
    #[error("reference store unavailable: {0}")]
    Unavailable(String),
}

/// Resolves canonical duty rates for a classification code within a deadline.
pub struct RateTableLookup<S> {
    store: Arc<S>,
    timeout: Duration,
}

impl<S> RateTableLookup<S>
where
    S: ReferenceStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self::with_timeout(store, DEFAULT_LOOKUP_TIMEOUT)
    }

    pub fn with_timeout(store: Arc<S>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn lookup(
        &self,
        classification_code: &ClassificationCode,
    ) -> Result<TariffRateRecord, OriginError> {
        let fetched =
            tokio::time::timeout(self.timeout, self.store.rate_record(classification_code)).await;

        let raw = match fetched {
            Err(_) => {
                warn!(code = %classification_code, timeout_ms = self.timeout.as_millis() as u64, "reference lookup timed out");
                return Err(OriginError::Timeout {
                    code: classification_code.to_string(),
                    timeout_ms: self.timeout.as_millis() as u64,
                });
            }
            Ok(Err(ReferenceError::Unavailable(reason))) => {
                return Err(OriginError::ReferenceUnavailable(reason));
            }
            Ok(Ok(None)) => return Err(OriginError::NotFound(classification_code.to_string())),
            Ok(Ok(Some(raw))) => raw,
        };

        let normalized = normalizer::normalize_record(raw);
        let record = normalizer::rate_record_from(&normalized, classification_code.clone());
        debug!(
            code = %record.classification_code,
            mfn_rate = record.mfn_rate,
            preferential_rate = record.preferential_rate,
            "resolved reference rates"
        );
        Ok(record)
    }
}
