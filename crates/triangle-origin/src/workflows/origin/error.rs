/// Typed failures surfaced by the origin engine. Everything else it computes is total.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OriginError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("no reference rate found for classification {0}")]
    NotFound(String),
    #[error("reference lookup for classification {code} exceeded {timeout_ms} ms")]
    Timeout { code: String, timeout_ms: u64 },
    #[error("reference store unavailable: {0}")]
    ReferenceUnavailable(String),
}

impl OriginError {
    pub const fn kind(&self) -> &'static str {
        match self {
            OriginError::Validation(_) => "validation_error",
            OriginError::NotFound(_) => "not_found",
            OriginError::Timeout { .. } => "timeout",
            OriginError::ReferenceUnavailable(_) => "reference_unavailable",
        }
    }
}
