//! USMCA origin qualification and tariff-savings estimation.
//!
//! A request flows through the content aggregator, the threshold evaluator, the reference
//! rate lookup, and the savings calculator. Only the rate lookup suspends; everything else
//! is a pure function of the request and the immutable [`EngineConfig`].

pub mod config;
mod content;
pub mod domain;
mod engine;
mod error;
pub mod lookup;
pub mod normalizer;
mod qualification;
pub mod repository;
pub mod router;
mod savings;
pub mod service;
mod volume;

#[cfg(test)]
mod tests;

pub use config::{EngineConfig, SupplementalTariffProgram, ThresholdTable};
pub use content::aggregate;
pub use domain::{
    ClassificationCode, CountryCode, Money, OriginComponent, Percentage, QualificationResult,
    SavingsReport, SupplementalTariffExposure, TariffRateRecord, ThresholdSource,
};
pub use engine::{AnalysisReport, OriginEngine, QualificationRequest};
pub use error::OriginError;
pub use lookup::{RateTableLookup, ReferenceError, ReferenceStore};
pub use normalizer::{normalize, RawRecord};
pub use qualification::evaluate;
pub use repository::{
    AnalysisId, AnalysisRecord, AnalysisRepository, AnalysisStatus, AnalysisStatusView,
    RepositoryError,
};
pub use router::origin_router;
pub use savings::SavingsCalculator;
pub use service::{QualificationService, QualificationServiceError};
pub use volume::{parse_trade_volume, TradeVolume};
