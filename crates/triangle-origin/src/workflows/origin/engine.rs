use serde::{Deserialize, Serialize};
use tracing::info;

use super::config::EngineConfig;
use super::content;
use super::domain::{
    ClassificationCode, Money, OriginComponent, Percentage, QualificationResult, SavingsReport,
    TariffRateRecord,
};
use super::error::OriginError;
use super::qualification;
use super::savings::SavingsCalculator;
use super::volume::TradeVolume;

/// Caller-supplied description of one product to qualify.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualificationRequest {
    #[serde(default)]
    pub product_description: String,
    #[serde(alias = "hs_code")]
    pub classification_code: ClassificationCode,
    #[serde(alias = "component_origins")]
    pub components: Vec<OriginComponent>,
    pub trade_volume: TradeVolume,
}

/// Everything the engine derived for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub product_description: String,
    pub classification_code: ClassificationCode,
    pub trade_volume: Money,
    pub qualification: QualificationResult,
    pub rates: TariffRateRecord,
    pub savings: SavingsReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preference_criterion: Option<String>,
    pub documentation_required: Vec<String>,
    pub summary: String,
}

/// Stateless rules engine over an immutable [`EngineConfig`].
#[derive(Debug, Clone)]
pub struct OriginEngine {
    config: EngineConfig,
}

impl OriginEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn aggregate(&self, components: &[OriginComponent]) -> Result<Percentage, OriginError> {
        content::aggregate(
            components,
            &self.config.north_american_bloc,
            self.config.tolerance(),
        )
    }

    pub fn evaluate(
        &self,
        content_percentage: Percentage,
        classification_code: &ClassificationCode,
    ) -> QualificationResult {
        qualification::evaluate(
            content_percentage,
            classification_code,
            &self.config.thresholds,
        )
    }

    pub fn qualify(
        &self,
        components: &[OriginComponent],
        classification_code: &ClassificationCode,
    ) -> Result<QualificationResult, OriginError> {
        let content = self.aggregate(components)?;
        Ok(self.evaluate(content, classification_code))
    }

    pub fn savings(
        &self,
        qualification: &QualificationResult,
        rates: &TariffRateRecord,
        trade_volume: Money,
    ) -> SavingsReport {
        SavingsCalculator::new(&self.config).calculate(qualification, rates, trade_volume)
    }

    /// Assemble the report once qualification and rates are known.
    pub fn report(
        &self,
        request: &QualificationRequest,
        trade_volume: Money,
        qualification: QualificationResult,
        rates: TariffRateRecord,
    ) -> AnalysisReport {
        let savings = self.savings(&qualification, &rates, trade_volume);

        let (preference_criterion, documentation_required) = if qualification.qualified {
            (
                Some("B".to_string()),
                vec![
                    "Manufacturing records".to_string(),
                    "Bill of materials".to_string(),
                ],
            )
        } else {
            (
                None,
                vec![
                    "Review supply chain".to_string(),
                    "Increase North American sourcing".to_string(),
                ],
            )
        };

        info!(
            code = %request.classification_code,
            qualified = qualification.qualified,
            content = qualification.north_american_content,
            threshold = qualification.threshold_applied,
            annual_savings = savings.annual_savings,
            "origin qualification evaluated"
        );

        AnalysisReport {
            product_description: request.product_description.clone(),
            classification_code: request.classification_code.clone(),
            trade_volume,
            summary: qualification.summary(),
            qualification,
            rates,
            savings,
            preference_criterion,
            documentation_required,
        }
    }
}

impl Default for OriginEngine {
    fn default() -> Self {
        Self::new(EngineConfig::standard())
    }
}
