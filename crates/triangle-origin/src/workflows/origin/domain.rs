use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::OriginError;

/// Percentage expressed on a 0-100 scale (10.0 means ten percent).
pub type Percentage = f64;

/// Currency amount in the trade volume's unit.
pub type Money = f64;

/// ISO-2 style country code. Common English names collapse to their code so upstream
/// records that carry "Mexico" and "MX" compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim();
        let code = match trimmed.to_lowercase().as_str() {
            "mexico" | "méxico" | "mx" => "MX".to_string(),
            "canada" | "ca" => "CA".to_string(),
            "united states" | "united states of america" | "usa" | "us" => "US".to_string(),
            "china" | "cn" => "CN".to_string(),
            "vietnam" | "viet nam" | "vn" => "VN".to_string(),
            _ => trimmed.to_ascii_uppercase(),
        };
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for CountryCode {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<&str> for CountryCode {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<CountryCode> for String {
    fn from(value: CountryCode) -> Self {
        value.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Harmonized classification code reduced to its digits, so `8542.31.00` and
/// `85423100` address the same reference row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClassificationCode(String);

impl ClassificationCode {
    pub fn parse(raw: &str) -> Result<Self, OriginError> {
        let digits: String = raw
            .chars()
            .filter(|ch| !matches!(ch, '.' | '-' | ' ' | '\t'))
            .collect();

        if digits.len() < 2 || !digits.chars().all(|ch| ch.is_ascii_digit()) {
            return Err(OriginError::Validation(format!(
                "classification code '{}' must contain at least two digits and no other characters",
                raw.trim()
            )));
        }

        Ok(Self(digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Two-digit HS chapter.
    pub fn chapter(&self) -> &str {
        &self.0[..2]
    }
}

impl TryFrom<String> for ClassificationCode {
    type Error = OriginError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ClassificationCode> for String {
    fn from(value: ClassificationCode) -> Self {
        value.0
    }
}

impl fmt::Display for ClassificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One line of a product's bill of origin, weighted by value share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OriginComponent {
    #[serde(alias = "origin_country")]
    pub country: CountryCode,
    #[serde(alias = "percentage")]
    pub value_percentage: Percentage,
    #[serde(default)]
    pub component_type: String,
    #[serde(default)]
    pub description: String,
}

impl OriginComponent {
    pub fn new(country: impl Into<CountryCode>, value_percentage: Percentage) -> Self {
        Self {
            country: country.into(),
            value_percentage,
            component_type: String::new(),
            description: String::new(),
        }
    }

    pub fn described(mut self, component_type: &str, description: &str) -> Self {
        self.component_type = component_type.to_string();
        self.description = description.to_string();
        self
    }
}

/// Canonical duty rates for one classification code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TariffRateRecord {
    pub classification_code: ClassificationCode,
    pub mfn_rate: Percentage,
    #[serde(alias = "usmca_rate")]
    pub preferential_rate: Percentage,
    pub source_country: CountryCode,
}

impl TariffRateRecord {
    pub fn rate_spread(&self) -> Percentage {
        (self.mfn_rate - self.preferential_rate).max(0.0)
    }
}

/// Which rule in the threshold table produced the applied threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdSource {
    Classification,
    Chapter,
    Default,
}

/// Outcome of comparing regional value content to the applicable threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualificationResult {
    pub qualified: bool,
    pub north_american_content: Percentage,
    pub threshold_applied: Percentage,
    pub margin: Percentage,
    pub threshold_source: ThresholdSource,
}

impl QualificationResult {
    pub fn summary(&self) -> String {
        if self.qualified {
            format!(
                "qualifies with {:.1}% North American content ({:.1}% required)",
                self.north_american_content, self.threshold_applied
            )
        } else {
            format!(
                "does not qualify: {:.1}% North American content is below the {:.1}% requirement",
                self.north_american_content, self.threshold_applied
            )
        }
    }
}

/// Exposure to supplemental tariff programs (e.g. Section 301 surtaxes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplementalTariffExposure {
    pub is_exposed: bool,
    pub estimated_rate: Percentage,
}

impl SupplementalTariffExposure {
    pub fn none() -> Self {
        Self {
            is_exposed: false,
            estimated_rate: 0.0,
        }
    }
}

/// Duty savings available through preferential treatment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsReport {
    pub annual_savings: Money,
    pub monthly_savings: Money,
    pub savings_percentage: Percentage,
    pub section_301_exposure: SupplementalTariffExposure,
}

impl SavingsReport {
    pub fn zero(section_301_exposure: SupplementalTariffExposure) -> Self {
        Self {
            annual_savings: 0.0,
            monthly_savings: 0.0,
            savings_percentage: 0.0,
            section_301_exposure,
        }
    }
}
