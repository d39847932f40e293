use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{ClassificationCode, CountryCode, Percentage, ThresholdSource};

pub const DEFAULT_CONTENT_TOLERANCE: Percentage = 0.5;
pub const DEFAULT_RVC_THRESHOLD: Percentage = 62.5;

/// Immutable rule set the engine is built from. Loaded once and shared by reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub north_american_bloc: Vec<CountryCode>,
    pub content_tolerance: Percentage,
    pub thresholds: ThresholdTable,
    #[serde(default)]
    pub supplemental_tariffs: Vec<SupplementalTariffProgram>,
}

impl EngineConfig {
    pub fn standard() -> Self {
        Self {
            north_american_bloc: vec![
                CountryCode::new("US"),
                CountryCode::new("CA"),
                CountryCode::new("MX"),
            ],
            content_tolerance: DEFAULT_CONTENT_TOLERANCE,
            thresholds: ThresholdTable::standard(),
            supplemental_tariffs: vec![SupplementalTariffProgram {
                program: "Section 301".to_string(),
                country: CountryCode::new("CN"),
                estimated_rate: 25.0,
            }],
        }
    }

    pub fn with_tolerance(mut self, tolerance: Percentage) -> Self {
        self.content_tolerance = sanitize_tolerance(tolerance);
        self
    }

    pub fn tolerance(&self) -> Percentage {
        sanitize_tolerance(self.content_tolerance)
    }

    pub fn watch_list_entry(&self, country: &CountryCode) -> Option<&SupplementalTariffProgram> {
        self.supplemental_tariffs
            .iter()
            .find(|entry| &entry.country == country)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::standard()
    }
}

fn sanitize_tolerance(tolerance: Percentage) -> Percentage {
    if tolerance.is_finite() && tolerance >= 0.0 {
        tolerance
    } else {
        DEFAULT_CONTENT_TOLERANCE
    }
}

/// Watch-list entry for a supplemental tariff program keyed by source country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplementalTariffProgram {
    pub program: String,
    pub country: CountryCode,
    pub estimated_rate: Percentage,
}

/// Regional value content thresholds by classification, then chapter, then default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdTable {
    pub default_threshold: Percentage,
    #[serde(default)]
    pub classification_rules: BTreeMap<ClassificationCode, Percentage>,
    #[serde(default)]
    pub chapter_rules: BTreeMap<String, Percentage>,
}

impl ThresholdTable {
    pub fn new(default_threshold: Percentage) -> Self {
        Self {
            default_threshold,
            classification_rules: BTreeMap::new(),
            chapter_rules: BTreeMap::new(),
        }
    }

    pub fn standard() -> Self {
        Self::new(DEFAULT_RVC_THRESHOLD)
            .with_chapter("84", 75.0)
            .with_chapter("85", 75.0)
            .with_chapter("87", 75.0)
            .with_chapter("61", 62.5)
            .with_chapter("62", 62.5)
    }

    pub fn with_classification(mut self, code: ClassificationCode, threshold: Percentage) -> Self {
        self.classification_rules.insert(code, threshold);
        self
    }

    pub fn with_chapter(mut self, chapter: &str, threshold: Percentage) -> Self {
        self.chapter_rules.insert(chapter.trim().to_string(), threshold);
        self
    }

    pub fn resolve(&self, code: &ClassificationCode) -> (Percentage, ThresholdSource) {
        if let Some(threshold) = self.classification_rules.get(code) {
            return (*threshold, ThresholdSource::Classification);
        }

        if let Some(threshold) = self.chapter_rules.get(code.chapter()) {
            return (*threshold, ThresholdSource::Chapter);
        }

        (self.default_threshold, ThresholdSource::Default)
    }
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self::standard()
    }
}
