use super::config::ThresholdTable;
use super::domain::{ClassificationCode, Percentage, QualificationResult};

/// Compare regional content against the threshold that applies to `classification_code`.
/// Content exactly at the threshold qualifies.
pub fn evaluate(
    content_percentage: Percentage,
    classification_code: &ClassificationCode,
    threshold_table: &ThresholdTable,
) -> QualificationResult {
    let (threshold_applied, threshold_source) = threshold_table.resolve(classification_code);

    QualificationResult {
        qualified: content_percentage >= threshold_applied,
        north_american_content: content_percentage,
        threshold_applied,
        margin: content_percentage - threshold_applied,
        threshold_source,
    }
}
