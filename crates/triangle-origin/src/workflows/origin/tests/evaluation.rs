use super::common::*;
use crate::workflows::origin::{
    evaluate, OriginComponent, OriginEngine, ThresholdSource, ThresholdTable,
};

#[test]
fn mexico_content_at_threshold_qualifies_with_zero_margin() {
    let engine = OriginEngine::new(engine_config());

    let result = engine
        .qualify(&mexico_china_components(), &code("8537.10.90"))
        .expect("valid bill of origin");

    assert_eq!(result.north_american_content, 60.0);
    assert_eq!(result.threshold_applied, 60.0);
    assert!(result.qualified);
    assert_eq!(result.margin, 0.0);
    assert_eq!(result.threshold_source, ThresholdSource::Default);
}

#[test]
fn mixed_bill_below_threshold_reports_negative_margin() {
    let engine = OriginEngine::new(engine_config());

    let result = engine
        .qualify(&mixed_components(), &code("8537.10.90"))
        .expect("valid bill of origin");

    assert_eq!(result.north_american_content, 50.0);
    assert!(!result.qualified);
    assert_eq!(result.margin, -10.0);
    assert!(result.summary().contains("below"));
}

#[test]
fn evaluate_is_inclusive_at_the_boundary() {
    let table = ThresholdTable::new(62.5);
    let result = evaluate(62.5, &code("3926.90"), &table);
    assert!(result.qualified);
    assert_eq!(result.margin, 0.0);

    let result = evaluate(62.4, &code("3926.90"), &table);
    assert!(!result.qualified);
}

#[test]
fn evaluate_uses_chapter_rule_when_code_has_no_specific_rule() {
    let table = ThresholdTable::new(60.0)
        .with_chapter("87", 75.0)
        .with_classification(code("8708.29"), 70.0);

    let chapter = evaluate(72.0, &code("8703.23"), &table);
    assert_eq!(chapter.threshold_source, ThresholdSource::Chapter);
    assert!(!chapter.qualified);

    let specific = evaluate(72.0, &code("8708.29"), &table);
    assert_eq!(specific.threshold_source, ThresholdSource::Classification);
    assert!(specific.qualified);
}

#[test]
fn evaluate_is_deterministic() {
    let table = ThresholdTable::standard();
    let first = evaluate(71.25, &code("8542.31"), &table);
    let second = evaluate(71.25, &code("8542.31"), &table);
    assert_eq!(first, second);
}

#[test]
fn shifting_value_into_the_bloc_never_revokes_qualification() {
    let engine = OriginEngine::new(engine_config());
    let mut qualified_once = false;

    for step in 0..=20 {
        let regional = step as f64 * 5.0;
        let components = vec![
            OriginComponent::new("MX", regional),
            OriginComponent::new("CN", 100.0 - regional),
        ];
        let result = engine
            .qualify(&components, &code("8537.10"))
            .expect("valid bill of origin");

        if qualified_once {
            assert!(result.qualified, "qualification lost at {regional}%");
        }
        qualified_once |= result.qualified;
    }

    assert!(qualified_once);
}
