use super::common::*;
use crate::workflows::origin::{aggregate, CountryCode, OriginComponent, OriginEngine, OriginError};

fn bloc() -> Vec<CountryCode> {
    vec![CountryCode::new("US"), CountryCode::new("CA"), CountryCode::new("MX")]
}

#[test]
fn aggregate_sums_only_bloc_components() {
    let content = aggregate(&mixed_components(), &bloc(), 0.5).expect("valid bill of origin");
    assert_eq!(content, 50.0);
}

#[test]
fn aggregate_rejects_totals_outside_tolerance() {
    let components = vec![OriginComponent::new("MX", 65.0), OriginComponent::new("CN", 40.0)];

    match aggregate(&components, &bloc(), 0.5) {
        Err(OriginError::Validation(message)) => assert!(message.contains("105")),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn aggregate_accepts_rounding_within_tolerance() {
    let components = vec![
        OriginComponent::new("US", 33.3),
        OriginComponent::new("CA", 33.3),
        OriginComponent::new("CN", 33.3),
    ];

    let content = aggregate(&components, &bloc(), 0.5).expect("99.9 is within tolerance");
    assert!((content - 66.6).abs() < 1e-9);
}

#[test]
fn aggregate_accepts_totals_exactly_at_tolerance_bounds() {
    let upper = vec![
        OriginComponent::new("MX", 16.1),
        OriginComponent::new("US", 48.2),
        OriginComponent::new("CN", 36.2),
    ];
    let content = aggregate(&upper, &bloc(), 0.5).expect("100.5 is on the upper bound");
    assert!((content - 64.3).abs() < 1e-9);

    let lower = vec![
        OriginComponent::new("MX", 16.1),
        OriginComponent::new("US", 48.2),
        OriginComponent::new("CN", 35.2),
    ];
    let content = aggregate(&lower, &bloc(), 0.5).expect("99.5 is on the lower bound");
    assert!((content - 64.3).abs() < 1e-9);

    let beyond = vec![
        OriginComponent::new("MX", 16.1),
        OriginComponent::new("US", 48.2),
        OriginComponent::new("CN", 36.3),
    ];
    assert!(matches!(
        aggregate(&beyond, &bloc(), 0.5),
        Err(OriginError::Validation(_))
    ));
}

#[test]
fn aggregate_rejects_empty_and_out_of_range_components() {
    assert!(matches!(
        aggregate(&[], &bloc(), 0.5),
        Err(OriginError::Validation(_))
    ));

    let negative = vec![OriginComponent::new("MX", 110.0), OriginComponent::new("CN", -10.0)];
    assert!(matches!(
        aggregate(&negative, &bloc(), 0.5),
        Err(OriginError::Validation(_))
    ));

    let missing_country = vec![OriginComponent::new("", 100.0)];
    assert!(matches!(
        aggregate(&missing_country, &bloc(), 0.5),
        Err(OriginError::Validation(_))
    ));
}

#[test]
fn aggregate_stays_within_percentage_bounds() {
    let splits = [0.0, 12.5, 50.0, 99.5, 100.0];
    for regional in splits {
        let components = vec![
            OriginComponent::new("Canada", regional),
            OriginComponent::new("VN", 100.0 - regional),
        ];
        let content = aggregate(&components, &bloc(), 0.5).expect("sums to 100");
        assert!((0.0..=100.0).contains(&content), "content {content} out of range");
        assert_eq!(content, regional);
    }
}

#[test]
fn aggregate_caps_content_at_one_hundred() {
    let components = vec![OriginComponent::new("US", 60.2), OriginComponent::new("MX", 40.2)];
    let content = aggregate(&components, &bloc(), 0.5).expect("100.4 is within tolerance");
    assert_eq!(content, 100.0);
}

#[test]
fn engine_uses_configured_tolerance_and_bloc() {
    let mut config = engine_config().with_tolerance(6.0);
    config.north_american_bloc = vec![CountryCode::new("MX")];
    let engine = OriginEngine::new(config);

    let components = vec![OriginComponent::new("MX", 65.0), OriginComponent::new("US", 40.0)];
    let content = engine.aggregate(&components).expect("105 within widened tolerance");
    assert_eq!(content, 65.0);
}
