use super::domain::{CountryCode, OriginComponent, Percentage};
use super::error::OriginError;

// Absorbs binary rounding in the running sum so the tolerance bounds stay inclusive.
const SUM_EPSILON: Percentage = 1e-9;

/// Sum of the value shares declared by components sourced inside the bloc.
///
/// The whole bill of origin must add up to 100 within `tolerance`; a bill that does not is
/// rejected rather than rescaled.
pub fn aggregate(
    components: &[OriginComponent],
    bloc: &[CountryCode],
    tolerance: Percentage,
) -> Result<Percentage, OriginError> {
    if components.is_empty() {
        return Err(OriginError::Validation(
            "bill of origin must list at least one component".to_string(),
        ));
    }

    let mut total = 0.0;
    let mut regional = 0.0;

    for (index, component) in components.iter().enumerate() {
        let share = component.value_percentage;
        if !share.is_finite() || !(0.0..=100.0).contains(&share) {
            return Err(OriginError::Validation(format!(
                "component {} ({}) has value_percentage {} outside 0-100",
                index + 1,
                label(component),
                share
            )));
        }
        if component.country.is_empty() {
            return Err(OriginError::Validation(format!(
                "component {} ({}) is missing a country of origin",
                index + 1,
                label(component)
            )));
        }

        total += share;
        if bloc.contains(&component.country) {
            regional += share;
        }
    }

    if (total - 100.0).abs() > tolerance + SUM_EPSILON {
        return Err(OriginError::Validation(format!(
            "component value percentages sum to {total:.2}, expected 100 ± {tolerance}"
        )));
    }

    Ok(regional.min(100.0))
}

fn label(component: &OriginComponent) -> &str {
    if component.description.is_empty() {
        component.country.as_str()
    } else {
        &component.description
    }
}
