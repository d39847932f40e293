use std::fmt;

use serde::{Deserialize, Serialize};

use super::domain::Money;
use super::error::OriginError;

/// Annual trade volume as supplied by callers: a number, or text such as `"$1.5M"`,
/// `"1,000,000"` or a `"$5M - $25M"` range (resolved to its midpoint).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TradeVolume {
    Amount(Money),
    Text(String),
}

impl TradeVolume {
    pub fn amount(&self) -> Result<Money, OriginError> {
        let value = match self {
            TradeVolume::Amount(value) => *value,
            TradeVolume::Text(raw) => parse_trade_volume(raw)?,
        };

        if !value.is_finite() || value < 0.0 {
            return Err(OriginError::Validation(format!(
                "trade volume must be a non-negative amount, got {value}"
            )));
        }

        Ok(value)
    }
}

impl From<Money> for TradeVolume {
    fn from(value: Money) -> Self {
        TradeVolume::Amount(value)
    }
}

impl fmt::Display for TradeVolume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeVolume::Amount(value) => write!(f, "{value}"),
            TradeVolume::Text(raw) => f.write_str(raw),
        }
    }
}

pub fn parse_trade_volume(raw: &str) -> Result<Money, OriginError> {
    let trimmed = raw.trim();
    let invalid = || OriginError::Validation(format!("unrecognized trade volume '{trimmed}'"));

    if trimmed.is_empty() {
        return Err(invalid());
    }

    let bounds: Vec<&str> = trimmed.split(" - ").collect();
    match bounds.as_slice() {
        [single] => parse_amount(single).ok_or_else(invalid),
        [low, high] => {
            let low = parse_amount(low).ok_or_else(invalid)?;
            let high = parse_amount(high).ok_or_else(invalid)?;
            Ok(((low + high) / 2.0).round())
        }
        _ => Err(invalid()),
    }
}

fn parse_amount(raw: &str) -> Option<Money> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|ch| *ch != ',' && !ch.is_whitespace())
        .collect();

    let (digits, multiplier) = match cleaned.chars().last()?.to_ascii_uppercase() {
        'K' => (&cleaned[..cleaned.len() - 1], 1_000.0),
        'M' => (&cleaned[..cleaned.len() - 1], 1_000_000.0),
        'B' => (&cleaned[..cleaned.len() - 1], 1_000_000_000.0),
        _ => (cleaned.as_str(), 1.0),
    };

    let value = digits.parse::<f64>().ok()?;
    value.is_finite().then(|| (value * multiplier).round())
}
