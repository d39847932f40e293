use serde_json::{Map, Value};

use super::domain::{ClassificationCode, CountryCode, Percentage, TariffRateRecord};

/// Upstream record with unpredictable key presence (database rows, CSV rows, API payloads).
pub type RawRecord = Value;

struct FieldAliases {
    canonical: &'static str,
    aliases: &'static [&'static str],
}

/// Canonical rate fields and the legacy names they are read from, in priority order.
/// `preferential_rate` is the typed name of `usmca_rate` and outranks the upstream aliases.
/// New upstream spellings are added here.
const RATE_FIELDS: &[FieldAliases] = &[
    FieldAliases {
        canonical: "usmca_rate",
        aliases: &["preferential_rate", "usmca_tariff_rate", "special_rate"],
    },
    FieldAliases {
        canonical: "mfn_rate",
        aliases: &["mfn_tariff_rate", "general_rate"],
    },
];

const SOURCE_COUNTRY_FIELDS: &[&str] = &["source_country", "origin_country", "country"];

/// Canonicalize one record or an array of records.
///
/// Missing rates resolve through [`RATE_FIELDS`] and fall back to 0. `null` and other
/// non-object values pass through untouched.
pub fn normalize(records: RawRecord) -> Vec<RawRecord> {
    match records {
        Value::Array(items) => items.into_iter().map(normalize_record).collect(),
        other => vec![normalize_record(other)],
    }
}

pub fn normalize_record(record: RawRecord) -> RawRecord {
    let Value::Object(mut fields) = record else {
        return record;
    };

    for field in RATE_FIELDS {
        let resolved = std::iter::once(field.canonical)
            .chain(field.aliases.iter().copied())
            .find_map(|key| fields.get(key).and_then(rate_value))
            .unwrap_or(0.0);
        fields.insert(field.canonical.to_string(), number(resolved));
    }

    let mfn = fields.get("mfn_rate").and_then(rate_value);
    let preferential = fields.get("usmca_rate").and_then(rate_value);
    if let (Some(mfn), Some(preferential)) = (mfn, preferential) {
        fields.insert(
            "savings_percent".to_string(),
            number((mfn - preferential).max(0.0)),
        );
    }

    attach_section_301(&mut fields);

    Value::Object(fields)
}

/// Build the typed record from an already normalized raw record.
pub(crate) fn rate_record_from(
    normalized: &RawRecord,
    classification_code: ClassificationCode,
) -> TariffRateRecord {
    let rate = |key: &str| normalized.get(key).and_then(rate_value).unwrap_or(0.0);
    let source_country = SOURCE_COUNTRY_FIELDS
        .iter()
        .find_map(|key| normalized.get(*key).and_then(Value::as_str))
        .map(CountryCode::new)
        .unwrap_or_else(|| CountryCode::new(""));

    TariffRateRecord {
        classification_code,
        mfn_rate: rate("mfn_rate"),
        preferential_rate: rate("usmca_rate"),
        source_country,
    }
}

fn rate_value(value: &Value) -> Option<Percentage> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => raw.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|rate| rate.is_finite())
}

fn number(value: Percentage) -> Value {
    if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
        Value::from(value as i64)
    } else {
        Value::from(value)
    }
}

/// Surfaces a Section 301 surtax named in `policy_adjustments` as `section_301`.
///
/// Informational only: savings exposure comes from the configured watch list, never from
/// this field, so it shows up in normalized output and nowhere else.
fn attach_section_301(fields: &mut Map<String, Value>) {
    if fields.get("section_301").and_then(rate_value).is_some() {
        return;
    }

    let Some(Value::Array(adjustments)) = fields.get("policy_adjustments") else {
        return;
    };

    let rate = adjustments.iter().find_map(|entry| match entry {
        Value::String(text) => section_301_rate(text),
        other => section_301_rate(&other.to_string()),
    });

    if let Some(rate) = rate {
        fields.insert("section_301".to_string(), number(rate));
    }
}

/// Percentage named after a "Section 301" mention. A signed adjustment such as
/// "Section 301 +25%" wins over bare percentages; otherwise the first one is taken.
fn section_301_rate(text: &str) -> Option<Percentage> {
    let lowered = text.to_ascii_lowercase();
    let start = lowered.find("section 301")? + "section 301".len();
    let tail = &text[start..];

    let percentages: Vec<(Percentage, bool)> = tail
        .match_indices('%')
        .filter_map(|(percent_at, _)| {
            let before = &tail[..percent_at];
            let digits_start = before
                .char_indices()
                .rev()
                .take_while(|(_, ch)| ch.is_ascii_digit() || *ch == '.')
                .last()
                .map(|(index, _)| index)?;
            let rate = before[digits_start..].parse::<f64>().ok()?;
            let signed = before[..digits_start].trim_end().ends_with('+');
            Some((rate, signed))
        })
        .collect();

    percentages
        .iter()
        .find(|(_, signed)| *signed)
        .or_else(|| percentages.first())
        .map(|(rate, _)| *rate)
}

#[cfg(test)]
pub(crate) fn section_301_rate_for_tests(text: &str) -> Option<Percentage> {
    section_301_rate(text)
}
