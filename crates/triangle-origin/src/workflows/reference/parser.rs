use serde_json::{Map, Value};
use std::io::Read;

use super::ReferenceImportError;
use crate::workflows::origin::{ClassificationCode, RawRecord};

const CODE_COLUMNS: &[&str] = &["classification_code", "hs_code", "hts_code"];
const LIST_COLUMNS: &[&str] = &["policy_adjustments"];

#[derive(Debug)]
pub(crate) struct ReferenceRow {
    pub(crate) classification_code: ClassificationCode,
    pub(crate) record: RawRecord,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<ReferenceRow>, ReferenceImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(normalize_header)
        .collect();

    let code_column = CODE_COLUMNS
        .iter()
        .find_map(|name| headers.iter().position(|header| header == name))
        .ok_or(ReferenceImportError::MissingCodeColumn)?;

    let mut rows = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        // header is line 1
        let line = index as u64 + 2;

        let raw_code = record.get(code_column).unwrap_or_default();
        let classification_code = ClassificationCode::parse(raw_code)
            .map_err(|source| ReferenceImportError::InvalidCode { line, source })?;

        let mut fields = Map::new();
        for (header, cell) in headers.iter().zip(record.iter()) {
            if cell.is_empty() {
                continue;
            }
            fields.insert(header.clone(), cell_value(header, cell));
        }

        rows.push(ReferenceRow {
            classification_code,
            record: Value::Object(fields),
        });
    }

    Ok(rows)
}

pub(crate) fn normalize_header(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned
        .split(|ch: char| ch.is_whitespace() || ch == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
        .to_ascii_lowercase()
}

fn cell_value(header: &str, cell: &str) -> Value {
    if LIST_COLUMNS.contains(&header) {
        return Value::Array(
            cell.split(';')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(|item| Value::String(item.to_string()))
                .collect(),
        );
    }
    Value::String(cell.to_string())
}
