mod parser;
mod store;

pub use store::InMemoryReferenceStore;

use crate::workflows::origin::OriginError;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug)]
pub enum ReferenceImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    MissingCodeColumn,
    InvalidCode { line: u64, source: OriginError },
}

impl std::fmt::Display for ReferenceImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferenceImportError::Io(err) => write!(f, "failed to read rate table: {}", err),
            ReferenceImportError::Csv(err) => write!(f, "invalid rate table CSV data: {}", err),
            ReferenceImportError::MissingCodeColumn => write!(
                f,
                "rate table needs a classification_code, hs_code or hts_code column"
            ),
            ReferenceImportError::InvalidCode { line, source } => {
                write!(f, "rate table line {}: {}", line, source)
            }
        }
    }
}

impl std::error::Error for ReferenceImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReferenceImportError::Io(err) => Some(err),
            ReferenceImportError::Csv(err) => Some(err),
            ReferenceImportError::MissingCodeColumn => None,
            ReferenceImportError::InvalidCode { source, .. } => Some(source),
        }
    }
}

impl From<std::io::Error> for ReferenceImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ReferenceImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Loads a reference rate table exported as CSV. Header spellings such as `HTS Code`,
/// `General Rate` or `USMCA Tariff Rate` are accepted; rate aliases are reconciled at
/// lookup time by the field normalizer.
pub struct ReferenceImporter;

impl ReferenceImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<InMemoryReferenceStore, ReferenceImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<InMemoryReferenceStore, ReferenceImportError> {
        let mut store = InMemoryReferenceStore::new();

        for row in parser::parse_rows(reader)? {
            let code = row.classification_code.clone();
            if !store.insert(row.classification_code, row.record) {
                debug!(%code, "duplicate rate table row ignored");
            }
        }

        info!(records = store.len(), "reference rate table loaded");
        Ok(store)
    }
}
