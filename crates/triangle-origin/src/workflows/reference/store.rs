use std::collections::HashMap;

use async_trait::async_trait;

use crate::workflows::origin::{ClassificationCode, RawRecord, ReferenceError, ReferenceStore};

/// Reference rates held in memory, keyed by digit-normalized classification code.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReferenceStore {
    records: HashMap<ClassificationCode, RawRecord>,
}

impl InMemoryReferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps the first record seen for a code and reports whether this one was stored.
    pub fn insert(&mut self, classification_code: ClassificationCode, record: RawRecord) -> bool {
        if self.records.contains_key(&classification_code) {
            return false;
        }
        self.records.insert(classification_code, record);
        true
    }

    pub fn with_record(mut self, classification_code: ClassificationCode, record: RawRecord) -> Self {
        self.insert(classification_code, record);
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl ReferenceStore for InMemoryReferenceStore {
    async fn rate_record(
        &self,
        classification_code: &ClassificationCode,
    ) -> Result<Option<RawRecord>, ReferenceError> {
        Ok(self.records.get(classification_code).cloned())
    }
}
