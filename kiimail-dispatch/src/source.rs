use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::error::DispatchResult;
use crate::locale::Locale;

pub type TemplateId = u64;

/// One translation of a stored email template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateRecord {
    /// Template document as JSON
    pub data: String,
    /// Subject line, authored as HTML
    pub header: String,
}

/// Lookup of template translations by id and locale
pub trait TemplateSource {
    fn find(&self, template: TemplateId, locale: &Locale) -> DispatchResult<Option<TemplateRecord>>;
}

/// In-memory template store, safe to share between threads
#[derive(Debug, Default)]
pub struct MemoryTemplateStore {
    records: DashMap<(TemplateId, Locale), TemplateRecord>,
}

impl MemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, template: TemplateId, locale: Locale, record: TemplateRecord) {
        self.records.insert((template, locale), record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl TemplateSource for MemoryTemplateStore {
    fn find(&self, template: TemplateId, locale: &Locale) -> DispatchResult<Option<TemplateRecord>> {
        Ok(self
            .records
            .get(&(template, locale.clone()))
            .map(|r| r.value().clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_per_locale() {
        let store = MemoryTemplateStore::new();
        let record = TemplateRecord {
            data: r#"{"blocks": []}"#.to_string(),
            header: "<p>Hi</p>".to_string(),
        };
        store.insert(7, Locale::new("fr"), record.clone());

        assert_eq!(store.find(7, &Locale::new("fr")).unwrap(), Some(record));
        assert_eq!(store.find(7, &Locale::new("en")).unwrap(), None);
        assert_eq!(store.find(8, &Locale::new("fr")).unwrap(), None);
        assert_eq!(store.len(), 1);
    }
}
