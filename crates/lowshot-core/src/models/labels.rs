use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One labeled item. The payload differs per problem type (a class
/// name, a bounding box plus class, or a translation), so everything
/// except the item id stays schemaless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelRecord {
    pub id: String,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, Value>,
}

impl LabelRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: serde_json::Map::new(),
        }
    }

    pub fn with_field(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }
}

/// Every label a session has gathered so far, keyed by item id.
///
/// The cache only grows. Re-delivered ids overwrite the stored record,
/// so the newest response wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelCache {
    records: HashMap<String, LabelRecord>,
}

impl LabelCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&LabelRecord> {
        self.records.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LabelRecord> {
        self.records.values()
    }

    /// Fold `records` into the cache. Returns how many ids were new.
    pub fn merge(&mut self, records: impl IntoIterator<Item = LabelRecord>) -> usize {
        let mut added = 0;
        for record in records {
            if self.records.insert(record.id.clone(), record).is_none() {
                added += 1;
            }
        }
        added
    }
}
