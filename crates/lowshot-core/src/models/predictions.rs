use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One prediction for one test item. As with labels, the payload
/// columns depend on the problem type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRow {
    pub id: String,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, Value>,
}

impl PredictionRow {
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

/// Predictions covering the full test set, serialized as a JSON array
/// of row objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredictionBatch {
    rows: Vec<PredictionRow>,
}

impl PredictionBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: PredictionRow) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[PredictionRow] {
        &self.rows
    }
}

impl From<Vec<PredictionRow>> for PredictionBatch {
    fn from(rows: Vec<PredictionRow>) -> Self {
        Self { rows }
    }
}
