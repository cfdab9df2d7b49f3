use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ProblemType;

/// Opaque credential identifying one session. Sent back to the
/// service in the `session_token` header on every session-scoped call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which half of the task pair a session is currently working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    #[default]
    Base,
    Adaptation,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Base => "base",
            Stage::Adaptation => "adaptation",
        })
    }
}

/// Whether the service still accepts interactions for a session.
///
/// The wire value for a live session is `In Progress`; `Active` is
/// accepted as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ActiveState {
    #[default]
    #[serde(alias = "In Progress")]
    Active,
    Complete,
}

impl fmt::Display for ActiveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ActiveState::Active => "Active",
            ActiveState::Complete => "Complete",
        })
    }
}

/// What the service reports about the dataset a session is currently
/// training on. Machine translation datasets omit the image-specific
/// fields, so everything beyond the name is optional.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetMetadata {
    pub name: String,
    pub dataset_type: Option<ProblemType>,
    pub uid: Option<String>,
    pub classes: Option<Vec<String>>,
    pub number_of_classes: Option<u64>,
    pub number_of_channels: Option<u64>,
    pub number_of_samples_train: Option<u64>,
    pub number_of_samples_test: Option<u64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Snapshot of a session as reported by the service.
///
/// `date_last_interacted` moves on every call, so [`changed_since`]
/// ignores it when deciding whether a refresh observed real progress.
///
/// [`changed_since`]: SessionStatus::changed_since
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionStatus {
    pub active: ActiveState,
    pub pair_stage: Stage,
    pub budget_used: u64,
    pub budget_left_until_checkpoint: u64,
    pub current_dataset: DatasetMetadata,
    pub date_last_interacted: Option<Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl SessionStatus {
    /// True when any field other than `date_last_interacted` differs
    /// from `previous`.
    pub fn changed_since(&self, previous: &SessionStatus) -> bool {
        let mut current = self.clone();
        let mut prior = previous.clone();
        current.date_last_interacted = None;
        prior.date_last_interacted = None;
        current != prior
    }
}
