use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::defaults;
use crate::models::{DataSplit, ProblemType};

/// What a run covers: which splits, which problem types, and where the
/// local dataset mirror lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub data_splits: Vec<DataSplit>,
    pub problem_types: Vec<ProblemType>,
    /// When set, run only this task and ignore the problem type
    /// selection.
    pub task_id: Option<String>,
    /// Tasks touching any of these datasets are skipped.
    pub skip_datasets: Vec<String>,
    pub dataset_dir: PathBuf,
    pub session_name_prefix: String,
    pub session_name_postfix: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            data_splits: vec![DataSplit::Sample],
            problem_types: ProblemType::ALL.to_vec(),
            task_id: None,
            skip_datasets: Vec::new(),
            dataset_dir: PathBuf::from(defaults::DEFAULT_DATASET_DIR),
            session_name_prefix: defaults::DEFAULT_SESSION_NAME_PREFIX.to_string(),
            session_name_postfix: defaults::DEFAULT_SESSION_NAME_POSTFIX.to_string(),
        }
    }
}
