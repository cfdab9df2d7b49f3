use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ProblemType;

/// Description of one benchmark task as served by the task registry.
///
/// A task pairs a base dataset with an adaptation dataset of the same
/// problem type. The service returns more fields than the run needs;
/// they are kept in `extra` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskMetadata {
    #[serde(default)]
    pub task_id: String,
    pub problem_type: ProblemType,
    pub base_dataset: String,
    pub adaptation_dataset: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}
