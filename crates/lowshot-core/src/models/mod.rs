//! Wire-level data models.
//!
//! Field names mirror what the benchmark service sends; structs keep
//! unknown fields in a flattened map so status diffs survive server
//! additions.

mod data_split;
mod labels;
mod predictions;
mod problem_type;
mod session_status;
mod task;

pub use data_split::DataSplit;
pub use labels::{LabelCache, LabelRecord};
pub use predictions::{PredictionBatch, PredictionRow};
pub use problem_type::ProblemType;
pub use session_status::{ActiveState, DatasetMetadata, SessionStatus, SessionToken, Stage};
pub use task::TaskMetadata;
