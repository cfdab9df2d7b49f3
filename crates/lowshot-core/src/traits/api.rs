use crate::errors::ApiError;
use crate::models::{
    DataSplit, LabelRecord, PredictionBatch, SessionStatus, SessionToken, TaskMetadata,
};

/// Everything the benchmark service can be asked to do.
///
/// The HTTP client is the production implementation; session and
/// workflow tests script this trait instead of standing up a server.
pub trait IBenchmarkApi: Send + Sync {
    /// Task ids currently advertised by the service.
    fn list_tasks(&self) -> Result<Vec<String>, ApiError>;

    /// Metadata for one task.
    fn task_metadata(&self, task_id: &str) -> Result<TaskMetadata, ApiError>;

    /// Create a session for `task_id` against the given data split.
    fn start_session(
        &self,
        task_id: &str,
        session_name: &str,
        data_split: DataSplit,
    ) -> Result<SessionToken, ApiError>;

    /// Current status snapshot for the session.
    fn session_status(&self, token: &SessionToken) -> Result<SessionStatus, ApiError>;

    /// Seed labels for the current stage. Not retried: a failed round
    /// is reported by the service in the next one, not replayed.
    fn seed_labels(&self, token: &SessionToken) -> Result<Vec<LabelRecord>, ApiError>;

    /// Upload predictions for the current test set. A rejection is
    /// logged but does not fail the call.
    fn submit_predictions(
        &self,
        token: &SessionToken,
        predictions: &PredictionBatch,
    ) -> Result<(), ApiError>;

    /// Spend label budget on the given item ids.
    fn query_labels(
        &self,
        token: &SessionToken,
        item_ids: &[String],
    ) -> Result<Vec<LabelRecord>, ApiError>;
}
