use crate::errors::LearnerError;
use crate::models::{DatasetMetadata, LabelCache, PredictionBatch, Stage};

/// Model logic driven by the session engine.
///
/// The engine guarantees `set_stage` is called once per stage before
/// any other method of that stage; implementations should reject a
/// `fit` that arrives without one with [`LearnerError::StageNotSet`].
pub trait ILearner: Send + Sync {
    /// Announce the stage and the dataset it trains on.
    fn set_stage(&mut self, stage: Stage, dataset: &DatasetMetadata);

    /// Train on every label gathered so far.
    fn fit(&mut self, labels: &LabelCache) -> Result<(), LearnerError>;

    /// Produce predictions for the current test set.
    fn predict(&mut self) -> Result<PredictionBatch, LearnerError>;

    /// Item ids the learner wants labeled next. May be empty, in which
    /// case the engine skips the label query for that round.
    fn select_uncertain(&mut self) -> Result<Vec<String>, LearnerError>;
}
