//! Integration tests for the session engine, driven by a scripted API
//! double and a recording learner.
//!
//! The status script is strict: every `session_status` call pops one
//! entry, and each test asserts the script is fully drained, so the
//! refresh cadence itself is part of what is verified.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use serde_json::json;

use lowshot_core::errors::{ApiError, LearnerError, SessionError};
use lowshot_core::models::{
    ActiveState, DataSplit, DatasetMetadata, LabelCache, LabelRecord, PredictionBatch,
    PredictionRow, ProblemType, SessionStatus, SessionToken, Stage, TaskMetadata,
};
use lowshot_core::traits::{IBenchmarkApi, ILearner};
use lowshot_session::{compose_session_name, format_elapsed, SessionRunner};

// ─── Fixtures ──────────────────────────────────────────────────────────

fn make_task(problem_type: ProblemType) -> TaskMetadata {
    TaskMetadata {
        task_id: "task-1".into(),
        problem_type,
        base_dataset: "mnist".into(),
        adaptation_dataset: "usps".into(),
        extra: serde_json::Map::new(),
    }
}

fn make_status(
    stage: Stage,
    active: ActiveState,
    used: u64,
    left: u64,
    dataset: &str,
    stamp: u64,
) -> SessionStatus {
    SessionStatus {
        active,
        pair_stage: stage,
        budget_used: used,
        budget_left_until_checkpoint: left,
        current_dataset: DatasetMetadata {
            name: dataset.to_string(),
            ..Default::default()
        },
        date_last_interacted: Some(json!(stamp)),
        extra: serde_json::Map::new(),
    }
}

/// Happy-path status script with the budget held open the whole run.
/// Statuses only differ in the volatile timestamp, the stage flip
/// after the last base checkpoint, and the final `Complete`.
fn scripted_run(problem_type: ProblemType) -> Vec<SessionStatus> {
    let seeds = problem_type.seed_rounds();
    let cps = problem_type.checkpoints_per_stage();
    let mut stamp = 0;
    let mut next = |stage: Stage, active: ActiveState, dataset: &str| {
        stamp += 1;
        make_status(stage, active, 0, 5, dataset, stamp)
    };

    let mut script = vec![next(Stage::Base, ActiveState::Active, "mnist")];
    for _ in 0..seeds * 2 {
        script.push(next(Stage::Base, ActiveState::Active, "mnist"));
    }
    for c in 1..=cps {
        script.push(next(Stage::Base, ActiveState::Active, "mnist"));
        if c == cps {
            script.push(next(Stage::Adaptation, ActiveState::Active, "usps"));
        } else {
            script.push(next(Stage::Base, ActiveState::Active, "mnist"));
        }
    }
    for _ in 0..seeds * 2 {
        script.push(next(Stage::Adaptation, ActiveState::Active, "usps"));
    }
    for c in 1..=cps {
        script.push(next(Stage::Adaptation, ActiveState::Active, "usps"));
        let active = if c == cps {
            ActiveState::Complete
        } else {
            ActiveState::Active
        };
        script.push(next(Stage::Adaptation, active, "usps"));
    }
    script
}

fn seed_record(id: &str) -> LabelRecord {
    LabelRecord::new(id).with_field("class", json!("7"))
}

// ─── Doubles ───────────────────────────────────────────────────────────

struct FakeApi {
    statuses: Mutex<VecDeque<SessionStatus>>,
    seed_batches: Mutex<VecDeque<Result<Vec<LabelRecord>, ApiError>>>,
    seed_calls: Mutex<usize>,
    submissions: Mutex<Vec<usize>>,
    queried: Mutex<Vec<Vec<String>>>,
    session_names: Mutex<Vec<String>>,
}

impl FakeApi {
    fn with_script(statuses: Vec<SessionStatus>) -> Self {
        Self {
            statuses: Mutex::new(statuses.into()),
            seed_batches: Mutex::new(VecDeque::new()),
            seed_calls: Mutex::new(0),
            submissions: Mutex::new(Vec::new()),
            queried: Mutex::new(Vec::new()),
            session_names: Mutex::new(Vec::new()),
        }
    }

    fn queue_seed_batch(&self, batch: Result<Vec<LabelRecord>, ApiError>) {
        self.seed_batches.lock().unwrap().push_back(batch);
    }

    fn remaining_statuses(&self) -> usize {
        self.statuses.lock().unwrap().len()
    }

    fn submissions(&self) -> Vec<usize> {
        self.submissions.lock().unwrap().clone()
    }

    fn queried(&self) -> Vec<Vec<String>> {
        self.queried.lock().unwrap().clone()
    }

    fn seed_calls(&self) -> usize {
        *self.seed_calls.lock().unwrap()
    }
}

impl IBenchmarkApi for FakeApi {
    fn list_tasks(&self) -> Result<Vec<String>, ApiError> {
        Ok(vec!["task-1".into()])
    }

    fn task_metadata(&self, task_id: &str) -> Result<TaskMetadata, ApiError> {
        let mut meta = make_task(ProblemType::ImageClassification);
        meta.task_id = task_id.to_string();
        Ok(meta)
    }

    fn start_session(
        &self,
        _task_id: &str,
        session_name: &str,
        _data_split: DataSplit,
    ) -> Result<SessionToken, ApiError> {
        self.session_names
            .lock()
            .unwrap()
            .push(session_name.to_string());
        Ok(SessionToken::new("tok-1"))
    }

    fn session_status(&self, _token: &SessionToken) -> Result<SessionStatus, ApiError> {
        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ApiError::Protocol {
                message: "status script exhausted".into(),
            })
    }

    fn seed_labels(&self, _token: &SessionToken) -> Result<Vec<LabelRecord>, ApiError> {
        *self.seed_calls.lock().unwrap() += 1;
        match self.seed_batches.lock().unwrap().pop_front() {
            Some(batch) => batch,
            None => Ok(Vec::new()),
        }
    }

    fn submit_predictions(
        &self,
        _token: &SessionToken,
        predictions: &PredictionBatch,
    ) -> Result<(), ApiError> {
        self.submissions.lock().unwrap().push(predictions.len());
        Ok(())
    }

    fn query_labels(
        &self,
        _token: &SessionToken,
        item_ids: &[String],
    ) -> Result<Vec<LabelRecord>, ApiError> {
        self.queried.lock().unwrap().push(item_ids.to_vec());
        Ok(item_ids
            .iter()
            .map(|id| LabelRecord::new(id.clone()).with_field("class", json!("queried")))
            .collect())
    }
}

#[derive(Default)]
struct RecordingLearner {
    calls: Vec<String>,
    staged: Option<Stage>,
    uncertain: Vec<String>,
    fit_sizes: Vec<usize>,
    datasets_seen: Vec<String>,
}

impl RecordingLearner {
    fn wanting(ids: &[&str]) -> Self {
        Self {
            uncertain: ids.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn count(&self, call: &str) -> usize {
        self.calls.iter().filter(|c| c.as_str() == call).count()
    }
}

impl ILearner for RecordingLearner {
    fn set_stage(&mut self, stage: Stage, dataset: &DatasetMetadata) {
        self.staged = Some(stage);
        self.datasets_seen.push(dataset.name.clone());
        self.calls.push(format!("set_stage:{stage}"));
    }

    fn fit(&mut self, labels: &LabelCache) -> Result<(), LearnerError> {
        if self.staged.is_none() {
            return Err(LearnerError::StageNotSet);
        }
        self.fit_sizes.push(labels.len());
        self.calls.push("fit".into());
        Ok(())
    }

    fn predict(&mut self) -> Result<PredictionBatch, LearnerError> {
        self.calls.push("predict".into());
        let mut batch = PredictionBatch::new();
        batch.push(PredictionRow::new("img_0001.png").with_field("class", json!("3")));
        Ok(batch)
    }

    fn select_uncertain(&mut self) -> Result<Vec<String>, LearnerError> {
        self.calls.push("select".into());
        Ok(self.uncertain.clone())
    }
}

// ─── Cadence ───────────────────────────────────────────────────────────

#[test]
fn image_classification_runs_four_seeds_and_four_checkpoints_per_stage() {
    let api = FakeApi::with_script(scripted_run(ProblemType::ImageClassification));
    let mut learner = RecordingLearner::wanting(&["u1", "u2"]);

    let runner = SessionRunner::open(
        &api,
        &make_task(ProblemType::ImageClassification),
        DataSplit::Sample,
        "cadence - run starting at now - 001",
    )
    .unwrap();
    let report = runner.run(&mut learner).unwrap();

    assert_eq!(report.seed_rounds, 8);
    assert_eq!(report.checkpoints, 8);
    assert_eq!(api.seed_calls(), 8);
    assert_eq!(api.submissions().len(), 16);
    assert_eq!(api.queried().len(), 8);
    assert_eq!(api.remaining_statuses(), 0);

    assert_eq!(learner.count("set_stage:base"), 1);
    assert_eq!(learner.count("set_stage:adaptation"), 1);
    assert_eq!(learner.calls[0], "set_stage:base");
    assert_eq!(learner.datasets_seen, vec!["mnist", "usps"]);
    assert_eq!(learner.count("fit"), 16);
    assert_eq!(learner.count("predict"), 16);
}

#[test]
fn machine_translation_skips_seeds_and_doubles_checkpoints() {
    let api = FakeApi::with_script(scripted_run(ProblemType::MachineTranslation));
    let mut learner = RecordingLearner::wanting(&["s1"]);

    let runner = SessionRunner::open(
        &api,
        &make_task(ProblemType::MachineTranslation),
        DataSplit::Full,
        "mt - run starting at now - 001",
    )
    .unwrap();
    let report = runner.run(&mut learner).unwrap();

    assert_eq!(report.seed_rounds, 0);
    assert_eq!(report.checkpoints, 16);
    assert_eq!(api.seed_calls(), 0);
    assert_eq!(api.submissions().len(), 16);
    assert_eq!(api.queried().len(), 16);
    assert_eq!(api.remaining_statuses(), 0);
}

#[test]
fn unchanged_refreshes_are_counted_once_each() {
    // Every scripted status carries a fresh timestamp, so only the
    // stage flip and the final Complete count as real changes.
    let api = FakeApi::with_script(scripted_run(ProblemType::ImageClassification));
    let mut learner = RecordingLearner::wanting(&["u1"]);

    let runner = SessionRunner::open(
        &api,
        &make_task(ProblemType::ImageClassification),
        DataSplit::Sample,
        "diff - run starting at now - 001",
    )
    .unwrap();
    let report = runner.run(&mut learner).unwrap();

    assert_eq!(report.unchanged_refreshes, 30);
}

// ─── Budget ────────────────────────────────────────────────────────────

#[test]
fn seed_spending_freezes_the_budget_and_the_session_continues() {
    // Opening ledger {used: 0, left: 5}; the first seed round flips it
    // to {used: 10, left: 0} and it stays there. With no budget left,
    // every checkpoint skips its query round.
    let mut stamp = 100;
    let mut next = |stage: Stage, active: ActiveState, dataset: &str| {
        stamp += 1;
        make_status(stage, active, 10, 0, dataset, stamp)
    };
    let mut script = vec![make_status(Stage::Base, ActiveState::Active, 0, 5, "mnist", 0)];
    for _ in 0..8 {
        script.push(next(Stage::Base, ActiveState::Active, "mnist"));
    }
    for c in 1..=4 {
        if c == 4 {
            script.push(next(Stage::Adaptation, ActiveState::Active, "usps"));
        } else {
            script.push(next(Stage::Base, ActiveState::Active, "mnist"));
        }
    }
    for _ in 0..8 {
        script.push(next(Stage::Adaptation, ActiveState::Active, "usps"));
    }
    for c in 1..=4 {
        let active = if c == 4 {
            ActiveState::Complete
        } else {
            ActiveState::Active
        };
        script.push(next(Stage::Adaptation, active, "usps"));
    }
    assert_eq!(script.len(), 25);

    let api = FakeApi::with_script(script);
    api.queue_seed_batch(Ok((0..10)
        .map(|i| seed_record(&format!("img_{i:04}.png")))
        .collect()));
    let mut learner = RecordingLearner::wanting(&["u1", "u2"]);

    let runner = SessionRunner::open(
        &api,
        &make_task(ProblemType::ImageClassification),
        DataSplit::Sample,
        "budget - run starting at now - 001",
    )
    .unwrap();
    let report = runner.run(&mut learner).unwrap();

    // Ten labels arrive in round one and every later fit still sees them.
    assert_eq!(learner.fit_sizes[0], 10);
    assert!(learner.fit_sizes.iter().all(|&n| n == 10));
    assert_eq!(learner.count("fit"), 8);
    assert_eq!(learner.count("select"), 0);
    assert!(api.queried().is_empty());

    assert_eq!(report.seed_rounds, 8);
    assert_eq!(report.checkpoints, 8);
    assert_eq!(report.budget_used, 10);
    assert_eq!(report.unchanged_refreshes, 21);
    assert_eq!(api.submissions().len(), 16);
    assert_eq!(api.remaining_statuses(), 0);

    // The stage was announced exactly once per stage, before any fit.
    assert_eq!(learner.calls[0], "set_stage:base");
    assert_eq!(learner.count("set_stage:base"), 1);
    assert_eq!(learner.count("set_stage:adaptation"), 1);
}

#[test]
fn empty_uncertainty_selection_skips_the_label_query() {
    let api = FakeApi::with_script(scripted_run(ProblemType::ImageClassification));
    let mut learner = RecordingLearner::default();

    let runner = SessionRunner::open(
        &api,
        &make_task(ProblemType::ImageClassification),
        DataSplit::Sample,
        "empty - run starting at now - 001",
    )
    .unwrap();
    let report = runner.run(&mut learner).unwrap();

    assert!(api.queried().is_empty());
    assert_eq!(learner.count("select"), 8);
    assert_eq!(learner.count("fit"), 16);
    assert_eq!(report.checkpoints, 8);
    assert_eq!(api.remaining_statuses(), 0);
}

// ─── Failure paths ─────────────────────────────────────────────────────

#[test]
fn missing_stage_transition_fails_the_session() {
    let seeds = 4;
    let mut stamp = 0;
    let mut script = Vec::new();
    for _ in 0..1 + seeds * 2 + 8 {
        stamp += 1;
        script.push(make_status(
            Stage::Base,
            ActiveState::Active,
            0,
            5,
            "mnist",
            stamp,
        ));
    }

    let api = FakeApi::with_script(script);
    let mut learner = RecordingLearner::wanting(&["u1"]);

    let runner = SessionRunner::open(
        &api,
        &make_task(ProblemType::ImageClassification),
        DataSplit::Sample,
        "stuck - run starting at now - 001",
    )
    .unwrap();
    let err = runner.run(&mut learner).unwrap_err();

    match err {
        SessionError::StageTransition {
            checkpoint,
            reported,
        } => {
            assert_eq!(checkpoint, 4);
            assert_eq!(reported, Stage::Base);
        }
        other => panic!("expected StageTransition, got {other:?}"),
    }
    assert_eq!(api.submissions().len(), 8);
    assert_eq!(api.remaining_statuses(), 0);
}

#[test]
fn session_not_marked_complete_is_an_error() {
    let mut script = scripted_run(ProblemType::ImageClassification);
    let last = script.last_mut().unwrap();
    last.active = ActiveState::Active;

    let api = FakeApi::with_script(script);
    let mut learner = RecordingLearner::wanting(&["u1"]);

    let runner = SessionRunner::open(
        &api,
        &make_task(ProblemType::ImageClassification),
        DataSplit::Sample,
        "open-ended - run starting at now - 001",
    )
    .unwrap();
    let err = runner.run(&mut learner).unwrap_err();

    assert!(matches!(
        err,
        SessionError::Incomplete {
            state: ActiveState::Active
        }
    ));
    assert_eq!(api.submissions().len(), 16);
    assert_eq!(api.remaining_statuses(), 0);
}

#[test]
fn seed_protocol_violation_aborts_before_any_submission() {
    let script = vec![make_status(
        Stage::Base,
        ActiveState::Active,
        0,
        5,
        "mnist",
        1,
    )];
    let api = FakeApi::with_script(script);
    api.queue_seed_batch(Err(ApiError::Protocol {
        message: "Server processing error: seed labels unavailable".into(),
    }));
    let mut learner = RecordingLearner::wanting(&["u1"]);

    let runner = SessionRunner::open(
        &api,
        &make_task(ProblemType::ImageClassification),
        DataSplit::Sample,
        "seedless - run starting at now - 001",
    )
    .unwrap();
    let err = runner.run(&mut learner).unwrap_err();

    match err {
        SessionError::Api(ApiError::Protocol { message }) => {
            assert!(message.contains("seed labels unavailable"));
        }
        other => panic!("expected Api(Protocol), got {other:?}"),
    }
    assert!(api.submissions().is_empty());
    assert_eq!(api.seed_calls(), 1);
    assert_eq!(learner.count("fit"), 0);
}

// ─── Naming and formatting ─────────────────────────────────────────────

#[test]
fn session_names_carry_prefix_timestamp_and_postfix() {
    let name = compose_session_name("nightly", "042");
    assert!(name.starts_with("nightly - run starting at "));
    assert!(name.ends_with(" - 042"));
}

#[test]
fn elapsed_formatting() {
    assert_eq!(
        format_elapsed(Duration::from_secs(0)),
        "0 hours 00 minutes and 00 seconds"
    );
    assert_eq!(
        format_elapsed(Duration::from_secs(3725)),
        "1 hours 02 minutes and 05 seconds"
    );
}
