//! Multi-session fan-out across tasks, problem types, and data splits.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use lowshot_core::config::RunConfig;
use lowshot_core::errors::{ApiError, HarnessResult};
use lowshot_core::models::{DataSplit, ProblemType, TaskMetadata};
use lowshot_core::traits::{IBenchmarkApi, ILearner};
use lowshot_session::{compose_session_name, format_elapsed, SessionRunner};

/// Builds a learner for one task. Called once per session.
pub type LearnerFactory<'a> = dyn FnMut(&TaskMetadata) -> Box<dyn ILearner> + 'a;

/// What a full run accomplished.
#[derive(Debug, Clone, Default)]
pub struct WorkflowReport {
    /// `{task_id}--{split}` for every completed session, in run order.
    pub completed: Vec<String>,
    /// Completed session count keyed by `{problem_type}--{split}`.
    pub completed_by_kind: HashMap<String, usize>,
    /// Wall time for the whole run.
    pub elapsed: Duration,
}

/// Runs sessions for every selected task.
pub struct Workflow<'a> {
    api: &'a dyn IBenchmarkApi,
    config: &'a RunConfig,
}

impl<'a> Workflow<'a> {
    pub fn new(api: &'a dyn IBenchmarkApi, config: &'a RunConfig) -> Self {
        Self { api, config }
    }

    /// Fetch metadata for every advertised task and group by problem
    /// type. Tasks with unreadable metadata are logged and dropped, as
    /// are tasks whose datasets appear in the skip list.
    pub fn discover(&self) -> Result<HashMap<ProblemType, Vec<TaskMetadata>>, ApiError> {
        let task_ids = self.api.list_tasks()?;
        tracing::info!("workflow: service advertises {} tasks", task_ids.len());
        let mut grouped: HashMap<ProblemType, Vec<TaskMetadata>> = HashMap::new();
        for task_id in &task_ids {
            let meta = match self.api.task_metadata(task_id) {
                Ok(meta) => meta,
                Err(err) => {
                    tracing::error!("workflow: skipping task {task_id}: {err}");
                    continue;
                }
            };
            if self.skipped(&meta) {
                tracing::info!("workflow: skipping task {task_id}, dataset in skip list");
                continue;
            }
            grouped.entry(meta.problem_type).or_default().push(meta);
        }
        Ok(grouped)
    }

    fn skipped(&self, meta: &TaskMetadata) -> bool {
        self.config
            .skip_datasets
            .iter()
            .any(|name| name == &meta.base_dataset || name == &meta.adaptation_dataset)
    }

    /// Run every selected session to completion. A pinned `task_id`
    /// bypasses discovery and the problem type selection.
    pub fn run(&self, make_learner: &mut LearnerFactory<'_>) -> HarnessResult<WorkflowReport> {
        let started = Instant::now();
        let mut report = WorkflowReport::default();

        if let Some(task_id) = &self.config.task_id {
            let meta = self.api.task_metadata(task_id)?;
            for split in &self.config.data_splits {
                self.run_one(&meta, *split, make_learner, &mut report)?;
            }
        } else {
            let grouped = self.discover()?;
            for split in &self.config.data_splits {
                for problem_type in &self.config.problem_types {
                    let Some(tasks) = grouped.get(problem_type) else {
                        continue;
                    };
                    for task in tasks {
                        self.run_one(task, *split, make_learner, &mut report)?;
                    }
                }
            }
        }

        report.elapsed = started.elapsed();
        tracing::info!("workflow: completed sessions: {:?}", report.completed);
        tracing::info!(
            "workflow: full run took {}",
            format_elapsed(report.elapsed)
        );
        Ok(report)
    }

    fn run_one(
        &self,
        task: &TaskMetadata,
        split: DataSplit,
        make_learner: &mut LearnerFactory<'_>,
        report: &mut WorkflowReport,
    ) -> HarnessResult<()> {
        let name = compose_session_name(
            &self.config.session_name_prefix,
            &self.config.session_name_postfix,
        );
        tracing::info!("workflow: running task {} on the {split} split", task.task_id);
        let runner = SessionRunner::open(self.api, task, split, &name)?;
        let mut learner = make_learner(task);
        let session = runner.run(learner.as_mut())?;
        tracing::info!(
            "workflow: session finished ({} seed rounds, {} checkpoints, {} budget used)",
            session.seed_rounds,
            session.checkpoints,
            session.budget_used
        );

        report.completed.push(format!("{}--{split}", task.task_id));
        *report
            .completed_by_kind
            .entry(format!("{}--{split}", task.problem_type))
            .or_insert(0) += 1;
        Ok(())
    }
}
