//! The session state machine.
//!
//! A session walks two stages. Each stage boils down to:
//!
//! 1. seed rounds (skipped for machine translation): fetch seed
//!    labels, refit, predict, submit;
//! 2. checkpoints: spend the label budget on ids the learner is
//!    uncertain about, refit, predict, submit.
//!
//! The service moves the session from `base` to `adaptation` after the
//! final base checkpoint and marks it `Complete` after the final
//! adaptation checkpoint. The runner verifies both.

use std::time::{Duration, Instant};

use chrono::Local;

use lowshot_core::errors::SessionError;
use lowshot_core::models::{
    ActiveState, DataSplit, LabelCache, ProblemType, SessionStatus, SessionToken, Stage,
    TaskMetadata,
};
use lowshot_core::traits::{IBenchmarkApi, ILearner};

/// Session names record when the run started, e.g.
/// `nightly - run starting at 07/14/2020, 21:08:00 - 001`.
pub fn compose_session_name(prefix: &str, postfix: &str) -> String {
    let stamp = Local::now().format("%m/%d/%Y, %H:%M:%S");
    format!("{prefix} - run starting at {stamp} - {postfix}")
}

/// Render a duration the way run summaries log it.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{hours} hours {minutes:02} minutes and {seconds:02} seconds")
}

/// Counters accumulated over one session run.
#[derive(Debug, Clone, Default)]
pub struct SessionReport {
    pub seed_rounds: usize,
    pub checkpoints: usize,
    /// Refreshes where nothing but the interaction timestamp moved.
    pub unchanged_refreshes: usize,
    /// Label budget consumed, as reported by the final status.
    pub budget_used: u64,
    pub elapsed: Duration,
}

/// Runs a single session from creation to its terminal state.
///
/// The runner owns the session token and the label cache; the API
/// client and the learner are borrowed for the run. `run` consumes the
/// runner: a finished session cannot be driven again.
pub struct SessionRunner<'a> {
    api: &'a dyn IBenchmarkApi,
    token: SessionToken,
    problem_type: ProblemType,
    status: SessionStatus,
    labels: LabelCache,
    report: SessionReport,
}

impl<'a> SessionRunner<'a> {
    /// Create a session for `task` and fetch its opening status.
    pub fn open(
        api: &'a dyn IBenchmarkApi,
        task: &TaskMetadata,
        split: DataSplit,
        session_name: &str,
    ) -> Result<Self, SessionError> {
        tracing::info!(
            "session: creating `{session_name}` for task {} ({split})",
            task.task_id
        );
        let token = api.start_session(&task.task_id, session_name, split)?;
        let status = api.session_status(&token)?;
        tracing::debug!(
            "session: opened in stage {} with budget {}",
            status.pair_stage,
            status.budget_left_until_checkpoint
        );
        Ok(Self {
            api,
            token,
            problem_type: task.problem_type,
            status,
            labels: LabelCache::new(),
            report: SessionReport::default(),
        })
    }

    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    /// Run both stages to completion and verify the terminal state.
    pub fn run(mut self, learner: &mut dyn ILearner) -> Result<SessionReport, SessionError> {
        let started = Instant::now();
        for stage in [Stage::Base, Stage::Adaptation] {
            tracing::info!("session: entering stage {stage}");
            learner.set_stage(stage, &self.status.current_dataset);
            self.seed_rounds(learner)?;
            self.checkpoints(learner, stage)?;
        }
        if self.status.active != ActiveState::Complete {
            return Err(SessionError::Incomplete {
                state: self.status.active,
            });
        }
        self.report.budget_used = self.status.budget_used;
        self.report.elapsed = started.elapsed();
        tracing::info!(
            "session: complete after {}",
            format_elapsed(self.report.elapsed)
        );
        Ok(self.report)
    }

    fn seed_rounds(&mut self, learner: &mut dyn ILearner) -> Result<(), SessionError> {
        for round in 1..=self.problem_type.seed_rounds() {
            tracing::info!("session: seed round {round}");
            let records = self.api.seed_labels(&self.token)?;
            self.refresh_status()?;
            let added = self.labels.merge(records);
            tracing::debug!("session: {added} new labels, {} cached", self.labels.len());
            learner.fit(&self.labels)?;
            let predictions = learner.predict()?;
            self.api.submit_predictions(&self.token, &predictions)?;
            self.refresh_status()?;
            self.report.seed_rounds += 1;
        }
        Ok(())
    }

    fn checkpoints(&mut self, learner: &mut dyn ILearner, stage: Stage) -> Result<(), SessionError> {
        let total = self.problem_type.checkpoints_per_stage();
        for checkpoint in 1..=total {
            tracing::info!("session: checkpoint {checkpoint}/{total} in stage {stage}");
            // The whole checkpoint budget is spent in one query round.
            if self.status.budget_left_until_checkpoint > 0 {
                self.query_round(learner)?;
            }
            let predictions = learner.predict()?;
            self.api.submit_predictions(&self.token, &predictions)?;
            self.refresh_status()?;
            if stage == Stage::Base
                && checkpoint == total
                && self.status.pair_stage != Stage::Adaptation
            {
                return Err(SessionError::StageTransition {
                    checkpoint,
                    reported: self.status.pair_stage,
                });
            }
            self.report.checkpoints += 1;
        }
        Ok(())
    }

    /// One active-learning round: ask the learner what it wants
    /// labeled, buy those labels, refit.
    fn query_round(&mut self, learner: &mut dyn ILearner) -> Result<(), SessionError> {
        let wanted = learner.select_uncertain()?;
        if wanted.is_empty() {
            tracing::debug!("session: learner requested no labels this round");
        } else {
            let records = self.api.query_labels(&self.token, &wanted)?;
            let added = self.labels.merge(records);
            tracing::debug!(
                "session: queried {} ids, {added} new labels",
                wanted.len()
            );
        }
        learner.fit(&self.labels)?;
        self.refresh_status()?;
        Ok(())
    }

    fn refresh_status(&mut self) -> Result<(), SessionError> {
        let fresh = self.api.session_status(&self.token)?;
        if !fresh.changed_since(&self.status) {
            tracing::info!("session: status did not change after refresh");
            self.report.unchanged_refreshes += 1;
        }
        self.status = fresh;
        tracing::info!(
            "session: budget used {}, left until checkpoint {}",
            self.status.budget_used,
            self.status.budget_left_until_checkpoint
        );
        Ok(())
    }
}
