//! Command-line interface for the `lowshot` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use lowshot_core::config::{CliOverrides, Environment};
use lowshot_core::errors::ConfigError;
use lowshot_core::models::{DataSplit, ProblemType};

#[derive(Parser, Debug)]
#[command(name = "lowshot", version, about = "Harness for the few-shot benchmark service")]
pub struct Cli {
    /// Deployment environment: local, dev, staging, or prod.
    #[arg(long, global = true)]
    pub environment: Option<Environment>,

    /// Team secret used to authenticate API calls.
    #[arg(long, global = true)]
    pub team_secret: Option<String>,

    /// Log level when LOWSHOT_LOG is unset: trace, debug, info, warn,
    /// or error.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Explicit config file; replaces the `lowshot.toml` lookup.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Dataset root directory.
    #[arg(long, global = true)]
    pub dataset_dir: Option<PathBuf>,

    /// Data split selection: sample, full, or all.
    #[arg(long, global = true)]
    pub data_split: Option<String>,

    /// Problem type selection: one of the four task families, or all.
    #[arg(long, global = true)]
    pub problem_type: Option<String>,

    /// Run only this task id.
    #[arg(long, global = true)]
    pub task_id: Option<String>,

    /// Skip tasks touching this dataset. Repeat for several.
    #[arg(long = "skip-dataset", global = true)]
    pub skip_datasets: Vec<String>,

    /// Session name prefix.
    #[arg(long, global = true)]
    pub session_prefix: Option<String>,

    /// Session name postfix.
    #[arg(long, global = true)]
    pub session_postfix: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List benchmark tasks grouped by problem type.
    Tasks,
    /// Validate the dataset directory layout for the selected
    /// environment.
    Check,
}

/// Expand a `--data-split` argument; `all` selects every split.
pub fn parse_data_splits(raw: &str) -> Result<Vec<DataSplit>, ConfigError> {
    match raw {
        "all" => Ok(vec![DataSplit::Sample, DataSplit::Full]),
        other => Ok(vec![other.parse()?]),
    }
}

/// Expand a `--problem-type` argument; `all` selects every family.
pub fn parse_problem_types(raw: &str) -> Result<Vec<ProblemType>, ConfigError> {
    match raw {
        "all" => Ok(ProblemType::ALL.to_vec()),
        other => Ok(vec![other.parse()?]),
    }
}

impl Cli {
    /// Convert flags into config overrides.
    pub fn overrides(&self) -> Result<CliOverrides, ConfigError> {
        Ok(CliOverrides {
            config_file: self.config.clone(),
            environment: self.environment,
            team_secret: self.team_secret.clone(),
            dataset_dir: self.dataset_dir.clone(),
            data_splits: self
                .data_split
                .as_deref()
                .map(parse_data_splits)
                .transpose()?,
            problem_types: self
                .problem_type
                .as_deref()
                .map(parse_problem_types)
                .transpose()?,
            task_id: self.task_id.clone(),
            skip_datasets: if self.skip_datasets.is_empty() {
                None
            } else {
                Some(self.skip_datasets.clone())
            },
            session_name_prefix: self.session_prefix.clone(),
            session_name_postfix: self.session_postfix.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn all_expands_selections() {
        assert_eq!(
            parse_data_splits("all").unwrap(),
            vec![DataSplit::Sample, DataSplit::Full]
        );
        assert_eq!(parse_problem_types("all").unwrap(), ProblemType::ALL.to_vec());
        assert_eq!(
            parse_data_splits("full").unwrap(),
            vec![DataSplit::Full]
        );
        assert_eq!(
            parse_problem_types("machine_translation").unwrap(),
            vec![ProblemType::MachineTranslation]
        );
    }

    #[test]
    fn bad_selections_are_rejected() {
        assert!(parse_data_splits("half").is_err());
        assert!(parse_problem_types("speech").is_err());
    }

    #[test]
    fn flags_become_overrides() {
        let cli = Cli::parse_from([
            "lowshot",
            "--environment",
            "staging",
            "--team-secret",
            "s3cr3t",
            "--data-split",
            "all",
            "--skip-dataset",
            "voc",
            "--skip-dataset",
            "coco",
            "tasks",
        ]);
        assert!(matches!(cli.command, Command::Tasks));

        let overrides = cli.overrides().unwrap();
        assert_eq!(overrides.environment, Some(Environment::Staging));
        assert_eq!(overrides.team_secret.as_deref(), Some("s3cr3t"));
        assert_eq!(
            overrides.data_splits,
            Some(vec![DataSplit::Sample, DataSplit::Full])
        );
        assert_eq!(
            overrides.skip_datasets,
            Some(vec!["voc".to_string(), "coco".to_string()])
        );
        assert_eq!(overrides.problem_types, None);
    }
}
