use std::path::Path;
use std::process::ExitCode;

use clap::Parser;

use lowshot_client::ApiClient;
use lowshot_core::models::ProblemType;
use lowshot_core::{config::HarnessConfig, HarnessResult};
use lowshot_harness::cli::{Cli, Command};
use lowshot_harness::{dataset, logging, Workflow};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_tracing(cli.log_level.as_deref());

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("harness: {err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> HarnessResult<()> {
    let overrides = cli.overrides()?;
    let config = HarnessConfig::load(Path::new("."), Some(&overrides))?;

    match cli.command {
        Command::Tasks => {
            config.api.ensure_secret()?;
            let client = ApiClient::new(&config.api)?;
            let workflow = Workflow::new(&client, &config.run);
            let grouped = workflow.discover()?;
            for problem_type in ProblemType::ALL {
                if !config.run.problem_types.contains(&problem_type) {
                    continue;
                }
                let Some(tasks) = grouped.get(&problem_type) else {
                    continue;
                };
                println!("{problem_type} ({} tasks)", tasks.len());
                for task in tasks {
                    println!(
                        "  {} (base: {}, adaptation: {})",
                        task.task_id, task.base_dataset, task.adaptation_dataset
                    );
                }
            }
            Ok(())
        }
        Command::Check => {
            dataset::validate_layout(&config.run.dataset_dir, config.api.environment)?;
            println!("dataset layout ok: {}", config.run.dataset_dir.display());
            Ok(())
        }
    }
}
