//! # Pre-release Integration Runner
//!
//! Launches every example job chain for one run id against the configured
//! runner and exits non-zero if any job fails or the global timeout elapses.

use anyhow::Context;
use clap::builder::NonEmptyStringValueParser;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

use prerelease_it::config::{OrchestratorConfig, RunnerOverrides};
use prerelease_it::jobs::{JobRegistry, ProcessJobRunner};
use prerelease_it::logging::init_structured_logging;
use prerelease_it::orchestration::{build_chains, Orchestrator, RunContext};

#[derive(Parser, Debug)]
#[command(name = "prerelease-it")]
#[command(about = "Run the pre-release Dataflow example jobs and fail on any job failure")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Run identifier namespacing every output path
    #[arg(
        long = "runId",
        visible_alias = "run-id",
        value_name = "RUN_ID",
        value_parser = NonEmptyStringValueParser::new()
    )]
    run_id: String,

    /// Runner passed to every job (default: DataflowRunner)
    #[arg(long)]
    runner: Option<String>,

    /// Cloud project passed to every job
    #[arg(long)]
    project: Option<String>,

    /// Cloud region passed to every job
    #[arg(long)]
    region: Option<String>,

    /// Staging location passed to every job
    #[arg(long = "tempLocation", visible_alias = "temp-location")]
    temp_location: Option<String>,

    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Global timeout for the whole run, in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Print the planned chains as JSON without launching anything
    #[arg(long)]
    dry_run: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_structured_logging(cli.json_logs);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{e:#}"), "Pre-release run failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let overrides = RunnerOverrides {
        runner: cli.runner,
        project: cli.project,
        region: cli.region,
        temp_location: cli.temp_location,
        timeout_secs: cli.timeout_secs,
    };
    let config = OrchestratorConfig::load_with_overrides(cli.config.as_deref(), overrides)
        .context("Failed to load configuration")?;

    let ctx = RunContext::new(cli.run_id);

    if cli.dry_run {
        let groups = build_chains(&ctx, &config);
        println!("{}", serde_json::to_string_pretty(&groups)?);
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("prerelease-it")
        .build()
        .context("Failed to start async runtime")?;

    let registry = JobRegistry::uniform(Arc::new(ProcessJobRunner::new(config.launcher.clone())));
    let orchestrator = Orchestrator::new(registry, &config, runtime.handle().clone());

    info!(
        run_id = %ctx.run_id(),
        timeout_secs = orchestrator.timeout().as_secs(),
        "Starting pre-release run"
    );
    let outcome = runtime.block_on(orchestrator.run(&ctx, &config));

    // Chains still waiting after a timeout are abandoned; their jobs keep running remotely.
    runtime.shutdown_background();

    let report = outcome?;
    info!(chains = report.total(), "All Dataflow jobs ran successfully.");
    Ok(())
}
