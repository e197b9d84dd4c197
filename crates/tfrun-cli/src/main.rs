//! tfrun - create a remote run, wait for it, and export workspace outputs.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use tfrun_client::TfeClient;
use tfrun_core::RunKind;
use tfrun_runner::{ActionResult, CancellationToken, RunOrchestrator};

mod config;
mod output;

use config::{Action, Cli, Config};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries outputs and mask commands.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.default_log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "tfrun failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_cli(cli)?;

    info!(
        hostname = %config.client.hostname,
        workspace = %config.orchestrator.workspace,
        "Starting tfrun"
    );

    let client = TfeClient::new(&config.client)?;

    // Ctrl-C stops any wait in progress.
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling");
            on_signal.cancel();
        }
    });

    let orchestrator = RunOrchestrator::new(Arc::new(client), config.orchestrator)
        .with_transformer(config.transformer)
        .with_cancellation(cancel);

    let result = match config.action {
        Action::Run(plan) => orchestrator.execute(plan).await?,
        Action::Destroy { wait_for_run } => ActionResult {
            run_id: Some(orchestrator.destroy(wait_for_run).await?),
            outputs: None,
        },
        Action::Outputs => ActionResult {
            run_id: None,
            outputs: Some(orchestrator.fetch_outputs(RunKind::Apply).await?),
        },
    };

    output::emit(&result, config.output_file.as_deref())?;
    Ok(())
}
