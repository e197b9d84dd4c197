//! Command line and environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};
use thiserror::Error;

use tfrun_client::config::DEFAULT_HOSTNAME;
use tfrun_client::ClientConfig;
use tfrun_core::{CoreError, PollPolicy, RunOptions, WorkspaceRef};
use tfrun_runner::{ActionPlan, OrchestratorConfig, OutputTransformer};

/// Default message attached to created runs.
pub const DEFAULT_RUN_MESSAGE: &str = "Queued by tfrun";

/// tfrun - drive a remote run to completion and export its outputs
#[derive(Parser, Debug)]
#[command(name = "tfrun")]
#[command(about = "Create a remote run, wait for it, and export workspace outputs", long_about = None)]
pub struct Cli {
    /// Organization owning the workspace
    #[arg(long, env = "TFRUN_ORGANIZATION")]
    pub organization: String,

    /// Workspace name
    #[arg(long, env = "TFRUN_WORKSPACE")]
    pub workspace: String,

    /// Platform hostname
    #[arg(long, env = "TFRUN_HOSTNAME", default_value = DEFAULT_HOSTNAME)]
    pub hostname: String,

    /// API token
    #[arg(long, env = "TFRUN_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "TFRUN_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    #[command(flatten)]
    pub poll: PollArgs,

    /// Expose output FROM under the name TO (FROM=TO, repeatable)
    #[arg(long = "rename-output", value_name = "FROM=TO", value_parser = parse_rename)]
    pub renames: Vec<(String, String)>,

    /// File receiving `key=value` outputs; stdout when unset
    #[arg(long, env = "GITHUB_OUTPUT")]
    pub output_file: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Log level used when `RUST_LOG` is unset.
    pub fn default_log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a run (unless skipped), wait for it, and export outputs
    Run(RunArgs),

    /// Create a destroy run
    Destroy {
        /// Run message
        #[arg(long, env = "TFRUN_MESSAGE", default_value = DEFAULT_RUN_MESSAGE)]
        message: String,

        /// Wait for the run to finish
        #[arg(long, env = "TFRUN_WAIT_FOR_RUN", default_value_t = true, action = ArgAction::Set)]
        wait_for_run: bool,
    },

    /// Export outputs of the workspace's current state version
    Outputs,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Run message
    #[arg(long, env = "TFRUN_MESSAGE", default_value = DEFAULT_RUN_MESSAGE)]
    pub message: String,

    /// Apply automatically once the plan succeeds
    #[arg(long, env = "TFRUN_AUTO_APPLY", default_value_t = true, action = ArgAction::Set)]
    pub auto_apply: bool,

    /// Plan a destroy; no outputs are exported
    #[arg(long, env = "TFRUN_IS_DESTROY", default_value_t = false, action = ArgAction::Set)]
    pub is_destroy: bool,

    /// Wait for the run to finish
    #[arg(long, env = "TFRUN_WAIT_FOR_RUN", default_value_t = true, action = ArgAction::Set)]
    pub wait_for_run: bool,

    /// Do not create a run, only export outputs
    #[arg(long, env = "TFRUN_SKIP_RUN", default_value_t = false, action = ArgAction::Set)]
    pub skip_run: bool,

    /// Resource address to replace (repeatable, or newline-separated)
    #[arg(long = "replace-addr", env = "TFRUN_REPLACE_ADDRS", value_delimiter = '\n')]
    pub replace_addrs: Vec<String>,

    /// Resource address to target (repeatable, or newline-separated)
    #[arg(long = "target-addr", env = "TFRUN_TARGET_ADDRS", value_delimiter = '\n')]
    pub target_addrs: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct PollArgs {
    /// Seconds between run status polls
    #[arg(long, env = "TFRUN_RUN_POLL_INTERVAL_SECS", default_value_t = 3)]
    pub run_poll_interval_secs: u64,

    /// Seconds between output readiness polls
    #[arg(long, env = "TFRUN_OUTPUTS_POLL_INTERVAL_SECS", default_value_t = 1)]
    pub outputs_poll_interval_secs: u64,

    /// Grow poll intervals by doubling up to this many seconds
    #[arg(long, env = "TFRUN_MAX_POLL_INTERVAL_SECS")]
    pub max_poll_interval_secs: Option<u64>,

    /// Give up waiting after this many seconds (per wait)
    #[arg(long, env = "TFRUN_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Consecutive failed poll requests to tolerate
    #[arg(long, env = "TFRUN_POLL_ERROR_TOLERANCE", default_value_t = 0)]
    pub poll_error_tolerance: u32,
}

impl PollArgs {
    fn policy(&self, interval_secs: u64) -> PollPolicy {
        let mut policy = PollPolicy::fixed(Duration::from_secs(interval_secs.max(1)))
            .with_error_tolerance(self.poll_error_tolerance);

        if let Some(max) = self.max_poll_interval_secs {
            policy = policy.with_backoff(Duration::from_secs(max), 2);
        }
        if let Some(timeout) = self.timeout_secs {
            policy = policy.with_deadline(Duration::from_secs(timeout));
        }
        policy
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Invalid(#[from] CoreError),
}

/// What `main` does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Run(ActionPlan),
    Destroy { wait_for_run: bool },
    Outputs,
}

/// Resolved configuration.
#[derive(Debug)]
pub struct Config {
    pub client: ClientConfig,
    pub orchestrator: OrchestratorConfig,
    pub transformer: OutputTransformer,
    pub action: Action,
    pub output_file: Option<PathBuf>,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let workspace = WorkspaceRef::new(cli.organization, cli.workspace)?;

        let client = ClientConfig::new(cli.hostname, cli.token)
            .with_timeout(Duration::from_secs(cli.request_timeout_secs));

        let (run_options, action) = match cli.command {
            Commands::Run(args) => {
                let options = RunOptions::new(args.message)
                    .with_auto_apply(args.auto_apply)
                    .with_destroy(args.is_destroy)
                    .with_replace_addrs(args.replace_addrs)
                    .with_target_addrs(args.target_addrs);
                let plan = ActionPlan {
                    wait_for_run: args.wait_for_run,
                    skip_run: args.skip_run,
                };
                (options, Action::Run(plan))
            }
            Commands::Destroy {
                message,
                wait_for_run,
            } => (
                RunOptions::new(message).into_destroy(),
                Action::Destroy { wait_for_run },
            ),
            Commands::Outputs => (RunOptions::new(DEFAULT_RUN_MESSAGE), Action::Outputs),
        };

        let orchestrator = OrchestratorConfig::new(workspace, run_options)
            .with_run_poll(cli.poll.policy(cli.poll.run_poll_interval_secs))
            .with_outputs_poll(cli.poll.policy(cli.poll.outputs_poll_interval_secs));

        let transformer = cli
            .renames
            .into_iter()
            .fold(OutputTransformer::new(), |t, (from, to)| t.with_rename(from, to));

        Ok(Self {
            client,
            orchestrator,
            transformer,
            action,
            output_file: cli.output_file,
        })
    }
}

fn parse_rename(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((from, to)) if !from.trim().is_empty() && !to.trim().is_empty() => {
            Ok((from.trim().to_string(), to.trim().to_string()))
        }
        _ => Err(format!("expected FROM=TO, got {s:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tfrun_core::RunKind;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec![
            "tfrun",
            "--organization",
            "hashicorp",
            "--workspace",
            "foobar",
            "--token",
            "t0k3n",
        ];
        argv.extend_from_slice(args);
        Config::from_cli(Cli::try_parse_from(argv).unwrap()).unwrap()
    }

    #[test]
    fn test_run_defaults() {
        let config = parse(&["run"]);

        assert_eq!(config.client.hostname, "app.terraform.io");
        assert_eq!(config.client.timeout, Duration::from_secs(30));
        assert_eq!(config.orchestrator.workspace.to_string(), "hashicorp/foobar");
        assert_eq!(config.orchestrator.run_options.message, DEFAULT_RUN_MESSAGE);
        assert!(config.orchestrator.run_options.auto_apply);
        assert_eq!(config.orchestrator.run_options.kind(), RunKind::Apply);
        assert_eq!(config.orchestrator.run_options.replace_addrs, None);
        assert_eq!(config.action, Action::Run(ActionPlan::default()));
        assert_eq!(config.orchestrator.run_poll, PollPolicy::fixed(Duration::from_secs(3)));
        assert_eq!(
            config.orchestrator.outputs_poll,
            PollPolicy::fixed(Duration::from_secs(1))
        );
    }

    #[test]
    fn test_run_flags() {
        let config = parse(&[
            "run",
            "--message",
            "Deploy",
            "--auto-apply",
            "false",
            "--wait-for-run",
            "false",
            "--skip-run",
            "true",
            "--target-addr",
            "module.a",
            "--target-addr",
            "module.b",
            "--replace-addr",
            "aws_instance.x\naws_instance.y",
        ]);

        let options = &config.orchestrator.run_options;
        assert_eq!(options.message, "Deploy");
        assert!(!options.auto_apply);
        assert_eq!(
            options.target_addrs,
            Some(vec!["module.a".to_string(), "module.b".to_string()])
        );
        assert_eq!(
            options.replace_addrs,
            Some(vec!["aws_instance.x".to_string(), "aws_instance.y".to_string()])
        );
        assert_eq!(
            config.action,
            Action::Run(ActionPlan {
                wait_for_run: false,
                skip_run: true
            })
        );
    }

    #[test]
    fn test_poll_tuning() {
        let config = parse(&[
            "--max-poll-interval-secs",
            "30",
            "--timeout-secs",
            "600",
            "--poll-error-tolerance",
            "2",
            "run",
        ]);

        let policy = config.orchestrator.run_poll;
        assert_eq!(policy.interval, Duration::from_secs(3));
        assert_eq!(policy.max_interval, Duration::from_secs(30));
        assert_eq!(policy.backoff_factor, 2);
        assert_eq!(policy.deadline, Some(Duration::from_secs(600)));
        assert_eq!(policy.max_consecutive_errors, 2);
    }

    #[test]
    fn test_verbose_sets_debug_level() {
        let base = ["tfrun", "--organization", "o", "--workspace", "w", "--token", "t"];

        let quiet = Cli::try_parse_from(base.iter().chain(&["outputs"])).unwrap();
        assert_eq!(quiet.default_log_level(), "info");

        let verbose = Cli::try_parse_from(base.iter().chain(&["-v", "outputs"])).unwrap();
        assert_eq!(verbose.default_log_level(), "debug");
    }

    #[test]
    fn test_destroy_command() {
        let config = parse(&["destroy", "--wait-for-run", "false"]);

        assert_eq!(config.orchestrator.run_options.kind(), RunKind::Destroy);
        assert_eq!(config.action, Action::Destroy { wait_for_run: false });
    }

    #[test]
    fn test_renames() {
        let config = parse(&["--rename-output", "ngrok_domain=tfe_hostname", "outputs"]);
        assert_eq!(config.action, Action::Outputs);
        assert!(format!("{:?}", config.transformer).contains("tfe_hostname"));
    }

    #[test]
    fn test_bad_rename_is_rejected() {
        let result = Cli::try_parse_from([
            "tfrun",
            "--organization",
            "o",
            "--workspace",
            "w",
            "--token",
            "t",
            "--rename-output",
            "nope",
            "outputs",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_organization_is_rejected() {
        let cli = Cli::try_parse_from([
            "tfrun",
            "--organization",
            "",
            "--workspace",
            "w",
            "--token",
            "t",
            "outputs",
        ])
        .unwrap();
        assert!(Config::from_cli(cli).is_err());
    }
}
