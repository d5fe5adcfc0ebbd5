mod cache;
mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod services;
mod workflow;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::commit::{self as commit_cmd, CommitCommandArgs};
use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::parse as parse_cmd;
use crate::cmd::push::{self as push_cmd, PushCommandArgs};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::git::GitCli;
use crate::infra::tracker::HttpTracker;
use crate::services::select_notifier;
use crate::workflow::batch::BatchOptions;

#[derive(Parser)]
#[command(
    name = "ticket-hook",
    author,
    version,
    about = "Apply ticket commands from commit messages (\"fixes #12, refs #10\")"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process every commit of a push webhook payload.
    Push(PushArgs),
    /// Process a commit from the local git repository.
    Commit(CommitArgs),
    /// Show which tickets a message would touch, without contacting the tracker.
    Parse(ParseArgs),
    /// Manage hook configuration.
    Config(ConfigArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Status given to closed tickets (overrides the configured value).
    #[arg(long)]
    status: Option<String>,
    /// Process commits even if they were handled before.
    #[arg(long)]
    force: bool,
    /// Print the planned ticket commands instead of applying them.
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args)]
struct PushArgs {
    /// JSON payload file; read from stdin when omitted.
    #[arg(short, long)]
    payload: Option<PathBuf>,
    #[command(flatten)]
    run: RunArgs,
}

#[derive(Args)]
struct CommitArgs {
    /// Revision to read.
    #[arg(default_value = "HEAD")]
    revision: String,
    /// Repository name used in changeset links; defaults to the work tree directory name.
    #[arg(long)]
    repo_name: Option<String>,
    #[command(flatten)]
    run: RunArgs,
}

#[derive(Args)]
struct ParseArgs {
    /// Commit message to scan.
    #[arg(required = true)]
    message: Vec<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(error) = run(cli.command).await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("ticket_hook={default_level}"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(command: Commands) -> AppResult<()> {
    match command {
        Commands::Config(args) => config_cmd::run(args.command),
        Commands::Parse(args) => {
            print!("{}", parse_cmd::run(&args.message));
            Ok(())
        }
        Commands::Push(args) => {
            let ctx = build_context(args.run.status.clone())?;
            push_cmd::run(
                &ctx,
                PushCommandArgs {
                    payload: args.payload,
                    options: batch_options(&args.run),
                },
            )
            .await
        }
        Commands::Commit(args) => {
            let ctx = build_context(args.run.status.clone())?;
            commit_cmd::run(
                &ctx,
                CommitCommandArgs {
                    revision: args.revision,
                    repository: args.repo_name,
                    options: batch_options(&args.run),
                },
            )
            .await
        }
    }
}

fn batch_options(args: &RunArgs) -> BatchOptions {
    BatchOptions {
        force: args.force,
        dry_run: args.dry_run,
    }
}

fn build_context(status_override: Option<String>) -> AppResult<AppContext> {
    let mut config = AppConfig::load()?;
    if let Some(status) = status_override.filter(|status| !status.trim().is_empty()) {
        config.close_status = status.trim().to_string();
    }

    if config.tracker_url.is_none() {
        tracing::warn!("tracker URL not configured; ticket updates will fail");
    }

    let tracker = Arc::new(HttpTracker::new(
        config.tracker_url.clone(),
        config.tracker_user.clone(),
        config.tracker_token.clone(),
    ));
    let notifier = select_notifier(config.notify, tracker.clone());

    let cwd = std::env::current_dir()?;
    let git = Arc::new(GitCli::new(cwd));

    Ok(AppContext::new(config, git, tracker, notifier))
}
