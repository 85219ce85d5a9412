//! Follow command - follow a list of accounts.

use anyhow::{Context, Result};
use clap::Args;
use followgraph_graph::{FollowService, parse_follow_list};
use followgraph_store::SettingsStore;
use std::path::PathBuf;
use tracing::info;

use crate::{Cli, ExitCode};

/// Arguments for the follow command.
#[derive(Args, Debug, Clone)]
pub struct FollowArgs {
    /// Accounts to follow, separated by spaces or commas.
    #[arg(required_unless_present = "file")]
    pub names: Vec<String>,

    /// Read accounts from a file, one per line or comma separated.
    #[arg(long)]
    pub file: Option<PathBuf>,
}

/// Runs the follow command.
pub async fn run(args: &FollowArgs, cli: &Cli, store: &SettingsStore) -> Result<ExitCode> {
    let service = super::connect(cli, store).await?;
    execute(&service, args, cli).await
}

/// Follows using an existing service.
pub async fn execute(service: &FollowService, args: &FollowArgs, cli: &Cli) -> Result<ExitCode> {
    let mut input = args.names.join(",");
    if let Some(path) = &args.file {
        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        input.push('\n');
        input.push_str(&contents);
    }

    let identities = parse_follow_list(&input)?;
    info!(count = identities.len(), "Following accounts");

    let (hooks, watcher) = super::interactive_hooks(cli);
    let result = service.run_bulk_follow(&identities, &hooks).await;
    watcher.abort();

    super::print_summary(&result?, cli)
}
