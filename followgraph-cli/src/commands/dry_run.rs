//! Dry-run command - preview a full unfollow.

use anyhow::Result;
use clap::Args;
use followgraph_graph::FollowService;
use followgraph_store::SettingsStore;

use crate::output::JsonFormatter;
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the dry-run command.
#[derive(Args, Default, Debug, Clone)]
pub struct DryRunArgs {
    /// Re-read both lists instead of using the cache.
    #[arg(long, short)]
    pub refresh: bool,
}

/// Runs the dry-run command.
pub async fn run(args: &DryRunArgs, cli: &Cli, store: &SettingsStore) -> Result<ExitCode> {
    let service = super::connect(cli, store).await?;
    execute(&service, args, cli).await
}

/// Prints the preview using an existing service.
pub async fn execute(service: &FollowService, args: &DryRunArgs, cli: &Cli) -> Result<ExitCode> {
    let preview = service.dry_run(args.refresh).await?;

    match cli.format {
        OutputFormat::Text => println!("{}", preview.to_string().trim_end()),
        OutputFormat::Json => println!("{}", JsonFormatter::new(cli.pretty).format_preview(&preview)?),
    }

    Ok(ExitCode::Success)
}
