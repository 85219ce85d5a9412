//! Stats command - relationship overview.

use anyhow::Result;
use clap::Args;
use followgraph_graph::FollowService;
use followgraph_store::SettingsStore;

use crate::output::JsonFormatter;
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the stats command.
#[derive(Args, Default, Debug, Clone)]
pub struct StatsArgs {
    /// Re-read both lists instead of using the cache.
    #[arg(long, short)]
    pub refresh: bool,
}

/// Runs the stats command.
pub async fn run(args: &StatsArgs, cli: &Cli, store: &SettingsStore) -> Result<ExitCode> {
    let service = super::connect(cli, store).await?;
    execute(&service, args, cli).await
}

/// Prints the overview using an existing service.
pub async fn execute(service: &FollowService, args: &StatsArgs, cli: &Cli) -> Result<ExitCode> {
    let overview = service.get_snapshot(args.refresh).await?;

    match cli.format {
        OutputFormat::Text => println!("{}", super::text_formatter(cli).format_overview(&overview)),
        OutputFormat::Json => println!("{}", JsonFormatter::new(cli.pretty).format_overview(&overview)?),
    }

    Ok(ExitCode::Success)
}
