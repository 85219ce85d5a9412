//! Follow-back command - followers not followed in return.

use anyhow::Result;
use clap::Args;
use followgraph_graph::FollowService;
use followgraph_store::SettingsStore;

use crate::output::JsonFormatter;
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the follow-back command.
#[derive(Args, Default, Debug, Clone)]
pub struct FollowBackArgs {
    /// Re-read both lists instead of using the cache.
    #[arg(long, short)]
    pub refresh: bool,
}

/// Runs the follow-back command.
pub async fn run(args: &FollowBackArgs, cli: &Cli, store: &SettingsStore) -> Result<ExitCode> {
    let service = super::connect(cli, store).await?;
    execute(&service, args, cli).await
}

/// Lists suggestions using an existing service.
pub async fn execute(
    service: &FollowService,
    args: &FollowBackArgs,
    cli: &Cli,
) -> Result<ExitCode> {
    let suggestions = service.follow_back_suggestions(args.refresh).await?;

    match cli.format {
        OutputFormat::Text => {
            let formatter = super::text_formatter(cli);
            println!("{}", formatter.format_identities("Not followed back", &suggestions));
        }
        OutputFormat::Json => println!("{}", JsonFormatter::new(cli.pretty).format(&suggestions)?),
    }

    Ok(ExitCode::Success)
}
