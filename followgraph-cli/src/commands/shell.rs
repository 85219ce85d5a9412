//! Shell command - interactive session over one connection.
//!
//! Commands typed here share a single service, so the relationship cache
//! stays warm between them.

use anyhow::Result;
use clap::{Parser, Subcommand};
use followgraph_graph::FollowService;
use followgraph_store::SettingsStore;
use std::io::Write;
use tracing::debug;

use super::dry_run::{self, DryRunArgs};
use super::follow::{self, FollowArgs};
use super::follow_back::{self, FollowBackArgs};
use super::stats::{self, StatsArgs};
use super::unfollow::{self, UnfollowArgs};
use crate::output::JsonFormatter;
use crate::{Cli, ExitCode, OutputFormat};

const PROMPT: &str = "followgraph> ";

/// One line typed at the prompt.
#[derive(Parser, Debug)]
#[command(no_binary_name = true, name = "followgraph")]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

/// Commands available inside the shell.
#[derive(Subcommand, Debug)]
enum ShellCommand {
    /// Show following/followers overview.
    #[command(visible_alias = "s")]
    Stats(StatsArgs),

    /// Preview which accounts a full unfollow would remove.
    #[command(visible_alias = "d")]
    DryRun(DryRunArgs),

    /// Unfollow accounts that do not follow back.
    Unfollow(UnfollowArgs),

    /// Follow accounts.
    Follow(FollowArgs),

    /// List followers you do not follow back.
    FollowBack(FollowBackArgs),

    /// Show what is cached and how old it is.
    Cache,

    /// Drop cached lists.
    Clear,

    /// Leave the shell.
    #[command(visible_alias = "exit")]
    Quit,
}

/// Runs the interactive shell until `quit` or end of input.
pub async fn run(cli: &Cli, store: &SettingsStore) -> Result<ExitCode> {
    let service = super::connect(cli, store).await?;

    if !cli.quiet {
        eprintln!(
            "Connected as @{}. Type 'help' for commands, 'quit' to leave.",
            service.account()
        );
    }

    loop {
        if !cli.quiet {
            eprint!("{PROMPT}");
            std::io::stderr().flush()?;
        }

        let Some(line) = super::read_line().await? else {
            break;
        };
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }

        let command = match ShellLine::try_parse_from(words) {
            Ok(parsed) => parsed.command,
            Err(e) => {
                // Covers `help` as well as usage errors
                let _ = e.print();
                continue;
            }
        };

        debug!(?command, "Shell command");
        if matches!(command, ShellCommand::Quit) {
            break;
        }
        if let Err(e) = dispatch(&service, command, cli).await {
            eprintln!("Error: {e:#}");
        }
    }

    Ok(ExitCode::Success)
}

async fn dispatch(service: &FollowService, command: ShellCommand, cli: &Cli) -> Result<ExitCode> {
    match command {
        ShellCommand::Stats(args) => stats::execute(service, &args, cli).await,
        ShellCommand::DryRun(args) => dry_run::execute(service, &args, cli).await,
        ShellCommand::Unfollow(args) => unfollow::execute(service, &args, cli).await,
        ShellCommand::Follow(args) => follow::execute(service, &args, cli).await,
        ShellCommand::FollowBack(args) => follow_back::execute(service, &args, cli).await,
        ShellCommand::Cache => {
            let status = service.cache_status().await;
            match cli.format {
                OutputFormat::Text => println!("{}", status.to_string().trim_end()),
                OutputFormat::Json => println!("{}", JsonFormatter::new(cli.pretty).format(&status)?),
            }
            Ok(ExitCode::Success)
        }
        ShellCommand::Clear => {
            service.clear_cache().await;
            if !cli.quiet {
                println!("Cache cleared");
            }
            Ok(ExitCode::Success)
        }
        ShellCommand::Quit => Ok(ExitCode::Success),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use followgraph_graph::UnfollowScope;

    fn parse(line: &str) -> Result<ShellCommand, clap::Error> {
        ShellLine::try_parse_from(line.split_whitespace()).map(|l| l.command)
    }

    #[test]
    fn test_parse_commands() {
        assert!(matches!(parse("stats --refresh"), Ok(ShellCommand::Stats(StatsArgs { refresh: true }))));
        assert!(matches!(parse("d"), Ok(ShellCommand::DryRun(_))));
        assert!(matches!(parse("cache"), Ok(ShellCommand::Cache)));
        assert!(matches!(parse("clear"), Ok(ShellCommand::Clear)));
        assert!(matches!(parse("exit"), Ok(ShellCommand::Quit)));

        match parse("unfollow -n 3 --yes") {
            Ok(ShellCommand::Unfollow(args)) => {
                assert_eq!(args.scope(), UnfollowScope::Count(3));
                assert!(args.yes);
            }
            other => panic!("unexpected: {other:?}"),
        }

        match parse("follow octocat hubot") {
            Ok(ShellCommand::Follow(args)) => assert_eq!(args.names, vec!["octocat", "hubot"]),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse("bogus").is_err());
        assert!(parse("unfollow").is_err());
        let help = parse("help").unwrap_err();
        assert_eq!(help.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
