// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! followgraph - manage who you follow on GitHub from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Relationship overview
//! followgraph stats
//!
//! # Who would be unfollowed
//! followgraph dry-run
//!
//! # Unfollow the first 25 accounts that do not follow back
//! followgraph unfollow --count 25
//!
//! # Follow a few accounts
//! followgraph follow octocat hubot
//!
//! # JSON output
//! followgraph stats --format json --pretty
//!
//! # Interactive session with a warm cache
//! followgraph shell
//! ```

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use followgraph_store::{LogLevel, SettingsStore};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{config, dry_run, follow, follow_back, shell, stats, unfollow};

// ============================================================================
// CLI Definition
// ============================================================================

/// followgraph - follow/unfollow management for GitHub accounts.
#[derive(Parser)]
#[command(name = "followgraph")]
#[command(about = "Rate-limit aware follow/unfollow management for GitHub")]
#[command(long_about = r#"
followgraph reads who you follow and who follows you, shows where the
two lists differ, and follows or unfollows accounts in paced batches that
stay inside the API rate limit.

The token is read from GITHUB_TOKEN. The account comes from --user,
GITHUB_USERNAME or the saved configuration, in that order.

Examples:
  followgraph stats                  # Relationship overview
  followgraph dry-run                # Preview a full unfollow
  followgraph unfollow --count 25    # Unfollow 25 non-mutuals
  followgraph follow octocat hubot   # Follow accounts
  followgraph follow-back            # Followers you do not follow
  followgraph shell                  # Interactive session
"#)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run. If none, runs 'stats' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Account to act as.
    #[arg(long, short, global = true)]
    pub user: Option<String>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Show following/followers overview (default if no command specified).
    #[command(visible_alias = "s")]
    Stats(stats::StatsArgs),

    /// Preview which accounts a full unfollow would remove.
    #[command(visible_alias = "d")]
    DryRun(dry_run::DryRunArgs),

    /// Unfollow accounts that do not follow back.
    Unfollow(unfollow::UnfollowArgs),

    /// Follow accounts.
    Follow(follow::FollowArgs),

    /// List followers you do not follow back.
    FollowBack(follow_back::FollowBackArgs),

    /// Manage configuration.
    Config(config::ConfigArgs),

    /// Interactive session sharing one cache across commands.
    Shell,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// A bulk run finished with failed items.
    PartialFailure = 2,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool, level: LogLevel) {
    if quiet {
        return; // No logging in quiet mode
    }

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) if verbose => EnvFilter::new("followgraph=debug,info"),
        Err(_) => EnvFilter::new(format!("followgraph={level}")),
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let store = SettingsStore::load_default().await?;
    setup_logging(cli.verbose, cli.quiet, store.get().await.log_level);

    let result = match &cli.command {
        Some(Commands::Stats(args)) => stats::run(args, &cli, &store).await,
        Some(Commands::DryRun(args)) => dry_run::run(args, &cli, &store).await,
        Some(Commands::Unfollow(args)) => unfollow::run(args, &cli, &store).await,
        Some(Commands::Follow(args)) => follow::run(args, &cli, &store).await,
        Some(Commands::FollowBack(args)) => follow_back::run(args, &cli, &store).await,
        Some(Commands::Config(args)) => config::run(args, &cli, &store).await,
        Some(Commands::Shell) => shell::run(&cli, &store).await,
        None => {
            // Default to stats command
            stats::run(&stats::StatsArgs::default(), &cli, &store).await
        }
    };

    match result {
        Ok(ExitCode::Success) => Ok(()),
        Ok(code) => std::process::exit(code as i32),
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {e:#}");
            }
            std::process::exit(ExitCode::Error as i32);
        }
    }
}
