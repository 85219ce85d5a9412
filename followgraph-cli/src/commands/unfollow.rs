//! Unfollow command - unfollow accounts that do not follow back.

use anyhow::Result;
use clap::{ArgGroup, Args};
use followgraph_graph::{FollowService, UnfollowScope};
use followgraph_store::SettingsStore;
use tracing::info;

use crate::{Cli, ExitCode};

/// Arguments for the unfollow command.
#[derive(Args, Debug, Clone)]
#[command(group(ArgGroup::new("scope").required(true).args(["count", "all"])))]
pub struct UnfollowArgs {
    /// Unfollow the first N non-mutuals, in following order.
    #[arg(long, short = 'n')]
    pub count: Option<usize>,

    /// Unfollow every non-mutual.
    #[arg(long)]
    pub all: bool,

    /// Skip the confirmation prompt.
    #[arg(long, short = 'y')]
    pub yes: bool,
}

impl UnfollowArgs {
    /// The selected scope. `--all` wins if both are somehow set.
    pub fn scope(&self) -> UnfollowScope {
        match (self.all, self.count) {
            (false, Some(n)) => UnfollowScope::Count(n),
            _ => UnfollowScope::All,
        }
    }
}

/// Runs the unfollow command.
pub async fn run(args: &UnfollowArgs, cli: &Cli, store: &SettingsStore) -> Result<ExitCode> {
    let service = super::connect(cli, store).await?;
    execute(&service, args, cli).await
}

/// Unfollows using an existing service.
pub async fn execute(service: &FollowService, args: &UnfollowArgs, cli: &Cli) -> Result<ExitCode> {
    let scope = args.scope();

    if !args.yes {
        let preview = service.dry_run(false).await?;
        if preview.total == 0 {
            println!("{}", preview.to_string().trim_end());
            return Ok(ExitCode::Success);
        }

        let n = match scope {
            UnfollowScope::Count(n) => n.min(preview.total),
            UnfollowScope::All => preview.total,
        };
        eprintln!("{}", preview.to_string().trim_end());
        let question = format!("Unfollow {n} accounts as @{}?", service.account());
        if !super::confirm(&question).await? {
            eprintln!("Aborted.");
            return Ok(ExitCode::Success);
        }
    }

    info!(scope = %scope, "Unfollowing non-mutuals");
    let (hooks, watcher) = super::interactive_hooks(cli);
    let result = service.run_bulk_unfollow(scope, &hooks).await;
    watcher.abort();

    super::print_summary(&result?, cli)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: UnfollowArgs,
    }

    #[test]
    fn test_scope_from_flags() {
        let w = Wrapper::try_parse_from(["x", "--count", "5"]).unwrap();
        assert_eq!(w.args.scope(), UnfollowScope::Count(5));
        assert!(!w.args.yes);

        let w = Wrapper::try_parse_from(["x", "--all", "-y"]).unwrap();
        assert_eq!(w.args.scope(), UnfollowScope::All);
        assert!(w.args.yes);
    }

    #[test]
    fn test_scope_required() {
        assert!(Wrapper::try_parse_from(["x"]).is_err());
        assert!(Wrapper::try_parse_from(["x", "--all", "--count", "3"]).is_err());
    }
}
