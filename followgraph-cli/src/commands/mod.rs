//! CLI command implementations.
//!
//! Each command has a `run` entry that connects and an `execute` that
//! works on an existing [`FollowService`], so `shell` can reuse them.

pub mod config;
pub mod dry_run;
pub mod follow;
pub mod follow_back;
pub mod shell;
pub mod stats;
pub mod unfollow;

use anyhow::{Context, Result, bail};
use followgraph_core::{BulkSummary, Identity};
use followgraph_fetch::{ApiToken, FetchContext};
use followgraph_graph::{BulkHooks, FollowService};
use followgraph_store::{Settings, SettingsStore};
use std::io::Write;
use std::sync::atomic::Ordering;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, ExitCode, OutputFormat};

/// Environment variable holding the API token.
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Environment variable naming the acting account.
pub const USERNAME_ENV: &str = "GITHUB_USERNAME";

// ============================================================================
// Connection
// ============================================================================

/// Picks the acting account: flag, then environment, then settings.
pub fn resolve_account(
    flag: Option<&str>,
    env: Option<&str>,
    settings: &Settings,
) -> Result<Identity> {
    let Some(name) = [flag, env, settings.username.as_deref()]
        .into_iter()
        .flatten()
        .find(|s| !s.trim().is_empty())
    else {
        bail!(
            "No account configured. Pass --user, set {USERNAME_ENV}, \
             or run `followgraph config set-user <login>`"
        );
    };
    Ok(Identity::parse(name)?)
}

/// Builds a service from settings and the environment.
pub async fn connect(cli: &Cli, store: &SettingsStore) -> Result<FollowService> {
    let settings = store.get().await;
    settings.validate()?;

    let token = std::env::var(TOKEN_ENV)
        .ok()
        .filter(|t| !t.trim().is_empty())
        .with_context(|| format!("{TOKEN_ENV} is not set"))?;
    let env_user = std::env::var(USERNAME_ENV).ok();
    let account = resolve_account(cli.user.as_deref(), env_user.as_deref(), &settings)?;

    debug!(account = %account, api = %settings.api_base_url, "Connecting");
    let ctx = FetchContext::new(settings.fetch_settings(), ApiToken::new(token))?;
    Ok(FollowService::from_context(&ctx, &settings, account))
}

// ============================================================================
// Terminal Helpers
// ============================================================================

/// Text formatter honoring `--no-color`.
pub fn text_formatter(cli: &Cli) -> TextFormatter {
    TextFormatter::new(!cli.no_color)
}

/// Reads one line from stdin without blocking the runtime.
///
/// Returns `None` at end of input.
pub async fn read_line() -> Result<Option<String>> {
    let line = tokio::task::spawn_blocking(|| {
        let mut buf = String::new();
        std::io::stdin().read_line(&mut buf).map(|n| (n, buf))
    })
    .await??;
    Ok(match line {
        (0, _) => None,
        (_, buf) => Some(buf.trim_end_matches(['\r', '\n']).to_string()),
    })
}

/// Asks a yes/no question on stderr. Defaults to no.
pub async fn confirm(question: &str) -> Result<bool> {
    eprint!("{question} [y/N] ");
    std::io::stderr().flush()?;
    let answer = read_line().await?.unwrap_or_default();
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Bulk hooks that print progress and stop on Ctrl-C.
///
/// Abort the returned handle once the run is over.
pub fn interactive_hooks(cli: &Cli) -> (BulkHooks, JoinHandle<()>) {
    let show_progress = !cli.quiet && cli.format == OutputFormat::Text;
    let formatter = text_formatter(cli);
    let mut hooks = BulkHooks::new();
    if show_progress {
        hooks = hooks.on_progress(move |p| eprintln!("{}", formatter.format_progress(p)));
    }

    let flag = hooks.cancel_flag();
    let watcher = tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                eprintln!("Stopping after the current account...");
                flag.store(true, Ordering::SeqCst);
            }
            Err(e) => warn!(error = %e, "Could not listen for Ctrl-C"),
        }
    });
    (hooks, watcher)
}

/// Prints a bulk run summary. Any failed item gives a partial-failure code.
pub fn print_summary(summary: &BulkSummary, cli: &Cli) -> Result<ExitCode> {
    match cli.format {
        OutputFormat::Text => println!("{}", text_formatter(cli).format_summary(summary)),
        OutputFormat::Json => println!("{}", JsonFormatter::new(cli.pretty).format_summary(summary)?),
    }

    Ok(if summary.failed() > 0 {
        ExitCode::PartialFailure
    } else {
        ExitCode::Success
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_precedence() {
        let settings = Settings {
            username: Some("from-settings".into()),
            ..Settings::default()
        };

        let id = resolve_account(Some("@flag"), Some("env"), &settings).unwrap();
        assert_eq!(id.as_str(), "flag");

        let id = resolve_account(None, Some("env"), &settings).unwrap();
        assert_eq!(id.as_str(), "env");

        let id = resolve_account(None, None, &settings).unwrap();
        assert_eq!(id.as_str(), "from-settings");
    }

    #[test]
    fn test_blank_values_skipped() {
        let settings = Settings {
            username: Some("from-settings".into()),
            ..Settings::default()
        };
        let id = resolve_account(Some(""), Some("  "), &settings).unwrap();
        assert_eq!(id.as_str(), "from-settings");
    }

    #[test]
    fn test_missing_account() {
        let err = resolve_account(None, Some("  "), &Settings::default()).unwrap_err();
        assert!(err.to_string().contains("No account configured"));
    }

    #[test]
    fn test_invalid_account() {
        assert!(resolve_account(Some("a/b"), None, &Settings::default()).is_err());
    }
}
