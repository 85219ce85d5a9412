//! Config command - manage configuration.

use anyhow::Result;
use clap::{Args, Subcommand};
use followgraph_core::Identity;
use followgraph_store::{SettingsStore, default_config_dir};
use tracing::info;

use crate::output::JsonFormatter;
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the config command.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration.
    Show,

    /// Show configuration paths.
    Path,

    /// Save the account to act as.
    SetUser {
        /// Account login.
        login: String,
    },

    /// Reset to defaults.
    Reset,
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli, store: &SettingsStore) -> Result<ExitCode> {
    match &args.action {
        ConfigAction::Show => show_config(cli, store).await?,
        ConfigAction::Path => show_paths(cli, store)?,
        ConfigAction::SetUser { login } => set_user(login, store).await?,
        ConfigAction::Reset => reset_config(store).await?,
    }
    Ok(ExitCode::Success)
}

async fn show_config(cli: &Cli, store: &SettingsStore) -> Result<()> {
    let settings = store.get().await;

    match cli.format {
        OutputFormat::Text => {
            println!("followgraph Configuration");
            println!("{}", "─".repeat(40));
            println!();
            println!("API:              {}", settings.api_base_url);
            println!(
                "Account:          {}",
                settings.username.as_deref().unwrap_or("(not set)")
            );
            println!("Cache TTL:        {}s", settings.cache_ttl_secs);
            println!("Page size:        {}", settings.per_page);
            println!("Request timeout:  {}s", settings.request_timeout_secs);
            println!();
            println!(
                "Delays:           {}ms / {}ms / {}ms (at or below {} / {} remaining)",
                settings.short_delay_ms,
                settings.medium_delay_ms,
                settings.long_delay_ms,
                settings.secondary_threshold,
                settings.low_water_threshold
            );
            let retries = settings
                .max_throttle_retries
                .map_or_else(|| "unlimited".to_string(), |n| n.to_string());
            println!(
                "Throttle:         {retries} retries, +{}s after reset",
                settings.reset_buffer_secs
            );
            println!(
                "Bulk:             batches of {}, pause up to {}s",
                settings.bulk_batch_size, settings.max_low_quota_pause_secs
            );
            println!("Log level:        {}", settings.log_level);
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&settings)?);
        }
    }

    Ok(())
}

fn show_paths(cli: &Cli, store: &SettingsStore) -> Result<()> {
    let config_dir = default_config_dir();
    let settings_path = store.path();

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration Paths");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config dir:    {}", config_dir.display());
            println!("Settings file: {}", settings_path.display());
        }
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "config_dir": config_dir.display().to_string(),
                "settings_file": settings_path.display().to_string(),
            });
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&paths)?);
        }
    }

    Ok(())
}

async fn set_user(login: &str, store: &SettingsStore) -> Result<()> {
    let identity = Identity::parse(login)?;

    store
        .update(|s| s.username = Some(identity.as_str().to_string()))
        .await;
    store.save().await?;

    info!(account = %identity, "Account saved");
    println!("Account set to: {identity}");

    Ok(())
}

async fn reset_config(store: &SettingsStore) -> Result<()> {
    let path = store.path();

    if tokio::fs::try_exists(path).await? {
        tokio::fs::remove_file(path).await?;
        store.reset().await;
        info!(path = %path.display(), "Settings reset");
        println!("Configuration reset to defaults");
    } else {
        println!("No configuration file to reset");
    }

    Ok(())
}
