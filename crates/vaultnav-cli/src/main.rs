//! vaultnav CLI — scoped note-vault access for LLM clients
//!
//! Commands: serve, nav, target-nav, nav-files, subdir, list, read, recent

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use rmcp::{transport::stdio, ServiceExt};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

use vaultnav_core::VaultConfig;
use vaultnav_mcp::VaultMcpService;
use vaultnav_vault::Vault;

#[derive(Parser)]
#[command(name = "vaultnav")]
#[command(version)]
#[command(about = "Scoped, read-only access to a note vault for LLM clients")]
struct Cli {
    /// TOML configuration file
    #[arg(long, short, global = true, env = "VAULTNAV_CONFIG")]
    config: Option<PathBuf>,

    /// Vault root (overrides the config file)
    #[arg(long, global = true, env = "VAULTNAV_VAULT")]
    vault: Option<PathBuf>,

    /// Target folder relative to the vault root (overrides the config file)
    #[arg(long, global = true, env = "VAULTNAV_TARGET")]
    target: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Run the MCP server on stdio
    Serve,
    /// Context files from the vault root down to the target subfolders
    Nav,
    /// Context file of the target folder
    TargetNav,
    /// Every vault directory holding a context file
    NavFiles,
    /// Context file of one vault subdirectory
    Subdir {
        /// Subdirectory relative to the vault root
        name: String,
    },
    /// List files in the target folder
    #[command(alias = "ls")]
    List {
        /// Name suffix to match (case-sensitive, e.g. ".md"); "" lists everything
        #[arg(long, short)]
        suffix: Option<String>,
    },
    /// Read a file from the target folder
    Read {
        /// File name relative to the target folder
        file: String,
    },
    /// Date-named files for the last N days
    Recent {
        /// Days to look back, 1..=365
        #[arg(long, short, default_value_t = 7)]
        days: i64,
    },
}

fn resolve_config(cli: &Cli) -> Result<VaultConfig> {
    let mut config = match (&cli.config, &cli.vault, &cli.target) {
        (Some(path), _, _) => VaultConfig::load(path)?,
        (None, Some(vault), Some(target)) => VaultConfig::new(vault.clone(), target.clone()),
        (None, _, _) => bail!("either --config or both --vault and --target are required"),
    };
    if let Some(vault) = &cli.vault {
        config.vault_path.clone_from(vault);
    }
    if let Some(target) = &cli.target {
        config.target_folder.clone_from(target);
    }
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the MCP protocol; logs go to stderr.
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    let vault = Vault::open(config).context("failed to open vault")?;

    match cli.command {
        Commands::Serve => {
            let service = VaultMcpService::new(vault)
                .serve(stdio())
                .await
                .inspect_err(|e| {
                    tracing::error!("MCP server error: {:?}", e);
                })?;
            tracing::info!("vaultnav server ready");
            service.waiting().await?;
            tracing::info!("vaultnav server shutting down");
        }
        Commands::Nav => print_json(&vault.discover().await?)?,
        Commands::TargetNav => print_json(&vault.target_context().await)?,
        Commands::NavFiles => print_json(&vault.context_files().await?)?,
        Commands::Subdir { name } => print_json(&vault.subdirectory_context(&name).await?)?,
        Commands::List { suffix } => print_json(&vault.list_target(suffix.as_deref()).await?)?,
        Commands::Read { file } => print_json(&vault.load_file(&file).await?)?,
        Commands::Recent { days } => print_json(&vault.recent_notes(days).await?)?,
    }

    Ok(())
}
