//! # Ferrous Shield
//!
//! DNS filter fed by a TUN device, plus the commands that manage its store.

mod bootstrap;
mod commands;
mod di;

use bootstrap::{init_database, init_logging, load_config};
use clap::{Parser, Subcommand};
use di::{FilterServices, Repositories, UseCases};
use ferrous_shield_domain::{CliOverrides, Config};
use ferrous_shield_infrastructure::sources::HttpBlocklistFetcher;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "ferrous-shield")]
#[command(version)]
#[command(about = "On-device DNS filter for a TUN interface")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short = 'c', long, global = true)]
    config: Option<String>,

    /// SQLite database path
    #[arg(long, global = true)]
    db: Option<String>,

    /// Bloom filter snapshot path
    #[arg(long, global = true)]
    bloom_snapshot: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short = 'l', long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the filter on the tunnel device (default)
    Run {
        /// Tunnel interface name
        #[arg(short = 't', long)]
        tunnel: Option<String>,

        /// Upstream resolver, e.g. 1.1.1.1:53
        #[arg(short = 'u', long)]
        upstream: Option<SocketAddr>,
    },
    /// Replace the blocklist with the domains in a file or the registered sources
    Import {
        #[arg(required_unless_present = "from_sources", conflicts_with = "from_sources")]
        file: Option<PathBuf>,

        /// Download and merge every registered blocklist source
        #[arg(long)]
        from_sources: bool,

        /// Import even when the content matches the last import
        #[arg(long)]
        force: bool,
    },
    /// Manage remote blocklist URLs
    Source {
        #[command(subcommand)]
        action: SourceAction,
    },
    /// Manage always-allowed domains
    Whitelist {
        #[command(subcommand)]
        action: WhitelistAction,
    },
    /// Show the most recent logged queries
    Queries {
        #[arg(short = 'n', long, default_value = "50")]
        limit: u32,
    },
    /// Delete every query log entry
    ClearLog,
    /// Show store and query log totals
    Stats,
}

#[derive(Subcommand)]
enum SourceAction {
    Add { url: String },
    Remove { url: String },
    List,
}

#[derive(Subcommand)]
enum WhitelistAction {
    Add { domain: String },
    Remove { domain: String },
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Run {
        tunnel: None,
        upstream: None,
    });

    let (tunnel_name, upstream) = match &command {
        Command::Run { tunnel, upstream } => (tunnel.clone(), *upstream),
        _ => (None, None),
    };
    let overrides = CliOverrides {
        tunnel_name,
        upstream,
        database_path: cli.db,
        bloom_snapshot_path: cli.bloom_snapshot,
        log_level: cli.log_level,
    };

    let config = load_config(cli.config.as_deref(), overrides)?;
    init_logging(&config);
    bootstrap::config::log_config(cli.config.as_deref(), &config);

    match command {
        Command::Run { .. } => commands::run::run(&config).await,
        Command::Import { file, force, .. } => {
            let use_cases = build_use_cases(&config).await?;
            match file {
                Some(file) => commands::import::import(&use_cases, &file, force).await,
                None => commands::import::import_from_sources(&use_cases, force).await,
            }
        }
        Command::Source { action } => {
            let use_cases = build_use_cases(&config).await?;
            match action {
                SourceAction::Add { url } => commands::sources::add(&use_cases, &url).await,
                SourceAction::Remove { url } => commands::sources::remove(&use_cases, &url).await,
                SourceAction::List => commands::sources::list(&use_cases).await,
            }
        }
        Command::Whitelist { action } => {
            let use_cases = build_use_cases(&config).await?;
            match action {
                WhitelistAction::Add { domain } => {
                    commands::whitelist::add(&use_cases, &domain).await
                }
                WhitelistAction::Remove { domain } => {
                    commands::whitelist::remove(&use_cases, &domain).await
                }
                WhitelistAction::List => commands::whitelist::list(&use_cases).await,
            }
        }
        Command::Queries { limit } => {
            commands::queries::recent(&build_use_cases(&config).await?, limit).await
        }
        Command::ClearLog => commands::queries::clear(&build_use_cases(&config).await?).await,
        Command::Stats => commands::stats::stats(&build_use_cases(&config).await?).await,
    }
}

async fn build_use_cases(config: &Config) -> anyhow::Result<UseCases> {
    let repos = Repositories::new(init_database(&config.database).await?);
    let filter = FilterServices::new(&repos, &config.blocking);
    let fetcher = Arc::new(HttpBlocklistFetcher::new(config.blocking.source_fetch_timeout())?);
    Ok(UseCases::new(&repos, &filter, fetcher))
}
