//! CLI administration tool for shorty.
//!
//! Talks to the same store as the server, without going through HTTP.
//!
//! # Usage
//!
//! ```bash
//! # Create a short code
//! cargo run --bin shorty-admin -- create https://example.com/page
//!
//! # Create, refusing hosts other than example.com
//! cargo run --bin shorty-admin -- create https://example.com/page --domain example.com
//!
//! # Show a code with its counters and top sources
//! cargo run --bin shorty-admin -- show aB3xZ
//!
//! # Check the store connection
//! cargo run --bin shorty-admin -- ping
//! ```
//!
//! # Environment Variables
//!
//! Reads the server's configuration (`REDIS_URL`, `REDIS_PREFIX`, `CODE_LENGTH`,
//! ...), see [`shorty::config`].

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;

use shorty::application::services::{LinkService, SourceService, StatsService};
use shorty::config::{self, Config, StoreBackend};
use shorty::domain::granularity::Granularity;
use shorty::domain::keyspace::KeySpace;
use shorty::infrastructure::storage::{MemoryStore, RedisStore, Store};
use shorty::utils::code_generator::CodeGenerator;
use shorty::utils::relative_time::relative_time;

/// CLI tool for managing shorty.
#[derive(Parser)]
#[command(name = "shorty-admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a short code for a URL
    Create {
        /// Destination URL
        url: String,

        /// Only accept destinations on this host (defaults to RESTRICT_DOMAIN)
        #[arg(short, long)]
        domain: Option<String>,
    },

    /// Show a short code with its statistics
    Show {
        /// Short code
        code: String,
    },

    /// Check the store connection
    Ping,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;
    let store = connect(&config).await?;
    let keys = KeySpace::new(config.redis_prefix.clone());

    match cli.command {
        Commands::Create { url, domain } => {
            let restrict = domain.unwrap_or_else(|| config.restrict_domain.clone());
            create(&config, store, keys, &url, &restrict).await?
        }
        Commands::Show { code } => show(&config, store, keys, &code).await?,
        Commands::Ping => ping(store).await?,
    }

    Ok(())
}

async fn connect(config: &Config) -> Result<Arc<dyn Store>> {
    match (config.store, &config.redis_url) {
        (StoreBackend::Redis, Some(url)) => {
            let store = RedisStore::connect(url)
                .await
                .with_context(|| format!("Failed to connect to {}", config::mask_connection_string(url)))?;
            Ok(Arc::new(store))
        }
        _ => {
            println!(
                "{}",
                "⚠ Using an in-memory store, nothing will be kept".yellow()
            );
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

async fn create(
    config: &Config,
    store: Arc<dyn Store>,
    keys: KeySpace,
    url: &str,
    restrict: &str,
) -> Result<()> {
    let generator = CodeGenerator::new(config.code_length, config.code_max_attempts);
    let service = LinkService::new(store, keys, generator);

    let short_url = match service.create(url, restrict).await {
        Ok(short_url) => short_url,
        Err(e) if e.is_retryable() => anyhow::bail!("{} (temporary, try again)", e),
        Err(e) => return Err(e.into()),
    };
    let link = match &config.base_url {
        Some(base) => format!("{}/{}", base.trim_end_matches('/'), short_url.id),
        None => format!("/{}", short_url.id),
    };

    println!("{}", "✓ Short URL created".green().bold());
    println!();
    println!("  {}  {}", "Code:".bold(), short_url.id.bright_yellow());
    println!("  {}  {}", "Link:".bold(), link);
    println!("  {}   {}", "URL:".bold(), short_url.destination);

    Ok(())
}

async fn show(config: &Config, store: Arc<dyn Store>, keys: KeySpace, code: &str) -> Result<()> {
    let generator = CodeGenerator::new(config.code_length, config.code_max_attempts);
    let links = LinkService::new(store.clone(), keys.clone(), generator);
    let stats = StatsService::new(store.clone(), keys.clone());
    let sources = SourceService::new(store, keys, config.sources_top_n);

    let Some(short_url) = links.get(code).await? else {
        println!("{} {}", "✗ No such code:".red().bold(), code);
        return Ok(());
    };

    let snapshot = stats.snapshot(&short_url).await?;
    let top = sources.sources(&short_url, true).await?;
    let age = chrono::Utc::now() - short_url.created;

    println!("{}", format!("🔗 {}", short_url.id).bright_blue().bold());
    println!("  {} {}", "URL:".bold(), short_url.destination);
    println!(
        "  {} {} ({})",
        "Created:".bold(),
        short_url.created.format("%Y-%m-%d %H:%M:%S UTC"),
        relative_time(age)
    );
    println!();

    println!("{}", "Hits".bright_blue().bold());
    for granularity in Granularity::ALL {
        println!("  {:<6} {}", granularity.as_str(), snapshot.get(granularity));
    }
    println!();

    println!("{}", "Top sources".bright_blue().bold());
    if top.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for entry in top {
        println!("  {:<30} {}", entry.source, entry.count);
    }

    Ok(())
}

async fn ping(store: Arc<dyn Store>) -> Result<()> {
    if store.health_check().await {
        println!("{}", "✓ Store is reachable".green().bold());
        Ok(())
    } else {
        anyhow::bail!("Store did not answer PING")
    }
}
