//! # starsync
//!
//! Catalog mirror CLI — wires the client, store and crawler together.

#![deny(unsafe_code)]

mod bootstrap;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::info;

use starsync_client::CatalogClient;
use starsync_core::{Coordinate, logging};
use starsync_crawler::{CrawlerConfig, SpatialCrawler};
use starsync_store::{ConnectionConfig, MirrorStore};

const DEFAULT_BASE_URL: &str = "https://edsm.net";

/// Mirror a remote astronomical catalog into a local SQLite store.
#[derive(Parser, Debug)]
#[command(name = "starsync", about = "Mirror a remote astronomical catalog into SQLite")]
struct Cli {
    /// Path to the mirror database (default: `$STARSYNC_DB` or ./starsync.db).
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Remote catalog base URL (default: `$STARSYNC_BASE_URL`).
    #[arg(long)]
    base_url: Option<String>,

    /// Minimum log level.
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl outward from a coordinate until the reachable field is exhausted.
    Scan {
        /// X component of the origin.
        #[arg(long, allow_negative_numbers = true)]
        x: f64,
        /// Y component of the origin.
        #[arg(long, allow_negative_numbers = true)]
        y: f64,
        /// Z component of the origin.
        #[arg(long, allow_negative_numbers = true)]
        z: f64,
        /// Half-width of each region query.
        #[arg(long, default_value_t = 100.0)]
        radius: f64,
        /// Inner margin; systems past it open new regions.
        #[arg(long, default_value_t = 10.0)]
        overlap_margin: f64,
    },
    /// Seed the mirror from a line-delimited JSON dump of keys.
    Bootstrap {
        /// Path to the dump; one JSON record with `id`/`id64` per line.
        #[arg(long)]
        file: PathBuf,
    },
    /// Re-fetch and reconcile one system (and its bodies) by id or name.
    Refresh {
        /// Remote system id.
        #[arg(long, conflicts_with = "name")]
        system_id: Option<i64>,
        /// System name.
        #[arg(long)]
        name: Option<String>,
    },
}

impl Cli {
    fn db_path(&self) -> PathBuf {
        self.db_path.clone().unwrap_or_else(|| {
            std::env::var("STARSYNC_DB")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("starsync.db"))
        })
    }

    fn base_url(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| {
            std::env::var("STARSYNC_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_subscriber(&cli.log_level);

    let store = Arc::new(
        MirrorStore::open(&ConnectionConfig::new(cli.db_path())).context("opening mirror store")?,
    );
    let client = Arc::new(CatalogClient::new(cli.base_url()));

    match cli.command {
        Command::Scan {
            x,
            y,
            z,
            radius,
            overlap_margin,
        } => {
            let crawler = SpatialCrawler::with_config(
                client,
                store,
                CrawlerConfig {
                    radius,
                    overlap_margin,
                },
                CancellationToken::new(),
            );
            let report = crawler.full_scan(Coordinate::new(x, y, z)).await;
            info!(?report, "scan finished");
        }
        Command::Bootstrap { file } => {
            let keys = bootstrap::read_keys(&file)?;
            info!(keys = keys.len(), "bootstrap file loaded");
            let crawler = SpatialCrawler::new(client, store);
            let report = crawler.refresh_known_list(&keys).await;
            info!(?report, "bootstrap finished");
        }
        Command::Refresh { system_id, name } => {
            let record = match (system_id, name) {
                (Some(id), None) => client.system_by_id(id).await?,
                (None, Some(name)) => client.system_by_name(&name).await?,
                _ => bail!("provide exactly one of --system-id or --name"),
            };
            if record.is_empty() {
                bail!("the remote catalog has no record for that system");
            }
            let key = record.entity_key().context("remote record carries no key")?;
            let crawler = SpatialCrawler::new(client, store);
            crawler.refresh_system(key).await?;
            info!(%key, "system refreshed");
        }
    }

    Ok(())
}
