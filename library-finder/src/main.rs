use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};

use library_finder::config::FinderConfig;
use library_finder::finder::{Freshness, LibraryFinder};
use library_finder::freshness::DEFAULT_MAX_AGE_DAYS;
use library_finder::postcodes::{CachedGeocoder, GeocodeCacheConfig, PostcodesClient, PostcodesConfig};
use library_finder::store::{LibraryStore, StoreConfig};
use library_finder::web::{AppState, create_router};
use library_finder::wikidata::{FixtureSource, LibrarySource, WikidataClient, WikidataConfig};
use library_finder::{cli, logging};

/// How often the server checks whether the library cache is stale (24 hours).
const REFRESH_CHECK_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Find the public libraries nearest to a UK postcode
#[derive(Parser, Debug)]
#[command(name = "library-finder")]
#[command(version, about, long_about = None)]
struct Cli {
    /// SQLite file holding the library cache
    #[arg(long, global = true, env = "LIBRARY_FINDER_DATABASE", default_value = "library.db")]
    database: PathBuf,

    /// Days before cached library data is refreshed
    #[arg(long, global = true, env = "LIBRARY_FINDER_MAX_AGE_DAYS", default_value_t = DEFAULT_MAX_AGE_DAYS)]
    max_age_days: u32,

    /// Wikidata SPARQL endpoint
    #[arg(long, global = true, env = "LIBRARY_FINDER_SPARQL_URL")]
    sparql_url: Option<String>,

    /// postcodes.io base URL
    #[arg(long, global = true, env = "LIBRARY_FINDER_POSTCODES_URL")]
    postcodes_url: Option<String>,

    /// Read library data from a saved SPARQL response instead of Wikidata
    #[arg(long, global = true, env = "LIBRARY_FINDER_SOURCE_FIXTURE")]
    source_fixture: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        /// Address to listen on
        #[arg(long, env = "LIBRARY_FINDER_ADDR", default_value = "127.0.0.1:8080")]
        addr: SocketAddr,
    },

    /// Look up libraries interactively
    Find,

    /// Refresh the library cache now, whatever its age
    Refresh,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    logging::init().context("failed to initialise logging")?;

    let finder = build_finder(&args)?;

    match args.command {
        Commands::Serve { addr } => serve(finder, addr).await,
        Commands::Find => Ok(cli::run(&finder).await?),
        Commands::Refresh => {
            let report = finder.force_refresh().await?;
            println!(
                "Stored {} libraries ({} fetched, {} dropped)",
                report.stored,
                report.fetched,
                report.dropped()
            );
            Ok(())
        }
    }
}

fn build_finder(cli: &Cli) -> anyhow::Result<LibraryFinder> {
    let store = LibraryStore::open(&StoreConfig::new(&cli.database))
        .with_context(|| format!("failed to open library cache {}", cli.database.display()))?;

    let source: Arc<dyn LibrarySource> = match &cli.source_fixture {
        Some(path) => Arc::new(FixtureSource::new(path)?),
        None => {
            let mut config = WikidataConfig::default();
            if let Some(url) = &cli.sparql_url {
                config = config.with_base_url(url);
            }
            Arc::new(WikidataClient::new(config).context("failed to create Wikidata client")?)
        }
    };

    let mut postcodes_config = PostcodesConfig::default();
    if let Some(url) = &cli.postcodes_url {
        postcodes_config = postcodes_config.with_base_url(url);
    }
    let postcodes =
        PostcodesClient::new(postcodes_config).context("failed to create postcodes client")?;
    let geocoder = CachedGeocoder::new(postcodes, &GeocodeCacheConfig::default());

    let config = FinderConfig::default().with_max_age_days(cli.max_age_days);
    Ok(LibraryFinder::new(store, source, Arc::new(geocoder), config))
}

async fn serve(finder: LibraryFinder, addr: SocketAddr) -> anyhow::Result<()> {
    let finder = Arc::new(finder);

    // Check the cache daily; the first tick is immediate, which warms it
    let background = Arc::clone(&finder);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(REFRESH_CHECK_INTERVAL);
        loop {
            interval.tick().await;
            match background.refresh_if_stale().await {
                Ok(Freshness::Fresh) => tracing::debug!("library cache is fresh"),
                Ok(Freshness::Refreshed(report)) => {
                    tracing::info!(stored = report.stored, "refreshed library cache")
                }
                Ok(Freshness::Degraded(_)) => {}
                Err(e) => tracing::error!(error = %e, "failed to check library cache"),
            }
        }
    });

    let app = create_router(AppState::from_shared(finder));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "library finder listening");

    axum::serve(listener, app).await?;
    Ok(())
}
