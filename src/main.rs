use clap::Parser;
use marketfuse::cli::commands::{Cli, Commands};
use marketfuse::domain::ports::market_feed::MarketFeed;
use marketfuse::infrastructure::feeds::kalshi::KalshiFeed;
use marketfuse::infrastructure::feeds::polymarket::PolymarketFeed;
use marketfuse::MarketFuse;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("marketfuse=info")),
        )
        .init();

    let cli = Cli::parse();
    let db_path = std::env::var("MARKETFUSE_DB").unwrap_or_else(|_| "./marketfuse.db".into());

    let fuse = match MarketFuse::new(&db_path) {
        Ok(fuse) => fuse,
        Err(e) => {
            eprintln!("Error initializing marketfuse: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_command(fuse, cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_command(fuse: MarketFuse, cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Ingest {
            series,
            page_size,
            total,
            min_volume,
            max_age_minutes,
        } => {
            let kalshi = match series {
                Some(s) => KalshiFeed::new(s.split(',').map(|t| t.trim().to_string()).collect()),
                None => KalshiFeed::default_series(),
            };
            let feeds: Vec<Arc<dyn MarketFeed>> = vec![
                Arc::new(kalshi),
                Arc::new(PolymarketFeed::new(page_size, total, min_volume)),
            ];
            let max_age = max_age_minutes.map(chrono::Duration::minutes);

            let reports = fuse.ingest(&feeds, max_age).await?;
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
        Commands::Dedup { full } => {
            let outcome = fuse.dedup().await?;
            println!("{}", serde_json::to_string_pretty(&outcome.report)?);
            if full {
                println!("{}", serde_json::to_string_pretty(&outcome.markets)?);
            }
        }
        Commands::Markets { source, limit } => {
            let mut markets = fuse.markets()?;
            if let Some(source) = source {
                markets.retain(|m| m.source.to_string() == source.to_lowercase());
            }
            markets.truncate(limit);
            println!("{}", serde_json::to_string_pretty(&markets)?);
        }
        Commands::Links => {
            let links = fuse.links()?;
            println!("{}", serde_json::to_string_pretty(&links)?);
        }
        Commands::Stats => {
            let stats = fuse.stats()?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }
    Ok(())
}
