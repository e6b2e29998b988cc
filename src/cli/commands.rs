use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "marketfuse", about = "Cross-source prediction market aggregator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch markets from Kalshi and Polymarket and store them
    Ingest {
        /// Kalshi series tickers to track (comma-separated)
        #[arg(long)]
        series: Option<String>,
        /// Polymarket page size per request
        #[arg(long, default_value = "100")]
        page_size: usize,
        /// Maximum Polymarket markets to fetch
        #[arg(long, default_value = "1000")]
        total: usize,
        /// Minimum lifetime volume for Polymarket markets
        #[arg(long, default_value = "100000")]
        min_volume: u64,
        /// Skip a source whose stored markets were updated within this many
        /// minutes
        #[arg(long)]
        max_age_minutes: Option<i64>,
    },
    /// Detect cross-source duplicates, record links, print the merge report
    Dedup {
        /// Also print the deduplicated market list
        #[arg(long)]
        full: bool,
    },
    /// List stored markets
    Markets {
        /// Filter by source (kalshi, polymarket)
        #[arg(long)]
        source: Option<String>,
        #[arg(long, default_value = "50")]
        limit: usize,
    },
    /// List recorded duplicate links
    Links,
    /// Show database statistics
    Stats,
}
