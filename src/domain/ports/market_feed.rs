use crate::domain::entities::market::Market;
use crate::domain::error::DomainError;
use async_trait::async_trait;

/// A feed that produces normalized market records from an external source.
/// Implementations guarantee every returned record has a non-null title,
/// description, source, and identifier. Malformed listings are skipped at
/// this boundary, never handed downstream.
#[async_trait]
pub trait MarketFeed: Send + Sync {
    /// Human-readable name of this feed.
    fn name(&self) -> &str;

    /// Which source tag this feed's records carry.
    fn source(&self) -> crate::domain::values::source::Source;

    /// Fetch and normalize current listings.
    async fn fetch(&self) -> Result<Vec<Market>, FeedError>;
}

#[derive(Debug)]
pub enum FeedError {
    /// HTTP or network error
    Network(String),
    /// Response parsing error
    Parse(String),
    /// Configuration error (missing API key, etc.)
    Config(String),
}

impl std::fmt::Display for FeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedError::Network(msg) => write!(f, "Network error: {msg}"),
            FeedError::Parse(msg) => write!(f, "Parse error: {msg}"),
            FeedError::Config(msg) => write!(f, "Config error: {msg}"),
        }
    }
}

impl std::error::Error for FeedError {}

impl From<FeedError> for DomainError {
    fn from(e: FeedError) -> Self {
        DomainError::Feed(e.to_string())
    }
}
