//! Shared test helpers.

use marketfuse::domain::entities::market::Market;
use marketfuse::domain::ports::market_feed::{FeedError, MarketFeed};
use marketfuse::domain::values::source::Source;
use marketfuse::infrastructure::embeddings::stub::StubProvider;
use marketfuse::MarketFuse;
use std::sync::Arc;

pub fn setup(embedder: StubProvider) -> MarketFuse {
    MarketFuse::with_providers(":memory:", Arc::new(embedder)).unwrap()
}

pub fn make_market(source: Source, identifier: &str, title: &str, description: &str) -> Market {
    Market {
        source,
        identifier: identifier.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        yes_price: 0.5,
        no_price: 0.5,
        volume: 10_000.0,
        volume_24h: 500.0,
        close_time: None,
    }
}

/// A feed that serves a fixed list of markets.
pub struct StaticFeed {
    name: String,
    source: Source,
    markets: Vec<Market>,
}

impl StaticFeed {
    pub fn new(name: &str, source: Source, markets: Vec<Market>) -> Self {
        Self {
            name: name.to_string(),
            source,
            markets,
        }
    }
}

#[async_trait::async_trait]
impl MarketFeed for StaticFeed {
    fn name(&self) -> &str {
        &self.name
    }

    fn source(&self) -> Source {
        self.source.clone()
    }

    async fn fetch(&self) -> Result<Vec<Market>, FeedError> {
        Ok(self.markets.clone())
    }
}

/// A feed that always fails.
pub struct BrokenFeed;

#[async_trait::async_trait]
impl MarketFeed for BrokenFeed {
    fn name(&self) -> &str {
        "broken"
    }

    fn source(&self) -> Source {
        Source::Other("broken".into())
    }

    async fn fetch(&self) -> Result<Vec<Market>, FeedError> {
        Err(FeedError::Network("connection refused".into()))
    }
}
