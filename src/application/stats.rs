use crate::domain::error::DomainError;
use crate::domain::ports::link_repository::LinkRepository;
use crate::domain::ports::market_repository::MarketRepository;
use std::sync::Arc;

#[derive(Debug, Clone, serde::Serialize)]
pub struct FuseStats {
    pub total_markets: usize,
    pub by_source: Vec<(String, usize)>,
    pub duplicate_links: usize,
}

pub struct StatsUseCase {
    markets: Arc<dyn MarketRepository>,
    links: Arc<dyn LinkRepository>,
}

impl StatsUseCase {
    pub fn new(markets: Arc<dyn MarketRepository>, links: Arc<dyn LinkRepository>) -> Self {
        Self { markets, links }
    }

    pub fn execute(&self) -> Result<FuseStats, DomainError> {
        let market_stats = self.markets.stats()?;
        let link_count = self.links.all()?.len();
        Ok(FuseStats {
            total_markets: market_stats.total_markets,
            by_source: market_stats.by_source,
            duplicate_links: link_count,
        })
    }
}
