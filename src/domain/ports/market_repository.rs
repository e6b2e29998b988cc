use crate::domain::entities::market::Market;
use crate::domain::error::DomainError;
use crate::domain::values::source::Source;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct MarketStats {
    pub total_markets: usize,
    pub by_source: Vec<(String, usize)>,
}

pub trait MarketRepository: Send + Sync {
    /// Insert the given markets, replacing any stored row with the same
    /// (source, identifier).
    fn upsert(&self, markets: &[Market]) -> Result<(), DomainError>;

    /// Every stored market across all sources.
    fn all(&self) -> Result<Vec<Market>, DomainError>;

    /// How many markets from `source` were written at or after `since`.
    /// Used to skip a refetch when stored data is still fresh.
    fn updated_since(&self, source: &Source, since: DateTime<Utc>) -> Result<usize, DomainError>;

    /// Resolve a market's title for log output. `None` when unknown.
    fn display_name(&self, source: &Source, identifier: &str)
        -> Result<Option<String>, DomainError>;

    fn stats(&self) -> Result<MarketStats, DomainError>;
}
