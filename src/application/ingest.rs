use crate::domain::error::DomainError;
use crate::domain::ports::market_feed::MarketFeed;
use crate::domain::ports::market_repository::MarketRepository;
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{error, info, warn};

pub struct IngestUseCase {
    markets: Arc<dyn MarketRepository>,
}

/// Result of running one feed: how many records came back and went in.
#[derive(Debug, Clone, serde::Serialize)]
pub struct IngestReport {
    pub feed: String,
    pub fetched: usize,
    pub upserted: usize,
    pub skipped_fresh: bool,
    pub errors: Vec<String>,
}

impl IngestUseCase {
    pub fn new(markets: Arc<dyn MarketRepository>) -> Self {
        Self { markets }
    }

    /// Run each feed in turn and upsert what it returns. A feed failure is
    /// recorded in its report and does not stop the other feeds. With
    /// `max_age` set, a feed whose stored records were updated inside the
    /// window is skipped entirely.
    pub async fn execute(
        &self,
        feeds: &[Arc<dyn MarketFeed>],
        max_age: Option<Duration>,
    ) -> Result<Vec<IngestReport>, DomainError> {
        let mut reports = Vec::with_capacity(feeds.len());

        for feed in feeds {
            let name = feed.name().to_string();

            if let Some(window) = max_age {
                let since = Utc::now() - window;
                match self.markets.updated_since(&feed.source(), since) {
                    Ok(fresh) if fresh > 0 => {
                        info!(feed = %name, fresh, "stored markets still fresh, skipping fetch");
                        reports.push(IngestReport {
                            feed: name,
                            fetched: 0,
                            upserted: 0,
                            skipped_fresh: true,
                            errors: vec![],
                        });
                        continue;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!(feed = %name, error = %e, "freshness check failed, fetching anyway");
                    }
                }
            }

            match feed.fetch().await {
                Ok(markets) => {
                    let fetched = markets.len();
                    info!(feed = %name, fetched, "fetched markets");
                    match self.markets.upsert(&markets) {
                        Ok(()) => reports.push(IngestReport {
                            feed: name,
                            fetched,
                            upserted: fetched,
                            skipped_fresh: false,
                            errors: vec![],
                        }),
                        Err(e) => {
                            error!(feed = %name, error = %e, "failed to store markets");
                            reports.push(IngestReport {
                                feed: name,
                                fetched,
                                upserted: 0,
                                skipped_fresh: false,
                                errors: vec![e.to_string()],
                            });
                        }
                    }
                }
                Err(e) => {
                    error!(feed = %name, error = %e, "feed fetch failed");
                    reports.push(IngestReport {
                        feed: name,
                        fetched: 0,
                        upserted: 0,
                        skipped_fresh: false,
                        errors: vec![e.to_string()],
                    });
                }
            }
        }

        Ok(reports)
    }
}
