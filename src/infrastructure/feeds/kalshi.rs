use crate::domain::entities::market::Market;
use crate::domain::ports::market_feed::{FeedError, MarketFeed};
use crate::domain::values::source::Source;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::warn;

/// Kalshi market data feed. Fetches open markets for tracked series via the
/// public markets endpoint (no auth required for market data).
pub struct KalshiFeed {
    /// Series tickers to track (e.g., KXHIGHNY, KXINXY, KXBTC)
    series: Vec<String>,
    /// Base URL for Kalshi API
    base_url: String,
    client: reqwest::Client,
}

impl KalshiFeed {
    pub fn new(series: Vec<String>) -> Self {
        Self {
            series,
            base_url: "https://api.elections.kalshi.com/trade-api/v2".into(),
            client: reqwest::Client::builder()
                .user_agent("marketfuse/0.1")
                .build()
                .unwrap_or_default(),
        }
    }

    /// Default series to aggregate.
    pub fn default_series() -> Self {
        Self::new(vec![
            "KXHIGHNY".into(),
            "KXINXY".into(),
            "KXBTC".into(),
            "KXFED".into(),
        ])
    }
}

#[derive(Debug, serde::Deserialize)]
struct MarketsResponse {
    markets: Vec<KalshiMarket>,
}

#[derive(Debug, serde::Deserialize)]
struct KalshiMarket {
    ticker: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    subtitle: Option<String>,
    #[serde(default)]
    rules_primary: Option<String>,
    #[serde(default)]
    yes_bid: Option<i64>,
    #[serde(default)]
    yes_ask: Option<i64>,
    #[serde(default)]
    no_bid: Option<i64>,
    #[serde(default)]
    no_ask: Option<i64>,
    #[serde(default)]
    volume: Option<i64>,
    #[serde(default)]
    volume_24h: Option<i64>,
    #[serde(default)]
    close_time: Option<String>,
}

/// Midpoint of bid/ask in cents, or whichever side is quoted.
fn midpoint_cents(bid: i64, ask: i64) -> f64 {
    if bid > 0 && ask > 0 {
        (bid + ask) as f64 / 2.0
    } else {
        bid.max(ask) as f64
    }
}

fn to_market(m: &KalshiMarket) -> Option<Market> {
    let yes_bid = m.yes_bid.unwrap_or(0);
    let yes_ask = m.yes_ask.unwrap_or(0);

    // Skip markets with no pricing at all
    if yes_bid == 0 && yes_ask == 0 {
        return None;
    }

    let title = m
        .title
        .as_deref()
        .or(m.subtitle.as_deref())
        .unwrap_or(&m.ticker)
        .to_string();

    let close_time = m.close_time.as_deref().and_then(|s| {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
    });

    Some(Market {
        source: Source::Kalshi,
        identifier: m.ticker.clone(),
        title,
        description: m.rules_primary.clone().unwrap_or_default(),
        yes_price: midpoint_cents(yes_bid, yes_ask) / 100.0,
        no_price: midpoint_cents(m.no_bid.unwrap_or(0), m.no_ask.unwrap_or(0)) / 100.0,
        volume: m.volume.unwrap_or(0) as f64,
        volume_24h: m.volume_24h.unwrap_or(0) as f64,
        close_time,
    })
}

#[async_trait]
impl MarketFeed for KalshiFeed {
    fn name(&self) -> &str {
        "kalshi"
    }

    fn source(&self) -> Source {
        Source::Kalshi
    }

    async fn fetch(&self) -> Result<Vec<Market>, FeedError> {
        let mut all_markets = Vec::new();
        let mut fetch_errors = Vec::new();

        for series in &self.series {
            match self.fetch_series(series).await {
                Ok(markets) => all_markets.extend(markets),
                Err(e) => {
                    warn!(series = %series, error = %e, "failed to fetch series");
                    fetch_errors.push(format!("{series}: {e}"));
                }
            }
        }

        if all_markets.is_empty() && !fetch_errors.is_empty() {
            return Err(FeedError::Network(fetch_errors.join("; ")));
        }
        Ok(all_markets)
    }
}

impl KalshiFeed {
    async fn fetch_series(&self, series_ticker: &str) -> Result<Vec<Market>, FeedError> {
        let resp = self
            .client
            .get(format!("{}/markets", self.base_url))
            .query(&[
                ("series_ticker", series_ticker),
                ("limit", "100"),
                ("status", "open"),
            ])
            .send()
            .await
            .map_err(|e| FeedError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(FeedError::Network(format!(
                "Kalshi API returned {} for {}",
                resp.status(),
                series_ticker
            )));
        }

        let data: MarketsResponse = resp
            .json()
            .await
            .map_err(|e| FeedError::Parse(e.to_string()))?;

        Ok(data.markets.iter().filter_map(to_market).collect())
    }
}
