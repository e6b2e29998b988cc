use crate::domain::entities::market::Market;
use crate::domain::ports::market_feed::{FeedError, MarketFeed};
use crate::domain::values::source::Source;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{error, warn};

/// Polymarket listing feed over the Gamma API. Pages through open markets
/// above a volume floor and normalizes each listing into a `Market`.
pub struct PolymarketFeed {
    base_url: String,
    client: reqwest::Client,
    /// Markets per request.
    page_size: usize,
    /// Stop after this many markets.
    max_markets: usize,
    /// Minimum lifetime volume (`volume_num_min` upstream).
    min_volume: u64,
}

impl PolymarketFeed {
    pub fn new(page_size: usize, max_markets: usize, min_volume: u64) -> Self {
        Self {
            base_url: "https://gamma-api.polymarket.com".into(),
            client: reqwest::Client::builder()
                .user_agent("marketfuse/0.1")
                .build()
                .unwrap_or_default(),
            page_size,
            max_markets,
            min_volume,
        }
    }
}

impl Default for PolymarketFeed {
    fn default() -> Self {
        Self::new(100, 1000, 100_000)
    }
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct GammaMarket {
    id: String,
    question: String,
    #[serde(default)]
    description: Option<String>,
    /// JSON-encoded string array, e.g. `"[\"0.35\", \"0.65\"]"`.
    #[serde(default)]
    outcome_prices: Option<String>,
    #[serde(default)]
    volume_num: Option<f64>,
    #[serde(default)]
    volume24hr: Option<f64>,
    #[serde(default)]
    events: Vec<GammaEvent>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct GammaEvent {
    #[serde(default)]
    end_date: Option<String>,
}

/// Normalize one Gamma listing. Returns `None` (and logs) for listings
/// missing prices, so the rest of the pipeline only ever sees well-formed
/// records.
fn normalize(raw: &GammaMarket) -> Option<Market> {
    let prices_json = match raw.outcome_prices.as_deref() {
        Some(p) => p,
        None => {
            warn!(id = %raw.id, "polymarket listing has no outcome prices, skipping");
            return None;
        }
    };

    let outcome_prices: Vec<String> = match serde_json::from_str(prices_json) {
        Ok(p) => p,
        Err(e) => {
            warn!(id = %raw.id, error = %e, "unparseable outcome prices, skipping");
            return None;
        }
    };

    let (yes_price, no_price) = match (
        outcome_prices.first().and_then(|p| p.parse::<f64>().ok()),
        outcome_prices.get(1).and_then(|p| p.parse::<f64>().ok()),
    ) {
        (Some(yes), Some(no)) => (yes, no),
        _ => {
            warn!(id = %raw.id, "outcome prices are not a yes/no pair, skipping");
            return None;
        }
    };

    // Multi-event markets exist; the first event's end date stands in for
    // all of them.
    // TODO: pick the event this market actually belongs to instead of events[0]
    let close_time = raw.events.first().and_then(|event| {
        event.end_date.as_deref().and_then(|s| {
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
        })
    });

    Some(Market {
        source: Source::Polymarket,
        identifier: raw.id.clone(),
        title: raw.question.clone(),
        description: raw.description.clone().unwrap_or_default(),
        yes_price,
        no_price,
        volume: raw.volume_num.unwrap_or(0.0),
        volume_24h: raw.volume24hr.unwrap_or(0.0),
        close_time,
    })
}

#[async_trait]
impl MarketFeed for PolymarketFeed {
    fn name(&self) -> &str {
        "polymarket"
    }

    fn source(&self) -> Source {
        Source::Polymarket
    }

    async fn fetch(&self) -> Result<Vec<Market>, FeedError> {
        let mut all_markets: Vec<Market> = Vec::new();
        let mut offset = 0_usize;

        while all_markets.len() < self.max_markets {
            let page = match self.fetch_page(offset).await {
                Ok(page) => page,
                Err(e) => {
                    // A mid-pagination failure keeps what was already
                    // collected; an immediate failure is the caller's.
                    if all_markets.is_empty() {
                        return Err(e);
                    }
                    error!(offset, error = %e, "pagination aborted, keeping partial fetch");
                    break;
                }
            };

            if page.is_empty() {
                break;
            }
            let page_len = page.len();
            all_markets.extend(page.iter().filter_map(normalize));
            offset += self.page_size;

            if page_len < self.page_size {
                break;
            }
        }

        all_markets.truncate(self.max_markets);
        Ok(all_markets)
    }
}

impl PolymarketFeed {
    async fn fetch_page(&self, offset: usize) -> Result<Vec<GammaMarket>, FeedError> {
        let resp = self
            .client
            .get(format!("{}/markets", self.base_url))
            .query(&[
                ("limit", self.page_size.to_string()),
                ("offset", offset.to_string()),
                ("volume_num_min", self.min_volume.to_string()),
                ("closed", "false".to_string()),
            ])
            .send()
            .await
            .map_err(|e| FeedError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(FeedError::Network(format!(
                "Gamma API returned {}",
                resp.status()
            )));
        }

        resp.json().await.map_err(|e| FeedError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_full_listing() {
        let raw: GammaMarket = serde_json::from_str(
            r#"{
                "id": "501234",
                "question": "Will X happen by December 31?",
                "description": "Resolves YES if X happens.",
                "outcomePrices": "[\"0.35\", \"0.65\"]",
                "volumeNum": 250000.5,
                "volume24hr": 12000.0,
                "events": [{"endDate": "2025-12-31T12:00:00Z"}]
            }"#,
        )
        .unwrap();

        let market = normalize(&raw).unwrap();
        assert_eq!(market.source, Source::Polymarket);
        assert_eq!(market.identifier, "501234");
        assert_eq!(market.title, "Will X happen by December 31?");
        assert!((market.yes_price - 0.35).abs() < 1e-9);
        assert!((market.no_price - 0.65).abs() < 1e-9);
        assert_eq!(market.volume, 250000.5);
        assert!(market.close_time.is_some());
    }

    #[test]
    fn test_normalize_skips_malformed_prices() {
        let raw: GammaMarket = serde_json::from_str(
            r#"{"id": "1", "question": "Q", "outcomePrices": "not json"}"#,
        )
        .unwrap();
        assert!(normalize(&raw).is_none());
    }

    #[test]
    fn test_normalize_skips_missing_prices() {
        let raw: GammaMarket =
            serde_json::from_str(r#"{"id": "2", "question": "Q"}"#).unwrap();
        assert!(normalize(&raw).is_none());
    }

    #[test]
    fn test_normalize_without_events_has_no_close_time() {
        let raw: GammaMarket = serde_json::from_str(
            r#"{"id": "3", "question": "Q", "outcomePrices": "[\"0.5\", \"0.5\"]"}"#,
        )
        .unwrap();
        let market = normalize(&raw).unwrap();
        assert!(market.close_time.is_none());
        // Missing description normalizes to empty, never null.
        assert_eq!(market.description, "");
    }
}
