use crate::domain::values::source::Source;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One market listing, normalized regardless of which source it came from.
///
/// Feeds guarantee `title` and `description` are present (empty string is
/// fine, null is not) before a record enters the dedup pipeline, so the
/// embedder is never handed a malformed record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Market {
    pub source: Source,
    /// Source-scoped unique key: Kalshi ticker, Polymarket numeric id.
    pub identifier: String,
    pub title: String,
    pub description: String,
    /// Probability of the YES outcome, in [0, 1].
    pub yes_price: f64,
    /// Probability of the NO outcome, in [0, 1]. Not required to sum to 1
    /// with `yes_price`; bid/ask spreads leave a gap.
    pub no_price: f64,
    pub volume: f64,
    pub volume_24h: f64,
    pub close_time: Option<DateTime<Utc>>,
}

impl Market {
    /// The text that represents this market's identity for embedding.
    pub fn embedding_text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_text_joins_title_and_description() {
        let m = Market {
            source: Source::Kalshi,
            identifier: "KXBTC-25DEC31".into(),
            title: "Will BTC close above 100k".into(),
            description: "Resolves YES if the reference price exceeds 100000".into(),
            yes_price: 0.42,
            no_price: 0.59,
            volume: 120_000.0,
            volume_24h: 4_000.0,
            close_time: None,
        };
        assert_eq!(
            m.embedding_text(),
            "Will BTC close above 100k Resolves YES if the reference price exceeds 100000"
        );
    }

    #[test]
    fn test_embedding_text_with_empty_description() {
        let m = Market {
            source: Source::Polymarket,
            identifier: "501234".into(),
            title: "Will X happen".into(),
            description: String::new(),
            yes_price: 0.5,
            no_price: 0.5,
            volume: 0.0,
            volume_24h: 0.0,
            close_time: None,
        };
        assert_eq!(m.embedding_text(), "Will X happen ");
    }
}
