use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A confirmed cross-source duplicate: one Kalshi market and one Polymarket
/// market judged to represent the same real-world event. Written once per
/// accepted match and never updated or deleted by this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateLink {
    pub id: String,
    pub kalshi_id: String,
    pub polymarket_id: String,
    pub created_at: DateTime<Utc>,
}

impl DuplicateLink {
    pub fn new(kalshi_id: String, polymarket_id: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kalshi_id,
            polymarket_id,
            created_at: Utc::now(),
        }
    }
}
