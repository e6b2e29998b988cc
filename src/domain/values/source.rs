use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Provenance tag for a market record. Kalshi and Polymarket are the two
/// sources eligible for cross-linking; anything else round-trips through
/// `Other` and is never considered for a merge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Kalshi,
    Polymarket,
    Other(String),
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kalshi => write!(f, "kalshi"),
            Self::Polymarket => write!(f, "polymarket"),
            Self::Other(tag) => write!(f, "{tag}"),
        }
    }
}

impl FromStr for Source {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "kalshi" => Self::Kalshi,
            "polymarket" => Self::Polymarket,
            _ => Self::Other(s.to_string()),
        })
    }
}
