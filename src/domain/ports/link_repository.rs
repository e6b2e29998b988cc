use crate::domain::entities::duplicate_link::DuplicateLink;
use crate::domain::error::DomainError;

/// Persists confirmed cross-source duplicate pairs.
///
/// `record_link` is NOT idempotent: re-running dedup over the same corpus
/// may insert duplicate rows for a pair that was already linked in an
/// earlier run. Deduplicating the link table is the owner's concern, not
/// this crate's.
pub trait LinkRepository: Send + Sync {
    fn record_link(&self, kalshi_id: &str, polymarket_id: &str) -> Result<(), DomainError>;
    fn all(&self) -> Result<Vec<DuplicateLink>, DomainError>;
}
