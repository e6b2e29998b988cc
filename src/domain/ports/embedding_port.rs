use crate::domain::error::DomainError;

/// Maps a batch of texts to fixed-dimension vectors, one per input, in input
/// order. Deterministic for a fixed model version; must tolerate empty
/// strings. Any failure here is fatal to the run that requested it, since
/// the dedup pipeline has no partial-embedding mode.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, DomainError>;
    fn dimension(&self) -> usize;
}
