use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::EmbeddingProvider;
use std::collections::HashMap;

/// Deterministic in-memory provider for tests: texts map to pre-registered
/// vectors, anything unregistered embeds to the zero vector (similarity 0
/// with everything). Never fails, so tests exercise the pipeline's real
/// geometry without a network dependency.
pub struct StubProvider {
    vectors: HashMap<String, Vec<f32>>,
    dimension: usize,
}

impl StubProvider {
    pub fn new(dimension: usize) -> Self {
        Self {
            vectors: HashMap::new(),
            dimension,
        }
    }

    pub fn with_vector(mut self, text: impl Into<String>, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.into(), vector);
        self
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for StubProvider {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, DomainError> {
        Ok(texts
            .iter()
            .map(|t| {
                self.vectors
                    .get(t)
                    .cloned()
                    .unwrap_or_else(|| vec![0.0; self.dimension])
            })
            .collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
