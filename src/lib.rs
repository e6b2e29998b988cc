pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;

use crate::application::dedup::{DedupOutcome, DedupUseCase};
use crate::application::ingest::{IngestReport, IngestUseCase};
use crate::application::stats::{FuseStats, StatsUseCase};
use crate::domain::entities::duplicate_link::DuplicateLink;
use crate::domain::entities::market::Market;
use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::EmbeddingProvider;
use crate::domain::ports::link_repository::LinkRepository;
use crate::domain::ports::market_feed::MarketFeed;
use crate::domain::ports::market_repository::MarketRepository;
use crate::infrastructure::embeddings::openai::OpenAiProvider;
use crate::infrastructure::embeddings::voyage::VoyageProvider;
use crate::infrastructure::sqlite::link_repo::SqliteLinkRepo;
use crate::infrastructure::sqlite::market_repo::SqliteMarketRepo;
use crate::infrastructure::sqlite::migrations::run_migrations;
use chrono::Duration;
use rusqlite::Connection;
use std::sync::Arc;

pub struct MarketFuse {
    market_repo: Arc<dyn MarketRepository>,
    link_repo: Arc<dyn LinkRepository>,
    ingest_uc: IngestUseCase,
    dedup_uc: DedupUseCase,
    stats_uc: StatsUseCase,
}

impl MarketFuse {
    /// Build with the embedding provider named in the environment. The
    /// embedder is constructed once here and shared across every run.
    pub fn new(db_path: &str) -> Result<Self, DomainError> {
        let provider =
            std::env::var("MARKETFUSE_EMBEDDING_PROVIDER").unwrap_or_default();
        let api_key = std::env::var("MARKETFUSE_EMBEDDING_API_KEY").unwrap_or_default();
        let model = std::env::var("MARKETFUSE_EMBEDDING_MODEL").ok();

        let embedder: Arc<dyn EmbeddingProvider> = match provider.as_str() {
            "voyage" => Arc::new(VoyageProvider::new(api_key, model)),
            "openai" => Arc::new(OpenAiProvider::new(api_key, model)),
            other => {
                // No fallback provider; an embedder that returns nothing
                // useful would make every run report zero duplicates.
                return Err(DomainError::InvalidInput(format!(
                    "unknown embedding provider '{other}'; set MARKETFUSE_EMBEDDING_PROVIDER to 'voyage' or 'openai'"
                )));
            }
        };

        Self::with_providers(db_path, embedder)
    }

    pub fn with_providers(
        db_path: &str,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self, DomainError> {
        let conn1 = Connection::open(db_path)
            .map_err(|e| DomainError::Database(format!("DB error: {e}")))?;
        conn1
            .pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| DomainError::Database(format!("WAL error: {e}")))?;
        let conn2 = Connection::open(db_path)
            .map_err(|e| DomainError::Database(format!("DB error: {e}")))?;
        conn2
            .pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| DomainError::Database(format!("WAL error: {e}")))?;

        // Each connection may be its own database (":memory:" in tests), so
        // both run the idempotent migrations.
        run_migrations(&conn1)?;
        run_migrations(&conn2)?;

        let market_repo: Arc<dyn MarketRepository> = Arc::new(SqliteMarketRepo::new(conn1));
        let link_repo: Arc<dyn LinkRepository> = Arc::new(SqliteLinkRepo::new(conn2));

        Ok(Self {
            ingest_uc: IngestUseCase::new(market_repo.clone()),
            dedup_uc: DedupUseCase::new(market_repo.clone(), link_repo.clone(), embedder),
            stats_uc: StatsUseCase::new(market_repo.clone(), link_repo.clone()),
            market_repo,
            link_repo,
        })
    }

    // Delegating methods
    pub async fn ingest(
        &self,
        feeds: &[Arc<dyn MarketFeed>],
        max_age: Option<Duration>,
    ) -> Result<Vec<IngestReport>, DomainError> {
        self.ingest_uc.execute(feeds, max_age).await
    }

    /// Deduplicate everything currently stored.
    pub async fn dedup(&self) -> Result<DedupOutcome, DomainError> {
        self.dedup_uc.execute().await
    }

    /// Deduplicate a caller-supplied collection without touching storage
    /// (links for accepted pairs are still recorded).
    pub async fn deduplicate(&self, markets: Vec<Market>) -> Result<DedupOutcome, DomainError> {
        self.dedup_uc.deduplicate(markets).await
    }

    pub fn markets(&self) -> Result<Vec<Market>, DomainError> {
        self.market_repo.all()
    }

    pub fn links(&self) -> Result<Vec<DuplicateLink>, DomainError> {
        self.link_repo.all()
    }

    pub fn stats(&self) -> Result<FuseStats, DomainError> {
        self.stats_uc.execute()
    }
}
