//! Cross-source duplicate detection and merge.
//!
//! One run is a single synchronous pass: embed every market's text in one
//! batched call, build the all-pairs similarity matrix, pull candidate pairs
//! above the threshold, then greedily accept cross-source pairs under a
//! one-merge-per-record constraint. Accepted pairs are persisted as duplicate
//! links; the output collection contains every record that was not part of
//! an accepted pair, in original order.
//!
//! Only an embedding failure aborts the run. Link writes and display-name
//! lookups degrade to warnings.

use crate::domain::entities::market::Market;
use crate::domain::error::DomainError;
use crate::domain::ports::embedding_port::EmbeddingProvider;
use crate::domain::ports::link_repository::LinkRepository;
use crate::domain::ports::market_repository::MarketRepository;
use crate::domain::values::similarity::{
    select_candidates, similarity_matrix, CandidatePair, DUPLICATE_THRESHOLD,
};
use crate::domain::values::source::Source;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

pub struct DedupUseCase {
    markets: Arc<dyn MarketRepository>,
    links: Arc<dyn LinkRepository>,
    embedder: Arc<dyn EmbeddingProvider>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct DedupReport {
    pub total_markets: usize,
    pub candidate_pairs: usize,
    pub merged_pairs: usize,
    pub link_failures: usize,
    pub survivors: usize,
}

/// Result of one dedup run: the deduplicated collection plus counters.
#[derive(Debug)]
pub struct DedupOutcome {
    pub markets: Vec<Market>,
    pub report: DedupReport,
}

impl DedupUseCase {
    pub fn new(
        markets: Arc<dyn MarketRepository>,
        links: Arc<dyn LinkRepository>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        Self {
            markets,
            links,
            embedder,
        }
    }

    /// Deduplicate everything currently stored.
    pub async fn execute(&self) -> Result<DedupOutcome, DomainError> {
        let markets = self.markets.all()?;
        self.deduplicate(markets).await
    }

    /// Deduplicate a caller-supplied collection.
    pub async fn deduplicate(&self, markets: Vec<Market>) -> Result<DedupOutcome, DomainError> {
        let total = markets.len();
        if total == 0 {
            return Ok(DedupOutcome {
                markets,
                report: DedupReport {
                    total_markets: 0,
                    candidate_pairs: 0,
                    merged_pairs: 0,
                    link_failures: 0,
                    survivors: 0,
                },
            });
        }

        let texts: Vec<String> = markets.iter().map(|m| m.embedding_text()).collect();
        let embeddings = self.embedder.embed(&texts).await?;
        if embeddings.len() != total {
            return Err(DomainError::Embedding(format!(
                "provider returned {} vectors for {} texts",
                embeddings.len(),
                total
            )));
        }
        info!(count = embeddings.len(), "computed embeddings");

        let matrix = similarity_matrix(&embeddings);
        let candidates = select_candidates(&matrix, DUPLICATE_THRESHOLD);
        info!(pairs = candidates.len(), "duplicate candidates above threshold");

        let (merged_pairs, link_failures, used) = self.resolve(&candidates, &markets);

        let survivors: Vec<Market> = markets
            .into_iter()
            .enumerate()
            .filter(|(index, _)| !used.contains(index))
            .map(|(_, market)| market)
            .collect();

        info!(
            merged = merged_pairs,
            total,
            survivors = survivors.len(),
            "dedup run complete"
        );

        Ok(DedupOutcome {
            report: DedupReport {
                total_markets: total,
                candidate_pairs: candidates.len(),
                merged_pairs,
                link_failures,
                survivors: survivors.len(),
            },
            markets: survivors,
        })
    }

    /// Greedy conflict resolution over the ordered candidate list.
    ///
    /// A record participates in at most one accepted pair, and an accepted
    /// pair must span exactly one Kalshi and one Polymarket record.
    /// Same-source pairs and pairs touching an unknown source are dropped
    /// without consuming their indices.
    fn resolve(
        &self,
        candidates: &[CandidatePair],
        markets: &[Market],
    ) -> (usize, usize, HashSet<usize>) {
        let mut used: HashSet<usize> = HashSet::new();
        let mut merged = 0_usize;
        let mut link_failures = 0_usize;

        for pair in candidates {
            if used.contains(&pair.a) || used.contains(&pair.b) {
                continue;
            }

            let (kalshi, polymarket) = match (&markets[pair.a].source, &markets[pair.b].source) {
                (Source::Kalshi, Source::Polymarket) => (pair.a, pair.b),
                (Source::Polymarket, Source::Kalshi) => (pair.b, pair.a),
                _ => continue,
            };

            self.log_match(&markets[kalshi], &markets[polymarket], pair.score);

            if let Err(e) = self
                .links
                .record_link(&markets[kalshi].identifier, &markets[polymarket].identifier)
            {
                // The pair is still treated as merged: used indices are
                // in-memory state, persistence is best-effort.
                warn!(
                    error = %e,
                    kalshi = %markets[kalshi].identifier,
                    polymarket = %markets[polymarket].identifier,
                    "failed to record duplicate link"
                );
                link_failures += 1;
            }

            used.insert(pair.a);
            used.insert(pair.b);
            merged += 1;
        }

        (merged, link_failures, used)
    }

    /// Observability only. Falls back to the in-memory title when the stored
    /// name can't be resolved; never blocks the merge.
    fn log_match(&self, kalshi: &Market, polymarket: &Market, score: f64) {
        let kalshi_name = match self.markets.display_name(&Source::Kalshi, &kalshi.identifier) {
            Ok(Some(name)) => name,
            Ok(None) => kalshi.title.clone(),
            Err(e) => {
                warn!(error = %e, ticker = %kalshi.identifier, "kalshi name lookup failed");
                kalshi.title.clone()
            }
        };
        let polymarket_name = match self
            .markets
            .display_name(&Source::Polymarket, &polymarket.identifier)
        {
            Ok(Some(name)) => name,
            Ok(None) => polymarket.title.clone(),
            Err(e) => {
                warn!(error = %e, id = %polymarket.identifier, "polymarket name lookup failed");
                polymarket.title.clone()
            }
        };
        info!(
            score,
            kalshi = %kalshi_name,
            polymarket = %polymarket_name,
            "found duplicate markets"
        );
    }
}
