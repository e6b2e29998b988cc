//! Ingest and storage behavior through the facade.

mod common;

use common::{make_market, setup, BrokenFeed, StaticFeed};
use marketfuse::domain::ports::market_feed::MarketFeed;
use marketfuse::domain::values::source::Source;
use marketfuse::infrastructure::embeddings::stub::StubProvider;
use std::sync::Arc;

#[tokio::test]
async fn test_ingest_stores_and_upserts() {
    let fuse = setup(StubProvider::new(2));

    let feeds: Vec<Arc<dyn MarketFeed>> = vec![Arc::new(StaticFeed::new(
        "kalshi",
        Source::Kalshi,
        vec![make_market(Source::Kalshi, "K1", "First title", "d")],
    ))];
    fuse.ingest(&feeds, None).await.unwrap();

    // Same identifier again with a new title replaces the stored row.
    let feeds: Vec<Arc<dyn MarketFeed>> = vec![Arc::new(StaticFeed::new(
        "kalshi",
        Source::Kalshi,
        vec![make_market(Source::Kalshi, "K1", "Second title", "d")],
    ))];
    fuse.ingest(&feeds, None).await.unwrap();

    let markets = fuse.markets().unwrap();
    assert_eq!(markets.len(), 1);
    assert_eq!(markets[0].title, "Second title");
}

#[tokio::test]
async fn test_fresh_markets_skip_refetch() {
    let fuse = setup(StubProvider::new(2));
    let feed = || -> Arc<dyn MarketFeed> {
        Arc::new(StaticFeed::new(
            "kalshi",
            Source::Kalshi,
            vec![make_market(Source::Kalshi, "K1", "t", "d")],
        ))
    };

    let first = fuse.ingest(&[feed()], Some(chrono::Duration::minutes(30))).await.unwrap();
    assert!(!first[0].skipped_fresh);
    assert_eq!(first[0].upserted, 1);

    let second = fuse.ingest(&[feed()], Some(chrono::Duration::minutes(30))).await.unwrap();
    assert!(second[0].skipped_fresh);
    assert_eq!(second[0].fetched, 0);
}

#[tokio::test]
async fn test_feed_failure_does_not_stop_other_feeds() {
    let fuse = setup(StubProvider::new(2));

    let feeds: Vec<Arc<dyn MarketFeed>> = vec![
        Arc::new(BrokenFeed),
        Arc::new(StaticFeed::new(
            "polymarket",
            Source::Polymarket,
            vec![make_market(Source::Polymarket, "P1", "t", "d")],
        )),
    ];

    let reports = fuse.ingest(&feeds, None).await.unwrap();
    assert_eq!(reports.len(), 2);
    assert!(!reports[0].errors.is_empty());
    assert_eq!(reports[0].upserted, 0);
    assert_eq!(reports[1].upserted, 1);
    assert_eq!(fuse.markets().unwrap().len(), 1);
}

#[tokio::test]
async fn test_stats_on_empty_database() {
    let fuse = setup(StubProvider::new(2));
    let stats = fuse.stats().unwrap();
    assert_eq!(stats.total_markets, 0);
    assert_eq!(stats.duplicate_links, 0);
    assert!(stats.by_source.is_empty());
}
