pub mod embedding_port;
pub mod link_repository;
pub mod market_feed;
pub mod market_repository;
