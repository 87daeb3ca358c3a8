//! Application layer
//!
//! The scraper orchestrator that ties requests, pacing and parsing together.

pub mod play_store_scraper;

pub use play_store_scraper::PlayStoreScraper;
