//! Play Store Scraper - Google Play listing, search and detail scraping
//!
//! Fetches collection listings, search results, category codes and full
//! application detail pages from the public store site, one paced request
//! at a time, and returns them as typed records.

// Module declarations
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use application::PlayStoreScraper;
pub use domain::{AppDetail, AppDetails, AppSummary, PaginationCursor, PriceFilter, RatingFilter, RequestContext};
pub use error::{ScraperError, ScraperResult};
pub use infrastructure::{ReqwestTransport, ScraperConfig, Transport, TransportResponse};
