//! Domain module - store records and request value objects
//!
//! Everything here is created fresh per call and returned by value.

pub mod app;
pub mod constants;
pub mod pagination;
pub mod request;

pub use app::{AppDetail, AppDetails, AppSummary};
pub use constants::COLLECTIONS;
pub use pagination::PaginationCursor;
pub use request::{PriceFilter, RatingFilter, RequestContext};
