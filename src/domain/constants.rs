//! Store site characteristics and domain constants

/// Google Play site constants
pub mod site {
    /// Fixed origin every request and every absolute URL is built against
    pub const ORIGIN: &str = "https://play.google.com";

    /// Path prefix every logical store path is mounted under
    pub const STORE_ROOT: &str = "/store/";

    /// Prefix of the redirect wrapper Google puts around outbound description links
    pub const REDIRECT_PREFIX: &str = "https://www.google.com/url?q=";
}

/// Listing pagination limits imposed by the store
pub mod pagination {
    /// Largest accepted `start` offset for a listing chunk
    pub const MAX_START: u32 = 180;

    /// Largest accepted chunk size
    pub const MAX_NUM: u32 = 120;

    /// Chunk size used by full listing walks
    pub const DEFAULT_NUM: u32 = 60;
}

/// Request defaults
pub mod request {
    /// Minimum spacing between two request starts (milliseconds)
    pub const DEFAULT_DELAY_MS: u64 = 1000;

    pub const DEFAULT_LANG: &str = "en";

    pub const DEFAULT_COUNTRY: &str = "us";
}

/// Ranking buckets a listing page can be selected by
pub const COLLECTIONS: &[&str] = &[
    "topselling_free",
    "topselling_paid",
    "topselling_new_free",
    "topselling_new_paid",
    "topgrossing",
    "movers_shakers",
];
