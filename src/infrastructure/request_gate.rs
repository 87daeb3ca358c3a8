//! Request gate: pacing, URL construction and status classification
//!
//! The gate measures time between request *starts*: the timestamp is taken
//! immediately before the transport is called, not after it returns.

use crate::domain::constants::site::{ORIGIN, STORE_ROOT};
use crate::domain::constants::request::DEFAULT_DELAY_MS;
use crate::error::{ScraperError, ScraperResult};
use crate::infrastructure::http_client::{Method, Transport};
use crate::infrastructure::parsing_error::{ParsingError, ParsingResult};
use scraper::Html;
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};
use url::Url;

pub struct RequestGate<T> {
    transport: T,
    origin: Url,
    delay: Duration,
    last_request: Option<Instant>,
}

impl<T: Transport> RequestGate<T> {
    pub fn new(transport: T) -> ScraperResult<Self> {
        let origin = Url::parse(ORIGIN).map_err(|e| ScraperError::Config(format!("Invalid origin {ORIGIN}: {e}")))?;
        Ok(Self {
            transport,
            origin,
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
            last_request: None,
        })
    }

    pub fn set_delay(&mut self, delay_ms: u64) {
        self.delay = Duration::from_millis(delay_ms);
    }

    /// Configured minimum interval between request starts, in milliseconds
    pub fn delay(&self) -> u64 {
        u64::try_from(self.delay.as_millis()).unwrap_or(u64::MAX)
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build the canonical URL for a logical store path.
    pub fn build_url(&self, path_segments: &[&str], query: &[(&str, Option<String>)]) -> String {
        let joined = path_segments.join("/");
        let path = format!("{STORE_ROOT}{}", joined.trim_matches('/'));
        let path = path.trim_end_matches('/');

        let mut url = format!("{}{}", self.origin.as_str().trim_end_matches('/'), path);

        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        let mut has_pairs = false;
        for (key, value) in query {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                serializer.append_pair(key, value);
                has_pairs = true;
            }
        }
        if has_pairs {
            url.push('?');
            url.push_str(&serializer.finish());
        }
        url
    }

    /// Pace, issue a GET for the logical path and parse the body.
    pub async fn request(&mut self, path_segments: &[&str], query: &[(&str, Option<String>)]) -> ScraperResult<Html> {
        let url = self.build_url(path_segments, query);

        self.wait_for_slot().await;
        self.last_request = Some(Instant::now());

        info!("🌐 HTTP {} {}", Method::Get, url);
        let response = self.transport.request(Method::Get, &url).await?;

        match response.status {
            200 => Ok(Html::parse_document(&response.body)),
            404 => {
                warn!("Resource not found: {}", url);
                Err(ScraperError::NotFound { url })
            }
            status => {
                warn!("❌ HTTP error {}: {}", status, url);
                Err(ScraperError::RequestFailed { status, url })
            }
        }
    }

    /// Resolve a possibly-relative URL against the fixed origin
    pub fn absolute_url(&self, raw: &str) -> ParsingResult<String> {
        absolute_url(&self.origin, raw)
    }

    async fn wait_for_slot(&self) {
        let Some(last) = self.last_request else {
            return;
        };
        let wait = self.delay.saturating_sub(last.elapsed());
        if !wait.is_zero() {
            debug!("⚖️ Waiting {:?} before next request", wait);
            sleep(wait).await;
        }
    }
}

/// Merge `raw` onto `origin`: scheme and host always come from the origin,
/// path, query and fragment from the input. A missing path becomes `/`, and
/// an opaque path (`data:`, `mailto:`) is rooted under it.
pub fn absolute_url(origin: &Url, raw: &str) -> ParsingResult<String> {
    let resolved = origin.join(raw.trim()).map_err(|e| ParsingError::UrlResolutionFailed {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    let mut absolute = format!("{}://", origin.scheme());
    absolute.push_str(origin.host_str().unwrap_or_default());
    if let Some(port) = origin.port() {
        absolute.push_str(&format!(":{port}"));
    }

    let path = resolved.path();
    if !path.starts_with('/') {
        absolute.push('/');
    }
    absolute.push_str(path);
    if let Some(query) = resolved.query() {
        absolute.push('?');
        absolute.push_str(query);
    }
    if let Some(fragment) = resolved.fragment() {
        absolute.push('#');
        absolute.push_str(fragment);
    }
    Ok(absolute)
}
