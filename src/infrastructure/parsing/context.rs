//! Parsing context for store pages
//!
//! Carries what a parser needs beyond the document itself.

use crate::infrastructure::request_gate::absolute_url;
use super::ParsingResult;
use url::Url;

/// Context shared by every page parser
#[derive(Debug, Clone)]
pub struct ParseContext {
    /// Origin every extracted URL is resolved against
    pub origin: Url,
}

impl ParseContext {
    pub fn new(origin: Url) -> Self {
        Self { origin }
    }

    /// Resolve a possibly-relative URL found in the page
    pub fn absolute_url(&self, raw: &str) -> ParsingResult<String> {
        absolute_url(&self.origin, raw)
    }
}

/// Context for a single application detail page
#[derive(Debug, Clone)]
pub struct DetailParseContext {
    /// Catalog id the page was requested for
    pub id: String,

    pub base: ParseContext,
}

impl DetailParseContext {
    pub fn new(id: impl Into<String>, base: ParseContext) -> Self {
        Self {
            id: id.into(),
            base,
        }
    }
}
