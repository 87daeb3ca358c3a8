//! Category link parser for the store root page

use super::config::CategorySelectors;
use super::{CompiledSelector, ContextualParser, ParsingResult, compile_pattern};
use regex::Regex;
use scraper::Html;
use tracing::debug;

pub struct CategoryParser {
    link: CompiledSelector,
    href_pattern: Regex,
}

impl CategoryParser {
    pub fn new(selectors: &CategorySelectors) -> ParsingResult<Self> {
        Ok(Self {
            link: CompiledSelector::parse(&selectors.link)?,
            href_pattern: compile_pattern(&selectors.href_pattern)?,
        })
    }

    /// Last path segment of a category href, without any query string
    fn category_id(href: &str) -> &str {
        let last = href.rsplit('/').next().unwrap_or(href);
        last.split('?').next().unwrap_or(last)
    }
}

impl ContextualParser for CategoryParser {
    type Output = Vec<String>;
    type Context = ();

    fn parse_with_context(&self, html: &Html, _: &()) -> ParsingResult<Self::Output> {
        let mut categories: Vec<String> = Vec::new();

        for link in self.link.all(html.root_element()) {
            let Some(href) = link.value().attr("href") else {
                continue;
            };
            if !self.href_pattern.is_match(href) {
                continue;
            }
            let id = Self::category_id(href);
            if !categories.iter().any(|existing| existing == id) {
                categories.push(id.to_string());
            }
        }

        debug!("Found {} categories", categories.len());
        Ok(categories)
    }
}
