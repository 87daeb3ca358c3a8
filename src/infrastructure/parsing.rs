//! HTML parsing infrastructure for store pages
//!
//! Trait-based page parsers over a parsed `scraper::Html` document. Each
//! parser compiles its selectors once at construction and fails loudly when
//! a present node no longer has the expected shape.

pub mod category_parser;
pub mod config;
pub mod context;
pub mod description;
pub mod detail_parser;
pub mod field_classifier;
pub mod list_parser;
pub mod search_parser;

// Re-export public types
pub use category_parser::CategoryParser;
pub use config::SelectorConfig;
pub use context::{DetailParseContext, ParseContext};
pub use description::{DescriptionNode, DescriptionRenderer, RenderedDescription};
pub use detail_parser::DetailPageParser;
pub use crate::infrastructure::parsing_error::{ParsingError, ParsingResult};
pub use field_classifier::{ExtraInfo, ExtraInfoField, ExtraInfoFragment, FieldClassifier};
pub use list_parser::ListPageParser;
pub use search_parser::SearchPageParser;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// Parser trait with context support
pub trait ContextualParser {
    type Output;
    type Context;

    /// Parse a document with contextual information
    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output>;
}

/// A compiled selector that remembers its source text for error reporting
#[derive(Debug, Clone)]
pub struct CompiledSelector {
    source: String,
    selector: Selector,
}

impl CompiledSelector {
    pub fn parse(source: &str) -> ParsingResult<Self> {
        let selector = Selector::parse(source).map_err(|e| ParsingError::InvalidSelector {
            selector: source.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            source: source.to_string(),
            selector,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// All matching descendants of `scope`, in document order
    pub fn all<'a>(&self, scope: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        scope.select(&self.selector).collect()
    }

    pub fn first<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
        scope.select(&self.selector).next()
    }

    pub fn required<'a>(&self, scope: ElementRef<'a>, context: &str) -> ParsingResult<ElementRef<'a>> {
        self.first(scope)
            .ok_or_else(|| ParsingError::required_node_missing(&self.source, context))
    }

    /// Attribute of the first match; both node and attribute must exist.
    pub fn required_attr(&self, scope: ElementRef<'_>, attribute: &str, context: &str) -> ParsingResult<String> {
        let node = self.required(scope, context)?;
        node.value()
            .attr(attribute)
            .map(str::to_string)
            .ok_or_else(|| ParsingError::required_attribute_missing(&self.source, attribute))
    }

    /// Normalized text of the first match
    pub fn required_text(&self, scope: ElementRef<'_>, context: &str) -> ParsingResult<String> {
        self.required(scope, context).map(|node| normalized_text(&node))
    }
}

pub(crate) fn compile_pattern(pattern: &str) -> ParsingResult<Regex> {
    Regex::new(pattern).map_err(|e| ParsingError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

/// Text content with ASCII whitespace runs collapsed and the ends trimmed.
pub(crate) fn normalized_text(element: &ElementRef<'_>) -> String {
    let raw: String = element.text().collect();
    raw.split(|c: char| c.is_ascii_whitespace())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Shared price rule: absent node or text without any digit means free.
pub(crate) fn display_price(node: Option<ElementRef<'_>>) -> Option<String> {
    node.map(|n| normalized_text(&n))
        .filter(|text| text.chars().any(|c| c.is_ascii_digit()))
}
