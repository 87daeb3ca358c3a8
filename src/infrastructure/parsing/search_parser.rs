//! Search results parser
//!
//! Same record shape as the listing, different markup. The id is taken
//! from the result link's query and the rating is read from an aria label.

use super::config::SearchSelectors;
use super::{CompiledSelector, ContextualParser, ParseContext, ParsingError, ParsingResult, compile_pattern, display_price};
use crate::domain::AppSummary;
use regex::Regex;
use scraper::{ElementRef, Html};
use tracing::debug;

pub struct SearchPageParser {
    result: CompiledSelector,
    link: CompiledSelector,
    title: CompiledSelector,
    image: CompiledSelector,
    author: CompiledSelector,
    rating: CompiledSelector,
    price: CompiledSelector,
    rating_number: Regex,
}

impl SearchPageParser {
    pub fn new(selectors: &SearchSelectors) -> ParsingResult<Self> {
        Ok(Self {
            result: CompiledSelector::parse(&selectors.result)?,
            link: CompiledSelector::parse(&selectors.link)?,
            title: CompiledSelector::parse(&selectors.title)?,
            image: CompiledSelector::parse(&selectors.image)?,
            author: CompiledSelector::parse(&selectors.author)?,
            rating: CompiledSelector::parse(&selectors.rating)?,
            price: CompiledSelector::parse(&selectors.price)?,
            rating_number: compile_pattern(r"\d+([.,]\d+)?")?,
        })
    }

    fn parse_result(&self, node: ElementRef<'_>, context: &ParseContext) -> ParsingResult<AppSummary> {
        let href = self.link.required_attr(node, "href", "search result")?;
        let url = context.absolute_url(&href)?;
        let id = url
            .split_once('=')
            .map(|(_, id)| id.to_string())
            .ok_or_else(|| ParsingError::UrlResolutionFailed {
                url: url.clone(),
                reason: "link carries no id parameter".to_string(),
            })?;

        let image = self.image.required_attr(node, "data-src", "search result")?;

        Ok(AppSummary {
            id,
            url,
            title: self.title.required_attr(node, "title", "search result")?,
            image: context.absolute_url(&image)?,
            author: self.author.required_text(node, "search result")?,
            rating: self.parse_rating(node)?,
            price: display_price(self.price.first(node)),
        })
    }

    /// Locale decimal commas are accepted ("4,5" reads as 4.5).
    fn parse_rating(&self, node: ElementRef<'_>) -> ParsingResult<f64> {
        let Some(indicator) = self.rating.first(node) else {
            return Ok(0.0);
        };
        let label = indicator.value().attr("aria-label").unwrap_or_default();
        self.rating_number
            .find(label)
            .and_then(|m| m.as_str().replace(',', ".").parse::<f64>().ok())
            .ok_or_else(|| ParsingError::rating_format(label))
    }
}

impl ContextualParser for SearchPageParser {
    type Output = Vec<AppSummary>;
    type Context = ParseContext;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output> {
        let results = self.result.all(html.root_element());
        debug!("Found {} search results", results.len());

        results
            .into_iter()
            .map(|node| self.parse_result(node, context))
            .collect()
    }
}
