//! Collection listing parser
//!
//! One summary per repeated card node. The rating is encoded as a width
//! percentage in the indicator's `style` attribute.

use super::config::ListSelectors;
use super::{CompiledSelector, ContextualParser, ParseContext, ParsingError, ParsingResult, compile_pattern, display_price};
use crate::domain::AppSummary;
use regex::Regex;
use scraper::{ElementRef, Html};
use tracing::debug;

/// Width percent to stars
const RATING_SCALE: f64 = 0.05;

pub struct ListPageParser {
    card: CompiledSelector,
    link: CompiledSelector,
    title: CompiledSelector,
    image: CompiledSelector,
    author: CompiledSelector,
    rating: CompiledSelector,
    price: CompiledSelector,
    rating_number: Regex,
}

impl ListPageParser {
    pub fn new(selectors: &ListSelectors) -> ParsingResult<Self> {
        Ok(Self {
            card: CompiledSelector::parse(&selectors.card)?,
            link: CompiledSelector::parse(&selectors.link)?,
            title: CompiledSelector::parse(&selectors.title)?,
            image: CompiledSelector::parse(&selectors.image)?,
            author: CompiledSelector::parse(&selectors.author)?,
            rating: CompiledSelector::parse(&selectors.rating)?,
            price: CompiledSelector::parse(&selectors.price)?,
            rating_number: compile_pattern(r"\d+(\.\d+)?")?,
        })
    }

    fn parse_card(&self, card: ElementRef<'_>, context: &ParseContext) -> ParsingResult<AppSummary> {
        let id = card
            .value()
            .attr("data-docid")
            .map(str::to_string)
            .ok_or_else(|| ParsingError::required_attribute_missing(self.card.source(), "data-docid"))?;

        let href = self.link.required_attr(card, "href", "listing card")?;
        let image = self.image.required_attr(card, "data-cover-large", "listing card")?;

        Ok(AppSummary {
            url: context.absolute_url(&href)?,
            title: self.title.required_attr(card, "title", "listing card")?,
            image: context.absolute_url(&image)?,
            author: self.author.required_attr(card, "title", "listing card")?,
            rating: self.parse_rating(card)?,
            price: display_price(self.price.first(card)),
            id,
        })
    }

    /// Absent indicator means unrated; a present one must carry a number.
    fn parse_rating(&self, card: ElementRef<'_>) -> ParsingResult<f64> {
        let Some(indicator) = self.rating.first(card) else {
            return Ok(0.0);
        };
        let style = indicator.value().attr("style").unwrap_or_default();
        let width = self
            .rating_number
            .find(style)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .ok_or_else(|| ParsingError::rating_format(style))?;
        Ok(width * RATING_SCALE)
    }
}

impl ContextualParser for ListPageParser {
    type Output = Vec<AppSummary>;
    type Context = ParseContext;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output> {
        let cards = self.card.all(html.root_element());
        debug!("Found {} listing cards", cards.len());

        cards
            .into_iter()
            .map(|card| self.parse_card(card, context))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::constants::site::ORIGIN;
    use url::Url;

    fn card(id: &str, rating: Option<&str>, price: Option<&str>) -> String {
        let rating = rating
            .map(|style| format!(r#"<div class="tiny-star"><div class="current-rating" style="{style}"></div></div>"#))
            .unwrap_or_default();
        let price = price
            .map(|p| format!(r#"<span class="display-price">{p}</span>"#))
            .unwrap_or_default();
        format!(
            r#"<div class="card" data-docid="{id}">
                <a class="card-click-target" href="/store/apps/details?id={id}"></a>
                <img class="cover-image" data-cover-large="//lh3.googleusercontent.com/{id}=w340">
                <a class="title" title="Title {id}" href="/store/apps/details?id={id}">Title {id}</a>
                <a class="subtitle" title="Author {id}" href="/store/apps/developer?id=x">Author {id}</a>
                {rating}{price}
            </div>"#
        )
    }

    fn parse(body: &str) -> ParsingResult<Vec<AppSummary>> {
        let html = Html::parse_document(&format!("<html><body>{body}</body></html>"));
        let parser = ListPageParser::new(&ListSelectors::default()).unwrap();
        parser.parse_with_context(&html, &ParseContext::new(Url::parse(ORIGIN).unwrap()))
    }

    #[test]
    fn test_cards_are_parsed_in_order() {
        let body = format!(
            "{}{}",
            card("com.a", Some("width: 84.5%;"), Some("$0.99")),
            card("com.b", None, Some("Free"))
        );
        let apps = parse(&body).unwrap();

        assert_eq!(apps.len(), 2);
        let first = &apps[0];
        assert_eq!(first.id, "com.a");
        assert_eq!(first.url, "https://play.google.com/store/apps/details?id=com.a");
        assert_eq!(first.title, "Title com.a");
        assert_eq!(first.image, "https://play.google.com/com.a=w340");
        assert_eq!(first.author, "Author com.a");
        assert!((first.rating - 4.225).abs() < 1e-9);
        assert_eq!(first.price.as_deref(), Some("$0.99"));

        assert_eq!(apps[1].id, "com.b");
        assert_eq!(apps[1].rating, 0.0);
        assert_eq!(apps[1].price, None);
    }

    #[test]
    fn test_full_width_is_five_stars() {
        let apps = parse(&card("com.a", Some("width: 100%"), None)).unwrap();
        assert!((apps[0].rating - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_unparsable_rating_is_an_error() {
        let err = parse(&card("com.a", Some("width: auto"), None)).unwrap_err();
        assert_eq!(err, ParsingError::rating_format("width: auto"));
    }

    #[test]
    fn test_page_without_cards_is_empty() {
        assert!(parse("<p>nothing here</p>").unwrap().is_empty());
    }
}
