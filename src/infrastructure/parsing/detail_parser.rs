//! Application detail page parser
//!
//! Builds a full `AppDetail`. Optional nodes that are simply missing leave
//! their field empty; a node that is present but unreadable is an error.

use super::config::DetailSelectors;
use super::{
    CompiledSelector, ContextualParser, DescriptionRenderer, DetailParseContext, ExtraInfoFragment, FieldClassifier,
    ParseContext, ParsingError, ParsingResult, normalized_text,
};
use crate::domain::AppDetail;
use scraper::{ElementRef, Html};
use tracing::debug;

const CONTEXT: &str = "detail page";

pub struct DetailPageParser {
    canonical_link: CompiledSelector,
    image: CompiledSelector,
    title: CompiledSelector,
    author: CompiledSelector,
    genre: CompiledSelector,
    price: CompiledSelector,
    screenshot: CompiledSelector,
    description: CompiledSelector,
    description_sections: CompiledSelector,
    rating: CompiledSelector,
    votes: CompiledSelector,
    extra_info: CompiledSelector,
    family_library_icon: CompiledSelector,
    content_rating: CompiledSelector,
    trailer: CompiledSelector,
    trailer_image: CompiledSelector,
    renderer: DescriptionRenderer,
    classifier: FieldClassifier,
}

impl DetailPageParser {
    pub fn new(selectors: &DetailSelectors) -> ParsingResult<Self> {
        Ok(Self {
            canonical_link: CompiledSelector::parse(&selectors.canonical_link)?,
            image: CompiledSelector::parse(&selectors.image)?,
            title: CompiledSelector::parse(&selectors.title)?,
            author: CompiledSelector::parse(&selectors.author)?,
            genre: CompiledSelector::parse(&selectors.genre)?,
            price: CompiledSelector::parse(&selectors.price)?,
            screenshot: CompiledSelector::parse(&selectors.screenshot)?,
            description: CompiledSelector::parse(&selectors.description)?,
            description_sections: CompiledSelector::parse(&selectors.description_sections)?,
            rating: CompiledSelector::parse(&selectors.rating)?,
            votes: CompiledSelector::parse(&selectors.votes)?,
            extra_info: CompiledSelector::parse(&selectors.extra_info)?,
            family_library_icon: CompiledSelector::parse(&selectors.family_library_icon)?,
            content_rating: CompiledSelector::parse(&selectors.content_rating)?,
            trailer: CompiledSelector::parse(&selectors.trailer)?,
            trailer_image: CompiledSelector::parse(&selectors.trailer_image)?,
            renderer: DescriptionRenderer::new()?,
            classifier: FieldClassifier::new()?,
        })
    }

    fn parse_author(
        &self,
        root: ElementRef<'_>,
        context: &ParseContext,
    ) -> ParsingResult<(Option<String>, Option<String>)> {
        let Some(node) = self.author.first(root) else {
            return Ok((None, None));
        };
        let link = node
            .value()
            .attr("href")
            .map(|href| context.absolute_url(href))
            .transpose()?;
        Ok((Some(normalized_text(&node)), link))
    }

    /// A literal "0" offer is a free app.
    fn parse_price(&self, root: ElementRef<'_>) -> Option<String> {
        self.price
            .first(root)
            .and_then(|node| node.value().attr("content"))
            .filter(|content| *content != "0")
            .map(str::to_string)
    }

    fn parse_screenshots(&self, root: ElementRef<'_>, context: &ParseContext) -> ParsingResult<Vec<String>> {
        self.screenshot
            .all(root)
            .into_iter()
            .filter_map(|img| {
                let value = img.value();
                value
                    .attr("data-src")
                    .filter(|src| !src.is_empty())
                    .or_else(|| value.attr("src"))
            })
            .map(|src| context.absolute_url(src))
            .collect()
    }

    fn parse_rating(&self, root: ElementRef<'_>) -> ParsingResult<f64> {
        let Some(node) = self.rating.first(root) else {
            return Ok(0.0);
        };
        let text = normalized_text(&node);
        text.replace(',', ".")
            .parse::<f64>()
            .map_err(|_| ParsingError::rating_format(&text))
    }

    /// Grouping separators vary by locale and are all dropped.
    fn parse_votes(&self, root: ElementRef<'_>) -> ParsingResult<u64> {
        let Some(node) = self.votes.first(root) else {
            return Ok(0);
        };
        let text = normalized_text(&node);
        let digits: String = text
            .chars()
            .filter(|c| !matches!(c, ',' | '.' | ' ' | '\u{a0}'))
            .collect();
        digits
            .parse::<u64>()
            .map_err(|_| ParsingError::number_format("votes", &text))
    }

    fn extra_info_fragments(&self, root: ElementRef<'_>) -> Vec<ExtraInfoFragment> {
        self.extra_info
            .all(root)
            .into_iter()
            .map(|node| ExtraInfoFragment {
                text: node.text().collect(),
                labeled_text: self.content_rating.first(node).map(|label| normalized_text(&label)),
                icon_only: self.family_library_icon.first(node).is_some(),
            })
            .collect()
    }

    /// Trailer link plus the preview image of the nearest ancestor that has one.
    fn parse_trailer(
        &self,
        root: ElementRef<'_>,
        context: &ParseContext,
    ) -> ParsingResult<(Option<String>, Option<String>)> {
        let Some(node) = self.trailer.first(root) else {
            return Ok((None, None));
        };
        let link = context.absolute_url(node.value().attr("data-trailer-url").unwrap_or_default())?;

        let image = node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find_map(|ancestor| self.trailer_image.first(ancestor))
            .and_then(|img| img.value().attr("src"))
            .map(|src| context.absolute_url(src))
            .transpose()?;

        Ok((Some(link), image))
    }
}

impl ContextualParser for DetailPageParser {
    type Output = AppDetail;
    type Context = DetailParseContext;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output> {
        debug!("Parsing detail page for {}", context.id);
        let root = html.root_element();
        let base = &context.base;

        let image = self.image.required_attr(root, "src", CONTEXT)?;
        let (author, author_link) = self.parse_author(root, base)?;
        let description = self.description.first(root).map(|node| self.renderer.render(node));
        let whatsnew = self
            .description_sections
            .all(root)
            .get(1)
            .map(|node| self.renderer.render(*node).text);
        let info = self.classifier.classify(&self.extra_info_fragments(root));
        let (video_link, video_image) = self.parse_trailer(root, base)?;

        Ok(AppDetail {
            id: context.id.clone(),
            url: self.canonical_link.required_attr(root, "href", CONTEXT)?,
            image: base.absolute_url(&image)?,
            title: self.title.required_text(root, CONTEXT)?,
            author,
            author_link,
            categories: self.genre.all(root).iter().map(normalized_text).collect(),
            price: self.parse_price(root),
            screenshots: self.parse_screenshots(root, base)?,
            description_html: description.as_ref().map(|d| d.html.clone()),
            description: description.map(|d| d.text),
            rating: self.parse_rating(root)?,
            votes: self.parse_votes(root)?,
            last_updated: info.last_updated,
            size: info.size,
            downloads: info.downloads,
            version: info.version,
            supported_os: info.supported_os,
            content_rating: info.content_rating,
            whatsnew,
            video_link,
            video_image,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::constants::site::ORIGIN;
    use url::Url;

    const PAGE: &str = r#"<html><head>
        <link rel="alternate" href="https://play.google.com/store/apps/details?id=com.mojang.minecraftpe">
    </head><body>
        <img itemprop="image" src="//lh3.googleusercontent.com/icon=s180">
        <h1 itemprop="name"><span>Minecraft</span></h1>
        <a class="hrTbp R8zArc" href="/store/apps/dev?id=123">Mojang</a>
        <a itemprop="genre" href="/store/apps/category/GAME_ARCADE">Arcade</a>
        <a itemprop="genre" href="/store/apps/category/FAMILY">Family</a>
        <span itemprop="offers"><meta itemprop="price" content="$7.49"></span>
        <div data-screenshot-item-index="0"><img data-src="/shot1.png" src="/placeholder.png"></div>
        <div data-screenshot-item-index="1"><img src="/shot2.png"></div>
        <div class="MSLVtf">
            <img src="/trailer-preview.jpg">
            <div><button data-trailer-url="https://www.youtube.com/embed/abc?ps=play"></button></div>
        </div>
        <div itemprop="description">
            <span><div>Explore <b>infinite</b> worlds.<br>Build anything.
                <a href="https://www.google.com/url?q=https://minecraft.net/&amp;sa=D">Site</a></div></span>
            <span><div><p>Bug fixes</p><ul><li>Faster</li></ul></div></span>
        </div>
        <div class="BHMmbe">4,5</div>
        <span class="EymY4b"><span aria-label="3,812,417 ratings">3,812,417</span></span>
        <div class="hAyfc"><span class="htlgb"><div><img src="/family.png"></div></span></div>
        <div class="hAyfc"><span class="htlgb">March 5, 2024</span></div>
        <div class="hAyfc"><span class="htlgb">45M</span></div>
        <div class="hAyfc"><span class="htlgb">10,000,000+</span></div>
        <div class="hAyfc"><span class="htlgb">1.20.51</span></div>
        <div class="hAyfc"><span class="htlgb">5.0&nbsp;and up</span></div>
        <div class="hAyfc"><span class="htlgb"><div>Rated for 12+</div></span></div>
    </body></html>"#;

    fn parse(page: &str) -> ParsingResult<AppDetail> {
        let parser = DetailPageParser::new(&DetailSelectors::default()).unwrap();
        let context = DetailParseContext::new(
            "com.mojang.minecraftpe",
            ParseContext::new(Url::parse(ORIGIN).unwrap()),
        );
        parser.parse_with_context(&Html::parse_document(page), &context)
    }

    #[test]
    fn test_full_detail_page() {
        let app = parse(PAGE).unwrap();

        assert_eq!(app.id, "com.mojang.minecraftpe");
        assert_eq!(app.url, "https://play.google.com/store/apps/details?id=com.mojang.minecraftpe");
        assert_eq!(app.image, "https://play.google.com/icon=s180");
        assert_eq!(app.title, "Minecraft");
        assert_eq!(app.author.as_deref(), Some("Mojang"));
        assert_eq!(app.author_link.as_deref(), Some("https://play.google.com/store/apps/dev?id=123"));
        assert_eq!(app.categories, vec!["Arcade", "Family"]);
        assert_eq!(app.price.as_deref(), Some("$7.49"));
        assert_eq!(
            app.screenshots,
            vec!["https://play.google.com/shot1.png", "https://play.google.com/shot2.png"]
        );
        assert!((app.rating - 4.5).abs() < 1e-9);
        assert_eq!(app.votes, 3_812_417);
    }

    #[test]
    fn test_description_and_release_notes() {
        let app = parse(PAGE).unwrap();

        assert_eq!(
            app.description.as_deref(),
            Some("Explore infinite worlds.\nBuild anything. Site")
        );
        let html = app.description_html.unwrap();
        assert!(html.contains(r#"<a href="https://minecraft.net/">Site</a>"#));
        assert!(!html.contains("google.com/url"));
        assert_eq!(app.whatsnew.as_deref(), Some("Bug fixes\n\n- Faster"));
    }

    #[test]
    fn test_extra_info_fields() {
        let app = parse(PAGE).unwrap();

        assert_eq!(app.last_updated.as_deref(), Some("March 5, 2024"));
        assert_eq!(app.size.as_deref(), Some("45M"));
        assert_eq!(app.downloads.as_deref(), Some("10,000,000+"));
        assert_eq!(app.version.as_deref(), Some("1.20.51"));
        assert_eq!(app.supported_os.as_deref(), Some("5.0 and up"));
        assert_eq!(app.content_rating.as_deref(), Some("Rated for 12+"));
    }

    #[test]
    fn test_trailer_and_preview_image() {
        let app = parse(PAGE).unwrap();
        assert_eq!(app.video_link.as_deref(), Some("https://play.google.com/embed/abc?ps=play"));
        assert_eq!(app.video_image.as_deref(), Some("https://play.google.com/trailer-preview.jpg"));
    }

    #[test]
    fn test_minimal_page_degrades_to_empty_fields() {
        let page = r#"<html><head><link rel="alternate" href="https://play.google.com/store/apps/details?id=x"></head>
            <body><img itemprop="image" src="/i.png"><div itemprop="name"><span>X</span></div>
            <span itemprop="offers"><meta itemprop="price" content="0"></span></body></html>"#;
        let app = parse(page).unwrap();

        assert_eq!(app.author, None);
        assert_eq!(app.author_link, None);
        assert!(app.categories.is_empty());
        assert_eq!(app.price, None);
        assert!(app.screenshots.is_empty());
        assert_eq!(app.description, None);
        assert_eq!(app.description_html, None);
        assert_eq!(app.whatsnew, None);
        assert_eq!(app.rating, 0.0);
        assert_eq!(app.votes, 0);
        assert_eq!(app.last_updated, None);
        assert_eq!(app.video_link, None);
        assert_eq!(app.video_image, None);
    }

    #[test]
    fn test_missing_title_is_an_error() {
        let page = r#"<html><head><link rel="alternate" href="/x"></head><body><img itemprop="image" src="/i.png"></body></html>"#;
        assert!(matches!(parse(page), Err(ParsingError::RequiredNodeMissing { .. })));
    }

    #[test]
    fn test_unreadable_rating_is_an_error() {
        let page = PAGE.replace(r#"<div class="BHMmbe">4,5</div>"#, r#"<div class="BHMmbe">n/a</div>"#);
        assert!(matches!(parse(&page), Err(ParsingError::RatingFormat { .. })));
    }
}
