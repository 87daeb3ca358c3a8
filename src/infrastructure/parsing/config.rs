//! Parsing configuration for store pages
//!
//! Centralized CSS selectors for every node shape the parsers depend on.
//! The defaults track the live site; each one can be overridden from the
//! configuration file when the markup drifts.

use serde::{Deserialize, Serialize};

/// All selector groups
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub list: ListSelectors,
    pub search: SearchSelectors,
    pub detail: DetailSelectors,
    pub category: CategorySelectors,
}

/// Selectors for collection listing pages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListSelectors {
    /// Repeated card container; carries the `data-docid` attribute
    pub card: String,
    pub link: String,
    /// Anchor whose `title` attribute is the app title
    pub title: String,
    /// Cover image with a `data-cover-large` attribute
    pub image: String,
    /// Anchor whose `title` attribute is the author
    pub author: String,
    /// Node whose `style` encodes the rating as a width percentage
    pub rating: String,
    pub price: String,
}

impl Default for ListSelectors {
    fn default() -> Self {
        Self {
            card: ".card".to_string(),
            link: "a".to_string(),
            title: "a.title".to_string(),
            image: "img.cover-image".to_string(),
            author: "a.subtitle".to_string(),
            rating: ".current-rating".to_string(),
            price: ".display-price".to_string(),
        }
    }
}

/// Selectors for search result pages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSelectors {
    pub result: String,
    pub link: String,
    pub title: String,
    /// Image with a lazy `data-src` attribute
    pub image: String,
    pub author: String,
    /// Node whose `aria-label` carries the rating
    pub rating: String,
    pub price: String,
}

impl Default for SearchSelectors {
    fn default() -> Self {
        Self {
            result: ".WHE7ib".to_string(),
            link: "a.poRVub".to_string(),
            title: ".b8cIId.ReQCgd.Q9MA7b".to_string(),
            image: "img".to_string(),
            author: ".b8cIId.ReQCgd.KoLSrc a div".to_string(),
            rating: ".pf5lIe [aria-label]".to_string(),
            price: ".VfPpfd.ZdBevf.i5DZme span".to_string(),
        }
    }
}

/// Selectors for application detail pages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailSelectors {
    pub canonical_link: String,
    pub image: String,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub price: String,
    pub screenshot: String,
    pub description: String,
    /// Every description-bearing span; the second one holds the release notes
    pub description_sections: String,
    pub rating: String,
    pub votes: String,
    pub extra_info: String,
    /// Icon that marks the leading family-library fragment
    pub family_library_icon: String,
    /// Labeled sub-node holding the content rating
    pub content_rating: String,
    pub trailer: String,
    /// Preview image searched for in the trailer's nearest enclosing ancestors
    pub trailer_image: String,
}

impl Default for DetailSelectors {
    fn default() -> Self {
        Self {
            canonical_link: r#"link[rel="alternate"]"#.to_string(),
            image: r#"[itemprop="image"]"#.to_string(),
            title: r#"[itemprop="name"] > span"#.to_string(),
            author: "a.hrTbp.R8zArc".to_string(),
            genre: r#"[itemprop="genre"]"#.to_string(),
            price: r#"[itemprop="offers"] > [itemprop="price"]"#.to_string(),
            screenshot: "[data-screenshot-item-index] img".to_string(),
            description: r#"[itemprop="description"] > span > div"#.to_string(),
            description_sections: r#"[itemprop="description"] > span"#.to_string(),
            rating: ".BHMmbe".to_string(),
            votes: ".EymY4b > span[aria-label]".to_string(),
            extra_info: ".hAyfc > .htlgb".to_string(),
            family_library_icon: "div > img:first-child".to_string(),
            content_rating: "div > .htlgb > div".to_string(),
            trailer: "[data-trailer-url]".to_string(),
            trailer_image: "img".to_string(),
        }
    }
}

/// Selectors for the store root page that lists categories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategorySelectors {
    pub link: String,
    /// Regex an href must match to count as a category link
    pub href_pattern: String,
}

impl Default for CategorySelectors {
    fn default() -> Self {
        Self {
            link: ".LNKfBf a".to_string(),
            href_pattern: r"store/apps/category/[A-Z_]+$".to_string(),
        }
    }
}
