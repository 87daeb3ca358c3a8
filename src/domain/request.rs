//! Per-call request parameters: locale context and search filters.

use crate::error::ScraperError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language and country sent as `hl` / `gl` with every request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    pub lang: String,
    pub country: String,
}

impl RequestContext {
    pub fn new(lang: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            country: country.into(),
        }
    }

    /// Apply per-call overrides on top of these defaults.
    pub fn with_overrides(&self, lang: Option<&str>, country: Option<&str>) -> Self {
        Self {
            lang: lang.unwrap_or(&self.lang).to_string(),
            country: country.unwrap_or(&self.country).to_string(),
        }
    }
}

/// Search price filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceFilter {
    #[default]
    All,
    Free,
    Paid,
}

impl PriceFilter {
    const KEYS: [(&'static str, Self); 3] = [("all", Self::All), ("free", Self::Free), ("paid", Self::Paid)];

    /// Value of the `price` query parameter; `None` means the parameter is omitted.
    pub fn query_value(self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::Free => Some("1"),
            Self::Paid => Some("2"),
        }
    }
}

impl FromStr for PriceFilter {
    type Err = ScraperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup("price", s, &Self::KEYS)
    }
}

impl fmt::Display for PriceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(key_of(*self, &Self::KEYS))
    }
}

/// Search rating filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RatingFilter {
    #[default]
    All,
    FourPlus,
}

impl RatingFilter {
    const KEYS: [(&'static str, Self); 2] = [("all", Self::All), ("4+", Self::FourPlus)];

    pub fn query_value(self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::FourPlus => Some("1"),
        }
    }
}

impl FromStr for RatingFilter {
    type Err = ScraperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup("rating", s, &Self::KEYS)
    }
}

impl fmt::Display for RatingFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(key_of(*self, &Self::KEYS))
    }
}

fn lookup<T: Copy>(name: &str, raw: &str, keys: &[(&'static str, T)]) -> Result<T, ScraperError> {
    keys.iter()
        .find(|(key, _)| *key == raw)
        .map(|(_, value)| *value)
        .ok_or_else(|| {
            let valid: Vec<&str> = keys.iter().map(|(key, _)| *key).collect();
            ScraperError::InvalidArgument(format!(
                "\"{name}\" must contain one of the following values: {}",
                valid.join(", ")
            ))
        })
}

fn key_of<T: Copy + PartialEq>(value: T, keys: &[(&'static str, T)]) -> &'static str {
    keys.iter()
        .find(|(_, candidate)| *candidate == value)
        .map_or("", |(key, _)| *key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("all", None)]
    #[case("free", Some("1"))]
    #[case("paid", Some("2"))]
    fn test_price_keys_map_to_query_values(#[case] key: &str, #[case] expected: Option<&str>) {
        let filter: PriceFilter = key.parse().unwrap();
        assert_eq!(filter.query_value(), expected);
        assert_eq!(filter.to_string(), key);
    }

    #[rstest]
    #[case("all", None)]
    #[case("4+", Some("1"))]
    fn test_rating_keys_map_to_query_values(#[case] key: &str, #[case] expected: Option<&str>) {
        let filter: RatingFilter = key.parse().unwrap();
        assert_eq!(filter.query_value(), expected);
        assert_eq!(filter.to_string(), key);
    }

    #[test]
    fn test_unknown_price_lists_valid_keys() {
        let err = "cheap".parse::<PriceFilter>().unwrap_err();
        match err {
            ScraperError::InvalidArgument(message) => {
                assert!(message.ends_with("all, free, paid"), "{message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_rating_is_invalid_argument() {
        assert!(matches!("0".parse::<RatingFilter>(), Err(ScraperError::InvalidArgument(_))));
        assert!(matches!("4".parse::<RatingFilter>(), Err(ScraperError::InvalidArgument(_))));
    }

    #[test]
    fn test_context_overrides() {
        let defaults = RequestContext::new("en", "us");
        assert_eq!(defaults.with_overrides(Some("zh"), None), RequestContext::new("zh", "us"));
        assert_eq!(defaults.with_overrides(None, Some("cn")), RequestContext::new("en", "cn"));
    }
}
