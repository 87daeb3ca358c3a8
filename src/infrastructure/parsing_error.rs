//! Parsing error types for store pages
//!
//! Each variant carries enough context to locate the part of the document
//! contract that no longer holds.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParsingError {
    #[error("Required node '{selector}' not found in {context}")]
    RequiredNodeMissing { selector: String, context: String },

    #[error("Required attribute '{attribute}' missing on '{selector}'")]
    RequiredAttributeMissing { selector: String, attribute: String },

    #[error("Error parsing rating: {value:?}")]
    RatingFormat { value: String },

    #[error("Error parsing {field}: {value:?}")]
    NumberFormat { field: String, value: String },

    #[error("URL resolution failed: {url} - {reason}")]
    UrlResolutionFailed { url: String, reason: String },

    #[error("Invalid CSS selector: {selector} - {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Invalid pattern: {pattern} - {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl ParsingError {
    pub fn required_node_missing(selector: &str, context: &str) -> Self {
        Self::RequiredNodeMissing {
            selector: selector.to_string(),
            context: context.to_string(),
        }
    }

    pub fn required_attribute_missing(selector: &str, attribute: &str) -> Self {
        Self::RequiredAttributeMissing {
            selector: selector.to_string(),
            attribute: attribute.to_string(),
        }
    }

    pub fn rating_format(value: &str) -> Self {
        Self::RatingFormat {
            value: value.to_string(),
        }
    }

    pub fn number_format(field: &str, value: &str) -> Self {
        Self::NumberFormat {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;
