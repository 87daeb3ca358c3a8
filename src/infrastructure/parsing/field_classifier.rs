//! Extra-info field classifier
//!
//! The detail page shows a short run of untagged "extra info" fragments.
//! Their meaning is inferred from content shape: rules are tried in a fixed
//! priority order per fragment, and each field is claimed at most once.

use super::{ParsingResult, compile_pattern};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// At most this many fragments are examined after the family-library skip.
pub const MAX_FRAGMENTS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExtraInfoField {
    LastUpdated,
    Size,
    Downloads,
    Version,
    SupportedOs,
    ContentRating,
}

/// One untagged fragment as found in the page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtraInfoFragment {
    pub text: String,
    /// Text of the nested labeled sub-node, when the fragment has one
    pub labeled_text: Option<String>,
    /// Icon-only marker (the family-library badge)
    pub icon_only: bool,
}

impl ExtraInfoFragment {
    pub fn text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Self::default()
        }
    }
}

/// Classified values; `None` for slots no fragment claimed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtraInfo {
    pub last_updated: Option<String>,
    pub size: Option<String>,
    pub downloads: Option<String>,
    pub version: Option<String>,
    pub supported_os: Option<String>,
    pub content_rating: Option<String>,
}

impl ExtraInfo {
    fn slot(&mut self, field: ExtraInfoField) -> &mut Option<String> {
        match field {
            ExtraInfoField::LastUpdated => &mut self.last_updated,
            ExtraInfoField::Size => &mut self.size,
            ExtraInfoField::Downloads => &mut self.downloads,
            ExtraInfoField::Version => &mut self.version,
            ExtraInfoField::SupportedOs => &mut self.supported_os,
            ExtraInfoField::ContentRating => &mut self.content_rating,
        }
    }

    pub fn get(&self, field: ExtraInfoField) -> Option<&str> {
        match field {
            ExtraInfoField::LastUpdated => self.last_updated.as_deref(),
            ExtraInfoField::Size => self.size.as_deref(),
            ExtraInfoField::Downloads => self.downloads.as_deref(),
            ExtraInfoField::Version => self.version.as_deref(),
            ExtraInfoField::SupportedOs => self.supported_os.as_deref(),
            ExtraInfoField::ContentRating => self.content_rating.as_deref(),
        }
    }
}

enum Matcher {
    /// Fragment text matches; the text itself is the value
    Pattern(Regex),
    /// Fragment has a labeled sub-node; its text is the value
    LabeledSubNode,
}

struct ClassifierRule {
    field: ExtraInfoField,
    matcher: Matcher,
}

impl ClassifierRule {
    fn claim(&self, text: &str, fragment: &ExtraInfoFragment) -> Option<String> {
        match &self.matcher {
            Matcher::Pattern(pattern) => pattern.is_match(text).then(|| text.to_string()),
            Matcher::LabeledSubNode => fragment.labeled_text.clone(),
        }
    }
}

pub struct FieldClassifier {
    rules: Vec<ClassifierRule>,
}

impl FieldClassifier {
    pub fn new() -> ParsingResult<Self> {
        let pattern = |field, source: &str| -> ParsingResult<ClassifierRule> {
            Ok(ClassifierRule {
                field,
                matcher: Matcher::Pattern(compile_pattern(source)?),
            })
        };

        Ok(Self {
            rules: vec![
                pattern(ExtraInfoField::LastUpdated, r"20\d\d")?,
                pattern(ExtraInfoField::Size, r"^[\d,. ]+[MG]$")?,
                pattern(ExtraInfoField::Downloads, r"^[\d,. ]+\+$")?,
                pattern(ExtraInfoField::Version, r"^[\d.]+$")?,
                pattern(ExtraInfoField::SupportedOs, r"^(\d+\.)+\d+.+$")?,
                ClassifierRule {
                    field: ExtraInfoField::ContentRating,
                    matcher: Matcher::LabeledSubNode,
                },
            ],
        })
    }

    /// Fields in the order their rules are evaluated
    pub fn priority(&self) -> Vec<ExtraInfoField> {
        self.rules.iter().map(|rule| rule.field).collect()
    }

    pub fn classify(&self, fragments: &[ExtraInfoFragment]) -> ExtraInfo {
        let skip = usize::from(fragments.first().is_some_and(|f| f.icon_only));
        let mut info = ExtraInfo::default();

        for fragment in fragments.iter().skip(skip).take(MAX_FRAGMENTS) {
            let text = fold_spaces(&fragment.text);
            for rule in &self.rules {
                let slot = info.slot(rule.field);
                if slot.is_some() {
                    continue;
                }
                if let Some(value) = rule.claim(&text, fragment) {
                    *slot = Some(value);
                    break;
                }
            }
        }

        info
    }
}

/// Fold non-breaking spaces into regular ones and collapse whitespace runs.
fn fold_spaces(text: &str) -> String {
    text.replace('\u{a0}', " ")
        .split(|c: char| c.is_ascii_whitespace())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> FieldClassifier {
        FieldClassifier::new().unwrap()
    }

    fn labeled(text: &str, label: &str) -> ExtraInfoFragment {
        ExtraInfoFragment {
            text: text.to_string(),
            labeled_text: Some(label.to_string()),
            icon_only: false,
        }
    }

    #[test]
    fn test_rule_priority() {
        assert_eq!(
            classifier().priority(),
            vec![
                ExtraInfoField::LastUpdated,
                ExtraInfoField::Size,
                ExtraInfoField::Downloads,
                ExtraInfoField::Version,
                ExtraInfoField::SupportedOs,
                ExtraInfoField::ContentRating,
            ]
        );
    }

    #[test]
    fn test_typical_run_is_classified() {
        let fragments = vec![
            ExtraInfoFragment::text("March 5, 2024"),
            ExtraInfoFragment::text("45M"),
            ExtraInfoFragment::text("100,000,000+"),
            ExtraInfoFragment::text("1.20.51"),
            ExtraInfoFragment::text("5.0\u{a0}and up"),
            labeled("Rated for 12+ Learn more", "Rated for 12+"),
        ];
        let info = classifier().classify(&fragments);

        assert_eq!(info.last_updated.as_deref(), Some("March 5, 2024"));
        assert_eq!(info.size.as_deref(), Some("45M"));
        assert_eq!(info.downloads.as_deref(), Some("100,000,000+"));
        assert_eq!(info.version.as_deref(), Some("1.20.51"));
        assert_eq!(info.supported_os.as_deref(), Some("5.0 and up"));
        assert_eq!(info.content_rating.as_deref(), Some("Rated for 12+"));
    }

    #[test]
    fn test_family_library_marker_is_skipped() {
        let marker = ExtraInfoFragment {
            text: String::new(),
            labeled_text: Some("Family Library".to_string()),
            icon_only: true,
        };
        let fragments = vec![marker, labeled("Teen", "Teen")];
        let info = classifier().classify(&fragments);
        assert_eq!(info.content_rating.as_deref(), Some("Teen"));
    }

    #[test]
    fn test_first_match_wins() {
        let fragments = vec![
            ExtraInfoFragment::text("January 1, 2023"),
            ExtraInfoFragment::text("June 2, 2024"),
            ExtraInfoFragment::text("12M"),
            ExtraInfoFragment::text("3.1G"),
        ];
        let info = classifier().classify(&fragments);
        assert_eq!(info.last_updated.as_deref(), Some("January 1, 2023"));
        assert_eq!(info.size.as_deref(), Some("12M"));
    }

    #[test]
    fn test_filled_slot_falls_through_to_next_rule() {
        // "2.0" is a version; once version is taken, "4.4 and up" still lands in supported_os
        let fragments = vec![
            ExtraInfoFragment::text("2.0"),
            ExtraInfoFragment::text("3.0"),
            ExtraInfoFragment::text("4.4 and up"),
        ];
        let info = classifier().classify(&fragments);
        assert_eq!(info.version.as_deref(), Some("2.0"));
        assert_eq!(info.supported_os.as_deref(), Some("4.4 and up"));
        assert_eq!(info.get(ExtraInfoField::Size), None);
    }

    #[test]
    fn test_unmatched_fragments_are_ignored() {
        let fragments = vec![
            ExtraInfoFragment::text("Varies with device"),
            ExtraInfoFragment::text("Offers in-app purchases"),
        ];
        assert_eq!(classifier().classify(&fragments), ExtraInfo::default());
    }

    #[test]
    fn test_fragments_beyond_six_are_ignored() {
        let mut fragments: Vec<_> = (0..6).map(|_| ExtraInfoFragment::text("n/a")).collect();
        fragments.push(ExtraInfoFragment::text("10M"));
        assert_eq!(classifier().classify(&fragments).size, None);
    }
}
