//! Long-form description rendering
//!
//! A description subtree is copied out of the parsed document into a small
//! owned tree (`DescriptionNode`), its outbound links are unwrapped from the
//! Google redirect wrapper, and the result is rendered twice: as markup and
//! as plain text.

use super::{ParsingResult, compile_pattern};
use crate::domain::constants::site::REDIRECT_PREFIX;
use regex::Regex;
use scraper::{ElementRef, Node};
use url::Url;

/// Nested redirect wrappers are unwrapped at most this many times.
pub const MAX_REDIRECT_HOPS: usize = 16;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track", "wbr",
];

/// Owned copy of a document subtree: only text and elements survive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptionNode {
    Text(String),
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
        children: Vec<DescriptionNode>,
    },
}

impl DescriptionNode {
    pub fn element(tag: &str, children: Vec<Self>) -> Self {
        Self::Element {
            tag: tag.to_string(),
            attrs: Vec::new(),
            children,
        }
    }

    pub fn text(text: &str) -> Self {
        Self::Text(text.to_string())
    }

    pub fn from_element(element: ElementRef<'_>) -> Self {
        let children = element
            .children()
            .filter_map(|child| match child.value() {
                Node::Text(text) => Some(Self::Text(String::from(&**text))),
                Node::Element(_) => ElementRef::wrap(child).map(Self::from_element),
                _ => None,
            })
            .collect();

        Self::Element {
            tag: element.value().name().to_string(),
            attrs: element
                .value()
                .attrs()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            children,
        }
    }

    /// Rewrite every anchor `href` out of the redirect wrapper.
    pub fn unwrap_links(&mut self) {
        if let Self::Element { tag, attrs, children } = self {
            if tag.as_str() == "a" {
                for (name, value) in attrs.iter_mut() {
                    if name.as_str() == "href" {
                        *value = unwrap_redirect(value);
                    }
                }
            }
            for child in children {
                child.unwrap_links();
            }
        }
    }

    /// Serialized markup of the children (inner HTML).
    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        if let Self::Element { children, .. } = self {
            for child in children {
                child.write_html(&mut out);
            }
        }
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(&escape(text, false)),
            Self::Element { tag, attrs, children } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape(value, true));
                    out.push('"');
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&tag.as_str()) {
                    return;
                }
                for child in children {
                    child.write_html(out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

/// Follow nested `https://www.google.com/url?q=...` wrappers to the real target.
pub fn unwrap_redirect(href: &str) -> String {
    let mut current = href.to_string();
    for _ in 0..MAX_REDIRECT_HOPS {
        if !current.starts_with(REDIRECT_PREFIX) {
            break;
        }
        let target = Url::parse(&current).ok().and_then(|url| {
            url.query_pairs()
                .find(|(key, _)| *key == "q")
                .map(|(_, value)| value.into_owned())
        });
        match target {
            Some(target) => current = target,
            None => break,
        }
    }
    current
}

fn escape(raw: &str, attribute: bool) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '\u{a0}' => escaped.push_str("&nbsp;"),
            '"' if attribute => escaped.push_str("&quot;"),
            '<' if !attribute => escaped.push_str("&lt;"),
            '>' if !attribute => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Paired markup and plain-text renderings of a description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDescription {
    pub html: String,
    pub text: String,
}

pub struct DescriptionRenderer {
    whitespace: Regex,
    blank_lines: Regex,
}

impl DescriptionRenderer {
    pub fn new() -> ParsingResult<Self> {
        Ok(Self {
            whitespace: compile_pattern(r"[ \t\n\x0B\x0C\r]+")?,
            blank_lines: compile_pattern(r"\n{3,}")?,
        })
    }

    pub fn render(&self, element: ElementRef<'_>) -> RenderedDescription {
        let mut tree = DescriptionNode::from_element(element);
        tree.unwrap_links();
        self.render_tree(&tree)
    }

    pub fn render_tree(&self, tree: &DescriptionNode) -> RenderedDescription {
        let text = self.to_text(tree);
        let text = self.blank_lines.replace_all(&text, "\n\n");
        RenderedDescription {
            html: tree.inner_html(),
            text: text.trim().to_string(),
        }
    }

    fn to_text(&self, node: &DescriptionNode) -> String {
        match node {
            DescriptionNode::Text(text) => self.whitespace.replace_all(text, " ").into_owned(),
            DescriptionNode::Element { tag, children, .. } => {
                let inner: String = children.iter().map(|child| self.to_text(child)).collect();
                match tag.as_str() {
                    "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "p" | "ul" | "div" => format!("\n\n{inner}\n\n"),
                    "li" => format!("- {inner}\n"),
                    "br" => format!("{inner}\n"),
                    _ => inner,
                }
            }
        }
    }
}
