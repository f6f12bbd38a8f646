//! HTML parser for extracting outbound links
//!
//! This module handles parsing HTML content to extract:
//! - Navigational links (from `<a href>` tags), in document order
//! - Page title, for log output
//!
//! Parsing is permissive: malformed markup yields whatever links the
//! tokenizer recovers, never an error.

use crate::url::has_web_scheme;
use html5ever::driver::{self, ParseOpts};
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use scraper::{Html, Selector};
use url::Url;

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    /// The page title (from <title> tag)
    pub title: Option<String>,

    /// Outbound links in document order, duplicates kept
    pub links: Vec<String>,
}

/// Parses HTML content and extracts links and title
///
/// # Link Extraction Rules
///
/// Each `<a href>` is checked in this order:
///
/// 1. `http`/`https` scheme: included exactly as written, without checking
///    the rest of the URL
/// 2. Empty href: excluded
/// 3. Any `#` in the href: excluded (treated as same-page noise, even when
///    it points at another page)
/// 4. `javascript:` href: excluded
/// 5. Anything else: resolved against `base_url` and included
///
/// Duplicates are not removed here; the frontier decides what to queue.
///
/// # Example
///
/// ```
/// use sumi_crawl::crawler::parse_html;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let parsed = parse_html("https://example.com/", html);
/// assert_eq!(parsed.title, Some("Test".to_string()));
/// assert_eq!(parsed.links, vec!["https://example.com/page".to_string()]);
/// ```
pub fn parse_html(base_url: &str, html: &str) -> ParsedPage {
    let document = parse_document(html);

    let title = extract_title(&document);

    let base = match Url::parse(base_url) {
        Ok(base) => Some(base),
        Err(e) => {
            tracing::debug!(
                "Base URL {} does not parse ({}); relative links will be dropped",
                base_url,
                e
            );
            None
        }
    };
    let links = collect_links(&document, base.as_ref());

    ParsedPage { title, links }
}

/// Builds the DOM with scripting disabled
///
/// With scripting on, `<noscript>` content is a raw text blob and the
/// fallback links inside it never become elements.
fn parse_document(html: &str) -> Html {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            scripting_enabled: false,
            ..Default::default()
        },
        ..Default::default()
    };

    driver::parse_document(Html::new_document(), opts).one(html)
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Collects every link that survives the filtering rules, in document order
fn collect_links(document: &Html, base: Option<&Url>) -> Vec<String> {
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(link) = resolve_link(href, base) {
                    links.push(link);
                }
            }
        }
    }

    links
}

/// Applies the filtering rules to one href
fn resolve_link(href: &str, base: Option<&Url>) -> Option<String> {
    if has_web_scheme(href) {
        return Some(href.to_string());
    }

    if href.is_empty() || href.contains('#') || href.starts_with("javascript:") {
        return None;
    }

    base?.join(href).ok().map(String::from)
}

/// Convenience function for extracting just the links from HTML
///
/// # Arguments
///
/// * `base_url` - The URL the document was fetched from
/// * `html` - The decoded HTML content
///
/// # Returns
///
/// Absolute URLs in document order
pub fn extract_links(base_url: &str, html: &str) -> Vec<String> {
    parse_html(base_url, html).links
}
