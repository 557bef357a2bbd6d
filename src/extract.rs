//! Generic HTML-to-text extraction.
//!
//! One algorithm serves every site scraper: locate the page's main content
//! region using ranked site-specific selector hints (falling back to the
//! largest text block in the document), then walk the region's nodes in
//! document order emitting plain text. Hyperlinks survive as inline
//! `[text](url)` markers with hrefs resolved against the page URL; list
//! items, blockquotes and preformatted blocks keep a light textual shape.
//! Consecutive whitespace is collapsed and no raw markup reaches the output.

use crate::error::{Result, ScrapeError};
use scraper::{ElementRef, Html, Node, Selector};
use tracing::debug;
use url::Url;

/// Site-specific hints steering the shared extraction algorithm.
///
/// `content_selectors` is a ranked list: the first selector matching an
/// element with substantial text wins. `skip_classes` names boilerplate
/// class fragments (navigation chrome, share buttons) pruned from the walk.
#[derive(Debug, Clone, Copy)]
pub struct ExtractHints {
    pub content_selectors: &'static [&'static str],
    pub title_selector: Option<&'static str>,
    pub skip_classes: &'static [&'static str],
}

/// Extracted fields for one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageContent {
    pub title: Option<String>,
    pub body: String,
}

/// Subtrees never worth walking, regardless of site.
const SKIP_TAGS: &[&str] = &[
    "script", "style", "noscript", "nav", "header", "footer", "aside", "form", "svg", "iframe",
    "button",
];

/// A hint selector must match this much text before it is trusted, so that
/// empty template shells don't shadow the real content region.
const MIN_HINT_TEXT: usize = 80;

/// Extract title and body text from a page.
///
/// Returns [`ScrapeError::NoContentRegion`] when no element in the document
/// holds any text at all (empty or fully malformed page).
pub fn extract(html: &str, base_url: &Url, hints: &ExtractHints) -> Result<PageContent> {
    let doc = Html::parse_document(html);

    let region = locate_region(&doc, hints).ok_or(ScrapeError::NoContentRegion)?;

    let mut raw = String::new();
    walk(region, base_url, hints.skip_classes, &mut raw);
    let body = collapse(&raw);
    if body.is_empty() {
        return Err(ScrapeError::NoContentRegion);
    }

    let title = extract_title(&doc, hints);
    debug!(bytes = body.len(), title = ?title, "Extracted page content");
    Ok(PageContent { title, body })
}

/// Collect every hyperlink in the document, resolved to absolute URLs.
/// Used by the scrape loop for link discovery on listing pages.
pub fn discover_links(html: &str, base_url: &Url) -> Vec<Url> {
    let doc = Html::parse_document(html);
    let selector = Selector::parse("a[href]").unwrap();
    doc.select(&selector)
        .filter_map(|el| el.value().attr("href"))
        .filter_map(|href| base_url.join(href).ok())
        .collect()
}

/// Find the target of a next-page link matching `selector`, if present.
pub fn find_next_link(html: &str, base_url: &Url, selector: &str) -> Option<Url> {
    let doc = Html::parse_document(html);
    let selector = Selector::parse(selector).ok()?;
    doc.select(&selector)
        .filter_map(|el| el.value().attr("href"))
        .filter_map(|href| base_url.join(href).ok())
        .next()
}

fn extract_title(doc: &Html, hints: &ExtractHints) -> Option<String> {
    let candidates = hints
        .title_selector
        .iter()
        .copied()
        .chain(["h1", "title"]);
    for sel in candidates {
        let Ok(selector) = Selector::parse(sel) else {
            continue;
        };
        if let Some(el) = doc.select(&selector).next() {
            let text: String = el.text().collect::<Vec<_>>().join(" ");
            let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

fn locate_region<'a>(doc: &'a Html, hints: &ExtractHints) -> Option<ElementRef<'a>> {
    for sel in hints.content_selectors {
        let Ok(selector) = Selector::parse(sel) else {
            continue;
        };
        if let Some(el) = doc.select(&selector).find(|el| text_len(*el) >= MIN_HINT_TEXT) {
            return Some(el);
        }
    }

    // Whole-document heuristic: the first element (document order) carrying
    // the most text. The outermost container wins ties by construction.
    let selector = Selector::parse("main, article, section, div, body").unwrap();
    let mut best: Option<(usize, ElementRef<'a>)> = None;
    for el in doc.select(&selector) {
        let len = text_len(el);
        if len > best.map_or(0, |(l, _)| l) {
            best = Some((len, el));
        }
    }
    best.map(|(_, el)| el)
}

fn text_len(el: ElementRef<'_>) -> usize {
    el.text().map(|t| t.trim().len()).sum()
}

fn has_skip_class(el: ElementRef<'_>, skip_classes: &[&str]) -> bool {
    el.value()
        .attr("class")
        .map(|classes| {
            classes
                .split_whitespace()
                .any(|c| skip_classes.iter().any(|skip| c.contains(skip)))
        })
        .unwrap_or(false)
}

/// Walk an element's children in document order, appending text to `out`.
/// Block-level elements contribute newlines; `collapse` tidies them later.
fn walk(el: ElementRef<'_>, base_url: &Url, skip_classes: &[&str], out: &mut String) {
    for child in el.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => {
                let Some(child_el) = ElementRef::wrap(child) else {
                    continue;
                };
                let name = element.name();
                if SKIP_TAGS.contains(&name) || has_skip_class(child_el, skip_classes) {
                    continue;
                }
                match name {
                    "a" => out.push_str(&link_marker(child_el, base_url)),
                    "li" => {
                        out.push_str("\n- ");
                        walk(child_el, base_url, skip_classes, out);
                        out.push('\n');
                    }
                    "blockquote" => {
                        out.push_str("\n> ");
                        walk(child_el, base_url, skip_classes, out);
                        out.push('\n');
                    }
                    "pre" => {
                        let code: String = child_el.text().collect();
                        let code = code.trim();
                        if !code.is_empty() {
                            out.push_str("\n```\n");
                            out.push_str(code);
                            out.push_str("\n```\n");
                        }
                    }
                    "br" => out.push('\n'),
                    "td" | "th" => {
                        walk(child_el, base_url, skip_classes, out);
                        out.push('\t');
                    }
                    "p" | "div" | "section" | "table" | "tr" | "ul" | "ol" | "h1" | "h2"
                    | "h3" | "h4" | "h5" | "h6" => {
                        out.push('\n');
                        walk(child_el, base_url, skip_classes, out);
                        out.push('\n');
                    }
                    _ => walk(child_el, base_url, skip_classes, out),
                }
            }
            _ => {}
        }
    }
}

/// Render a hyperlink as an inline `[text](url)` marker. Links without text
/// vanish; links whose href cannot resolve keep their text only.
fn link_marker(el: ElementRef<'_>, base_url: &Url) -> String {
    let text: String = el.text().collect::<Vec<_>>().join(" ");
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let Some(href) = el.value().attr("href") else {
        return text;
    };
    match base_url.join(href) {
        Ok(resolved) if !text.is_empty() => format!("[{text}]({resolved})"),
        _ => text,
    }
}

/// Collapse consecutive whitespace: runs of spaces become one space, blank
/// lines disappear, block boundaries become single newlines.
fn collapse(raw: &str) -> String {
    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
