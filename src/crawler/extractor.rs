//! HTML extraction
//!
//! Turns raw markup into the structured facts the link graph is built from:
//! title, head metadata, headings, flattened body text with a content hash,
//! anchors (with broken-link classification) and image references.
//!
//! Extraction is a pure function of (URL, markup, scope): re-running it on
//! identical input yields identical output. The underlying html5ever parser
//! is error-tolerant, so malformed markup degrades to partial facts rather
//! than failure.

use crate::records::{BrokenLink, ImageRef, LinkRecord};
use crate::url::{normalize_url, CrawlScope};
use scraper::{ElementRef, Html, Selector};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use url::Url;

/// Tags whose subtrees are excluded from body text extraction
const EXCLUDED_TEXT_TAGS: &[&str] = &["script", "style", "nav", "footer", "header"];

/// Maximum number of H2 headings kept per page
const MAX_H2: usize = 20;

/// Maximum stored body text length, in characters. Word count is computed on
/// the uncapped text *before* this cap is applied.
const CONTENT_CAP: usize = 10_000;

/// Maximum number of external link URLs stored per page
const MAX_EXTERNAL_LINKS: usize = 50;

/// Everything extracted from one page's markup
#[derive(Debug, Clone)]
pub struct ExtractedPage {
    pub title: String,
    pub meta_description: String,
    pub canonical: String,
    pub h1: Vec<String>,
    pub h2: Vec<String>,

    /// Flattened body text, capped at [`CONTENT_CAP`] characters
    pub content: String,

    /// Word count of the uncapped flattened text
    pub word_count: usize,

    /// Hex SHA-256 of the uncapped flattened text
    pub content_hash: String,

    /// Every anchor with an href, in document order
    pub links: Vec<LinkRecord>,

    /// Normalized in-scope internal link targets, deduplicated per page,
    /// first-occurrence document order. Not yet filtered against the visited
    /// set; that is the link graph's job.
    pub internal_candidates: Vec<Url>,

    /// External link URLs in document order, capped at [`MAX_EXTERNAL_LINKS`]
    pub external_links: Vec<String>,

    pub broken_links: Vec<BrokenLink>,

    pub images: Vec<ImageRef>,
}

/// Parses markup fetched from `page_url` and extracts structured facts
pub fn extract_page(page_url: &Url, html: &str, scope: &CrawlScope) -> ExtractedPage {
    let document = Html::parse_document(html);

    let title = select_first_text(&document, "title");
    let meta_description = select_attr(&document, "meta[name=\"description\"]", "content");

    let canonical = {
        let href = select_attr(&document, "link[rel=\"canonical\"]", "href");
        if href.is_empty() {
            String::new()
        } else {
            page_url
                .join(&href)
                .map(|u| u.to_string())
                .unwrap_or(href)
        }
    };

    let h1 = select_all_text(&document, "h1");
    let mut h2 = select_all_text(&document, "h2");
    h2.truncate(MAX_H2);

    let flattened = flatten_text(&document);
    let word_count = flattened.split_whitespace().count();
    let content_hash = hex::encode(Sha256::digest(flattened.as_bytes()));
    let content: String = flattened.chars().take(CONTENT_CAP).collect();

    let page_ids = collect_anchor_targets(&document);

    let mut links = Vec::new();
    let mut internal_candidates: Vec<Url> = Vec::new();
    let mut seen_candidates = HashSet::new();
    let mut external_links = Vec::new();
    let mut broken_links = Vec::new();

    if let Ok(anchor_selector) = Selector::parse("a[href]") {
        for element in document.select(&anchor_selector) {
            let href = element.value().attr("href").unwrap_or_default();
            let anchor_text = element.text().collect::<String>().trim().to_string();
            let link_title = element.value().attr("title").unwrap_or_default().to_string();

            // An empty href resolves to the page itself, mirroring urljoin
            let resolved = match page_url.join(href) {
                Ok(url) => url,
                Err(_) => continue,
            };

            let internal = scope.is_internal(&resolved);

            let record = LinkRecord {
                url: resolved.to_string(),
                href: href.to_string(),
                anchor_text: anchor_text.clone(),
                title: link_title,
                is_untitled: anchor_text.is_empty(),
                internal,
                source_page: page_url.to_string(),
                location: element_location(element),
            };

            if internal {
                let normalized = normalize_url(&resolved);
                if scope.in_scope(&normalized)
                    && seen_candidates.insert(normalized.to_string())
                {
                    internal_candidates.push(normalized);
                }
            } else {
                external_links.push(resolved.to_string());
            }

            if let Some(broken) = classify_broken(&record, href, &page_ids) {
                broken_links.push(broken);
            }

            links.push(record);
        }
    }

    external_links.truncate(MAX_EXTERNAL_LINKS);

    let images = extract_images(&document, page_url);

    ExtractedPage {
        title,
        meta_description,
        canonical,
        h1,
        h2,
        content,
        word_count,
        content_hash,
        links,
        internal_candidates,
        external_links,
        broken_links,
        images,
    }
}

/// Classifies an anchor as broken, if it is
///
/// An empty href is always broken. An in-page anchor (`#target`) is broken
/// only if no element on the page carries that id or name. Scheme links
/// (javascript:, mailto:, tel:) are not followed but are not broken.
fn classify_broken(
    record: &LinkRecord,
    href: &str,
    page_ids: &HashSet<String>,
) -> Option<BrokenLink> {
    if href.is_empty() {
        return Some(BrokenLink {
            link: record.clone(),
            issue: "Empty href".to_string(),
            reason: "Link has no href attribute".to_string(),
        });
    }

    if let Some(target) = href.strip_prefix('#') {
        if !page_ids.contains(target) {
            return Some(BrokenLink {
                link: record.clone(),
                issue: "Broken anchor link".to_string(),
                reason: format!("Target '{}' not found on page", target),
            });
        }
    }

    None
}

/// Collects every id and name attribute on the page, for in-page anchor checks
fn collect_anchor_targets(document: &Html) -> HashSet<String> {
    let mut targets = HashSet::new();
    if let Ok(selector) = Selector::parse("[id], [name]") {
        for element in document.select(&selector) {
            if let Some(id) = element.value().attr("id") {
                targets.insert(id.to_string());
            }
            if let Some(name) = element.value().attr("name") {
                targets.insert(name.to_string());
            }
        }
    }
    targets
}

fn extract_images(document: &Html, page_url: &Url) -> Vec<ImageRef> {
    let mut images = Vec::new();
    if let Ok(selector) = Selector::parse("img") {
        for element in document.select(&selector) {
            // src first, then the common lazy-load fallbacks
            let src = ["src", "data-src", "data-lazy-src"]
                .iter()
                .filter_map(|attr| element.value().attr(attr))
                .find(|value| !value.is_empty());

            let Some(src) = src else { continue };
            let Ok(resolved) = page_url.join(src) else { continue };

            images.push(ImageRef {
                url: resolved.to_string(),
                alt: element.value().attr("alt").unwrap_or_default().to_string(),
                page_url: page_url.to_string(),
            });
        }
    }
    images
}

/// Flattens the document's visible text to a whitespace-joined string,
/// skipping [`EXCLUDED_TEXT_TAGS`] subtrees
fn flatten_text(document: &Html) -> String {
    let mut parts = Vec::new();
    collect_text(document.root_element(), &mut parts);
    parts.join(" ")
}

fn collect_text(element: ElementRef, parts: &mut Vec<String>) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            if EXCLUDED_TEXT_TAGS.contains(&child_element.value().name()) {
                continue;
            }
            collect_text(child_element, parts);
        } else if let Some(text) = child.value().as_text() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                parts.push(trimmed.to_string());
            }
        }
    }
}

/// Approximate source location of an element: the parent tag name
fn element_location(element: ElementRef) -> String {
    element
        .parent()
        .and_then(|parent| parent.value().as_element().map(|e| e.name().to_string()))
        .map(|name| format!("In <{}> tag", name))
        .unwrap_or_else(|| "Unknown location".to_string())
}

fn select_first_text(document: &Html, selector: &str) -> String {
    Selector::parse(selector)
        .ok()
        .and_then(|sel| {
            document
                .select(&sel)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string())
        })
        .unwrap_or_default()
}

fn select_all_text(document: &Html, selector: &str) -> Vec<String> {
    Selector::parse(selector)
        .ok()
        .map(|sel| {
            document
                .select(&sel)
                .map(|el| el.text().collect::<String>().trim().to_string())
                .collect()
        })
        .unwrap_or_default()
}

fn select_attr(document: &Html, selector: &str, attr: &str) -> String {
    Selector::parse(selector)
        .ok()
        .and_then(|sel| {
            document
                .select(&sel)
                .next()
                .and_then(|el| el.value().attr(attr).map(str::to_string))
        })
        .unwrap_or_default()
}
