use scraper::{ElementRef, Selector};
use std::collections::HashSet;
use tracing::debug;
use url::Url;

/// Collapses every whitespace run to a single space and trims both ends
pub fn clean_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Like [`clean_text`], but an empty result becomes `None`
pub fn clean_opt(raw: &str) -> Option<String> {
    let cleaned = clean_text(raw);
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Resolves `reference` against `base`. Blank references resolve to nothing.
pub fn resolve_url(base: &Url, reference: &str) -> Option<String> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }
    match base.join(reference) {
        Ok(url) => Some(url.to_string()),
        Err(e) => {
            debug!("Could not resolve '{}' against {}: {}", reference, base, e);
            None
        }
    }
}

/// Concatenated text of an element
pub fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>()
}

/// Text of an element with text nodes joined by single spaces, skipping any
/// subtree matched by `exclude`.
pub fn element_text_excluding(element: &ElementRef, exclude: Option<&Selector>) -> String {
    let excluded: HashSet<_> = exclude
        .map(|selector| element.select(selector).map(|e| e.id()).collect())
        .unwrap_or_default();

    let mut parts: Vec<&str> = Vec::new();
    for node in element.descendants() {
        if let Some(text) = node.value().as_text() {
            let hidden = node.ancestors().any(|ancestor| excluded.contains(&ancestor.id()));
            if !hidden {
                parts.push(text);
            }
        }
    }
    parts.join(" ")
}
