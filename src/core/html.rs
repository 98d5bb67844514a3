// src/core/html.rs
//
// Visible text and link targets of a fetched page.
// Parsing is tolerant: html5ever recovers from any markup, so extraction
// cannot fail. Garbage in gives little or no text out.

use scraper::{ElementRef, Html, Node};
use url::Url;

use super::sanitize::normalize_ws;

/// Elements whose text is never shown to a reader.
const HIDDEN: &[&str] = &["script", "style", "noscript", "template"];

fn is_hidden(el: &scraper::node::Element) -> bool {
    HIDDEN.contains(&el.name())
}

/// Visible text of an HTML document, whitespace-collapsed.
///
/// Text nodes are joined with a single space so that adjacent blocks
/// (`<p>One.</p><p>Two.</p>`) keep a sentence boundary between them.
pub fn extract_text(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }
    let doc = Html::parse_document(html);

    let mut out = String::with_capacity(html.len() / 2);
    for node in doc.root_element().descendants() {
        let Node::Text(text) = node.value() else { continue };
        let hidden = node
            .ancestors()
            .any(|a| a.value().as_element().is_some_and(is_hidden));
        if hidden {
            continue;
        }
        out.push_str(text);
        out.push(' ');
    }
    normalize_ws(&out)
}

/// Absolute http(s) targets of `<a href>` in document order, fragments removed.
/// Unparseable hrefs are skipped.
pub fn extract_links(html: &str, base: &Url) -> Vec<Url> {
    let doc = Html::parse_document(html);
    doc.root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "a")
        .filter_map(|el| el.value().attr("href"))
        .filter_map(|href| base.join(href.trim()).ok())
        .filter(|u| matches!(u.scheme(), "http" | "https"))
        .map(|mut u| {
            u.set_fragment(None);
            u
        })
        .collect()
}

/// Same host and port, http(s) only.
pub fn same_site(url: &Url, base: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
        && url.host_str() == base.host_str()
        && url.port_or_known_default() == base.port_or_known_default()
}
