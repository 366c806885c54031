//! Text and URL extraction
//!
//! Normalizes an element into the text surface the pattern lists are tested
//! against, and into a navigable URL.

use crate::dom::{Document, ElementId};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// `location.href = '...'` / `window.location = '...'` inside an inline handler
static ONCLICK_LOCATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:window\.|document\.)?location(?:\.href)?\s*=\s*['"]([^'"]+)['"]"#).unwrap()
});

/// Data attributes that commonly carry a destination
const DATA_URL_ATTRIBUTES: &[&str] = &["data-href", "data-url", "data-link"];

/// Own text plus `title`, `alt` and `value`, whitespace-joined and trimmed
pub fn extract_text(doc: &dyn Document, element: ElementId) -> String {
    let text = doc.text_content(element);
    let mut parts = vec![text.trim().to_string()];
    for attr in ["title", "alt", "value"] {
        if let Some(value) = doc.attribute(element, attr) {
            parts.push(value.trim().to_string());
        }
    }
    parts.retain(|p| !p.is_empty());
    parts.join(" ")
}

/// Navigable URL for the element, if one resolves
///
/// Order: native `href`, then `data-href` / `data-url` / `data-link`, then a
/// location assignment inside `onclick`.
pub fn extract_url(doc: &dyn Document, element: ElementId) -> Option<String> {
    if let Some(href) = doc.href(element) {
        if is_navigable(&href, &doc.location()) {
            return Some(href);
        }
    }

    for attr in DATA_URL_ATTRIBUTES {
        if let Some(url) = doc
            .attribute(element, attr)
            .and_then(|raw| resolve(doc, &raw))
        {
            return Some(url);
        }
    }

    doc.attribute(element, "onclick")
        .and_then(|handler| {
            ONCLICK_LOCATION
                .captures(&handler)
                .map(|caps| caps[1].to_string())
        })
        .and_then(|raw| resolve(doc, &raw))
}

/// Resolve a raw attribute value against the document location
fn resolve(doc: &dyn Document, raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let location = doc.location();
    let resolved = match Url::parse(&location) {
        Ok(base) => base.join(raw).ok()?,
        Err(_) => Url::parse(raw).ok()?,
    };
    let resolved = resolved.to_string();
    is_navigable(&resolved, &location).then_some(resolved)
}

/// `javascript:` URLs and same-page fragment links do not advance anything
fn is_navigable(url: &str, location: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    if parsed.scheme() == "javascript" {
        return false;
    }
    if parsed.fragment().is_some() {
        let mut target = parsed.clone();
        target.set_fragment(None);
        let same_page = Url::parse(location).is_ok_and(|mut here| {
            here.set_fragment(None);
            here == target
        });
        if same_page {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::HtmlDocument;
    use pretty_assertions::assert_eq;

    fn doc(body: &str) -> HtmlDocument {
        HtmlDocument::parse(
            &format!("<body>{body}</body>"),
            "https://shop.test/catalog?page=3",
        )
        .unwrap()
    }

    fn target(doc: &HtmlDocument) -> ElementId {
        doc.element_by_id("t").unwrap()
    }

    #[test]
    fn test_extract_text_concatenates_attributes() {
        let doc = doc(r#"<a id="t" href="/4" title="Next page">  4 </a>"#);
        assert_eq!(extract_text(&doc, target(&doc)), "4 Next page");

        let doc = self::doc(r#"<input id="t" type="button" value=" Siguiente ">"#);
        assert_eq!(extract_text(&doc, target(&doc)), "Siguiente");

        let doc = self::doc(r#"<a id="t" href="/4"><img alt="next"></a>"#);
        // alt lives on the child, not on the anchor
        assert_eq!(extract_text(&doc, target(&doc)), "");
    }

    #[test]
    fn test_extract_url_prefers_href() {
        let doc = doc(r#"<a id="t" href="?page=4" data-href="/other">Next</a>"#);
        assert_eq!(
            extract_url(&doc, target(&doc)).as_deref(),
            Some("https://shop.test/catalog?page=4")
        );
    }

    #[test]
    fn test_extract_url_from_data_attributes() {
        let doc = doc(r#"<button id="t" data-url="/catalog?page=4">Next</button>"#);
        assert_eq!(
            extract_url(&doc, target(&doc)).as_deref(),
            Some("https://shop.test/catalog?page=4")
        );

        let doc = self::doc(r#"<button id="t" data-link="https://cdn.test/p/4">Next</button>"#);
        assert_eq!(
            extract_url(&doc, target(&doc)).as_deref(),
            Some("https://cdn.test/p/4")
        );
    }

    #[test]
    fn test_extract_url_from_onclick() {
        let doc = doc(r#"<button id="t" onclick="location.href = '/catalog?page=4'">Next</button>"#);
        assert_eq!(
            extract_url(&doc, target(&doc)).as_deref(),
            Some("https://shop.test/catalog?page=4")
        );

        let doc = self::doc(
            r#"<button id="t" onclick="track(); window.location=&quot;https://shop.test/p/4&quot;">Next</button>"#,
        );
        assert_eq!(
            extract_url(&doc, target(&doc)).as_deref(),
            Some("https://shop.test/p/4")
        );
    }

    #[test]
    fn test_extract_url_none() {
        let doc = doc(r#"<button id="t" onclick="loadMore()">More</button>"#);
        assert!(extract_url(&doc, target(&doc)).is_none());
    }

    #[test]
    fn test_script_and_fragment_hrefs_are_not_navigable() {
        let doc = doc(r#"<a id="t" href="javascript:void(0)">Next</a>"#);
        assert!(extract_url(&doc, target(&doc)).is_none());

        let doc = self::doc(r##"<a id="t" href="#">Next</a>"##);
        assert!(extract_url(&doc, target(&doc)).is_none());

        let doc = self::doc(r##"<a id="t" href="/catalog?page=4#top">Next</a>"##);
        assert_eq!(
            extract_url(&doc, target(&doc)).as_deref(),
            Some("https://shop.test/catalog?page=4#top")
        );
    }
}
