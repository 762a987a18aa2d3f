use crate::textprep::normalize;
use pagechat_core::Link;

/// Resolve `href` against `base` with standard URL-joining semantics.
///
/// Handles absolute (`https://...`), root-relative (`/about`), path-relative (`docs/x`),
/// protocol-relative (`//cdn.x.com/a`) and fragment-only (`#top`) hrefs. Returns `None` when the
/// joined URL is unparseable (e.g. `http://[::1` or an invalid port).
pub fn resolve_href(base: &url::Url, href: &str) -> Option<String> {
    base.join(href).ok().map(|u| u.to_string())
}

/// Collect `(text, absolute url)` pairs from every `a[href]` in document order.
///
/// - anchor text is normalized; anchors whose text normalizes to empty are skipped
/// - hrefs that cannot be resolved are skipped
/// - duplicates are kept (the page order is the signal)
/// - returns at most `max_links`
///
/// Selection starts at `doc.root_element()`, so subtrees detached from the tree are never visited.
pub fn collect_links(doc: &html_scraper::Html, base: &url::Url, max_links: usize) -> Vec<Link> {
    if max_links == 0 {
        return Vec::new();
    }
    let sel = match html_scraper::Selector::parse("a[href]") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    let mut out: Vec<Link> = Vec::new();
    for el in doc.root_element().select(&sel) {
        if out.len() >= max_links {
            break;
        }
        let Some(href) = el.value().attr("href") else {
            continue;
        };
        let text = normalize(&el.text().collect::<String>());
        if text.is_empty() {
            continue;
        }
        let Some(url) = resolve_href(base, href) else {
            continue;
        };
        out.push(Link { text, url });
    }
    out
}
