use crate::links;
use crate::textprep::{char_len, normalize};
use pagechat_core::{
    Document, Error, Result, MAX_CONTENT_FRAGMENTS, MAX_LINKS, MIN_FRAGMENT_CHARS, NO_TITLE,
};

/// Elements whose whole subtree is dropped before any extraction.
const BOILERPLATE: &str = "script, style, nav, footer, header";

/// Elements whose full text becomes a content fragment.
const CONTENT_BLOCKS: &str = "p, h1, h2, h3, h4, h5, h6, li, article, section";

#[derive(Debug, Clone, Copy)]
pub struct ExtractLimits {
    /// Markup larger than this is rejected instead of parsed.
    pub max_markup_bytes: usize,
}

impl Default for ExtractLimits {
    fn default() -> Self {
        Self {
            max_markup_bytes: 10 * 1024 * 1024,
        }
    }
}

fn selector(css: &'static str) -> Result<html_scraper::Selector> {
    html_scraper::Selector::parse(css).map_err(|e| Error::Parse(format!("selector {css:?}: {e}")))
}

/// Parse markup and detach every boilerplate subtree from the root.
///
/// Detached nodes stay in the arena and `Html::select` still walks them, so every later select
/// must start at `root_element()`.
fn parse_pruned(markup: &str) -> Result<html_scraper::Html> {
    let mut doc = html_scraper::Html::parse_document(markup);
    let sel = selector(BOILERPLATE)?;
    let ids: Vec<_> = doc.root_element().select(&sel).map(|el| el.id()).collect();
    for id in ids {
        if let Some(mut node) = doc.tree.get_mut(id) {
            node.detach();
        }
    }
    Ok(doc)
}

fn title_of(doc: &html_scraper::Html) -> Result<String> {
    let sel = selector("title")?;
    Ok(match doc.root_element().select(&sel).next() {
        Some(t) => normalize(&t.text().collect::<String>()),
        None => NO_TITLE.to_string(),
    })
}

/// Normalized text of every content block, in document order, that is long enough to keep.
///
/// Nested blocks each contribute: an `<article>` yields its own fragment and so does every
/// `<p>` inside it.
fn content_fragments(doc: &html_scraper::Html) -> Result<Vec<String>> {
    let sel = selector(CONTENT_BLOCKS)?;
    Ok(doc
        .root_element()
        .select(&sel)
        .map(|el| normalize(&el.text().collect::<String>()))
        .filter(|t| char_len(t) > MIN_FRAGMENT_CHARS)
        .collect())
}

/// Extract a normalized [`Document`] from raw markup.
///
/// `source_url` is the page the markup came from; relative hrefs resolve against it and it
/// becomes `Document::url` verbatim.
pub fn extract(markup: &str, source_url: &str) -> Result<Document> {
    extract_with_limits(markup, source_url, ExtractLimits::default())
}

pub fn extract_with_limits(
    markup: &str,
    source_url: &str,
    limits: ExtractLimits,
) -> Result<Document> {
    let base = url::Url::parse(source_url).map_err(|e| Error::InvalidUrl(e.to_string()))?;
    if markup.len() > limits.max_markup_bytes {
        return Err(Error::Parse(format!(
            "markup too large: {} bytes (limit {})",
            markup.len(),
            limits.max_markup_bytes
        )));
    }

    let doc = parse_pruned(markup)?;
    let title = title_of(&doc)?;
    let fragments = content_fragments(&doc)?;

    // Length of the full join: (n - 1) separators plus every fragment.
    let content_length = fragments.iter().map(|f| char_len(f)).sum::<usize>()
        + fragments.len().saturating_sub(1);
    let content = fragments
        .iter()
        .take(MAX_CONTENT_FRAGMENTS)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");

    let links = links::collect_links(&doc, &base, MAX_LINKS);

    tracing::debug!(
        url = source_url,
        fragments = fragments.len(),
        links = links.len(),
        content_length,
        "extracted document"
    );

    Ok(Document {
        url: source_url.to_string(),
        title,
        content,
        links,
        content_length,
    })
}
