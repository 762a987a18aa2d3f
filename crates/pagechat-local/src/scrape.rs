//! Fetch → extract → store, for one URL at a time.

use crate::extract::{extract_with_limits, ExtractLimits};
use crate::store::DocumentStore;
use pagechat_core::{parse_source_url, Document, FetchBackend, FetchRequest, Result};
use std::sync::Arc;

pub struct Scraper<B> {
    backend: B,
    store: Arc<DocumentStore>,
    limits: ExtractLimits,
}

impl<B: FetchBackend> Scraper<B> {
    pub fn new(backend: B, store: Arc<DocumentStore>) -> Self {
        Self {
            backend,
            store,
            limits: ExtractLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: ExtractLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn store(&self) -> &Arc<DocumentStore> {
        &self.store
    }

    /// Fetch and extract `url` without touching the store.
    ///
    /// Surrounding whitespace is trimmed. Links resolve against the URL as requested (not the
    /// post-redirect URL), matching the key the document is stored under.
    pub async fn fetch_document(&self, url: &str) -> Result<Document> {
        let url = url.trim();
        let parsed = parse_source_url(url)?;
        let resp = self.backend.fetch(&FetchRequest::new(parsed.as_str())).await?;
        if resp.truncated {
            tracing::warn!(url, bytes = resp.bytes.len(), "body truncated before extraction");
        }
        let markup = resp.text_lossy();
        let limits = self.limits;
        let source = url.to_string();
        tokio::task::spawn_blocking(move || extract_with_limits(&markup, &source, limits))
            .await
            .map_err(|e| pagechat_core::Error::Parse(format!("extract join failed: {e}")))?
    }

    /// Fetch, extract and store `url`, keyed by the trimmed URL.
    ///
    /// On any error the store is left as it was, so a failed re-scrape keeps the previous
    /// document available.
    pub async fn scrape(&self, url: &str) -> Result<Document> {
        let url = url.trim();
        match self.fetch_document(url).await {
            Ok(doc) => {
                self.store.put(url, doc.clone());
                tracing::info!(
                    url,
                    title = %doc.title,
                    content_length = doc.content_length,
                    links = doc.links.len(),
                    "scraped"
                );
                Ok(doc)
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "scrape failed");
                Err(e)
            }
        }
    }
}
