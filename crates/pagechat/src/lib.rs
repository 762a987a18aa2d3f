//! Facade crate for `pagechat`.
//!
//! Always re-exports the IO-free types and the [`FetchBackend`] seam from `pagechat-core`.
//! With the default `local` feature it also re-exports the reqwest/scraper pipeline, so an
//! embedder can depend on this crate alone.

pub use pagechat_core::*;

#[cfg(feature = "local")]
pub use pagechat_local::{
    extract::extract, relevance::find_relevant, reply::compose_reply, scrape::Scraper,
    store::DocumentStore, textprep::normalize, FetcherConfig, LocalFetcher,
};
