use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("fetch failed: {0}")]
    Fetch(String),
    #[error("parse failed: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Title used when the markup has no `<title>` element.
pub const NO_TITLE: &str = "No title found";

/// Upper bound on `Document::links`.
pub const MAX_LINKS: usize = 20;

/// Upper bound on fragments joined into `Document::content`.
pub const MAX_CONTENT_FRAGMENTS: usize = 100;

/// A fragment is kept only when its normalized length (chars) is strictly greater than this.
pub const MIN_FRAGMENT_CHARS: usize = 20;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Link {
    pub text: String,
    pub url: String,
}

/// Normalized extraction result for one URL.
///
/// Replaced wholesale on re-scrape; nothing mutates a stored document in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    pub url: String,
    pub title: String,
    /// First `MAX_CONTENT_FRAGMENTS` fragments joined by single spaces.
    pub content: String,
    pub links: Vec<Link>,
    /// Char length of *all* qualifying fragments joined by single spaces.
    ///
    /// Computed before the fragment cap, so it can exceed `content.chars().count()`.
    pub content_length: usize,
}

/// Parse and validate a user-supplied page URL.
///
/// Requires a scheme and a host (`https://x.com/page`); `mailto:x` or `/relative` are rejected.
pub fn parse_source_url(raw: &str) -> Result<url::Url> {
    let u = url::Url::parse(raw.trim()).map_err(|e| Error::InvalidUrl(e.to_string()))?;
    match u.host_str() {
        Some(h) if !h.is_empty() => Ok(u),
        _ => Err(Error::InvalidUrl(format!("missing host: {raw}"))),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchRequest {
    pub url: String,
    /// Timeout for the whole request (connect + body).
    pub timeout_ms: Option<u64>,
    /// Hard cap on bytes read from the response body.
    pub max_bytes: Option<u64>,
    /// Extra headers to send.
    pub headers: BTreeMap<String, String>,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout_ms: None,
            max_bytes: None,
            headers: BTreeMap::new(),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchResponse {
    pub url: String,
    pub final_url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
    pub truncated: bool,
}

impl FetchResponse {
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.bytes).to_string()
    }
}

/// Transport collaborator: turns a URL into raw markup bytes or a typed fetch error.
#[async_trait::async_trait]
pub trait FetchBackend: Send + Sync {
    async fn fetch(&self, req: &FetchRequest) -> Result<FetchResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_source_url_requires_scheme_and_host() {
        assert!(parse_source_url("https://x.com/page").is_ok());
        assert!(parse_source_url("  http://example.org  ").is_ok());
        assert!(matches!(
            parse_source_url("example.com"),
            Err(Error::InvalidUrl(_))
        ));
        assert!(matches!(
            parse_source_url("mailto:someone@example.com"),
            Err(Error::InvalidUrl(_))
        ));
        assert!(matches!(parse_source_url(""), Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn document_serializes_with_stable_field_names() {
        let doc = Document {
            url: "https://x.com/".to_string(),
            title: "Hi".to_string(),
            content: String::new(),
            links: vec![Link {
                text: "About".to_string(),
                url: "https://x.com/about".to_string(),
            }],
            content_length: 0,
        };
        let v = serde_json::to_value(&doc).unwrap();
        assert_eq!(v["title"], "Hi");
        assert_eq!(v["content_length"], 0);
        assert_eq!(v["links"][0]["text"], "About");
        assert_eq!(v["links"][0]["url"], "https://x.com/about");
    }

    #[test]
    fn error_messages_carry_the_cause() {
        let e = Error::Fetch("http status 404".to_string());
        assert_eq!(e.to_string(), "fetch failed: http status 404");
    }
}
