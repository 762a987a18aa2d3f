use pagechat_core::{Error, FetchBackend, FetchRequest, FetchResponse, Result};
use std::collections::BTreeMap;
use std::time::Duration;

pub mod extract;
pub mod links;
pub mod relevance;
pub mod reply;
pub mod scrape;
pub mod store;
pub mod textprep;

/// Browser-like UA sent unless configured otherwise.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

pub const DEFAULT_MAX_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct FetcherConfig {
    pub user_agent: String,
    pub timeout_ms: u64,
    pub max_bytes: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }
}

/// reqwest-backed [`FetchBackend`].
///
/// Non-2xx responses become `Error::Fetch("http status N")`; bodies are capped at `max_bytes`.
#[derive(Debug, Clone)]
pub struct LocalFetcher {
    client: reqwest::Client,
    max_bytes: u64,
}

impl LocalFetcher {
    pub fn new(cfg: &FetcherConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(cfg.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(10))
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .map_err(|e| Error::Fetch(e.to_string()))?;
        Ok(Self {
            client,
            max_bytes: cfg.max_bytes,
        })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(&FetcherConfig::default())
    }

    fn apply_headers(
        &self,
        mut rb: reqwest::RequestBuilder,
        headers: &BTreeMap<String, String>,
    ) -> reqwest::RequestBuilder {
        for (k, v) in headers {
            if let (Ok(name), Ok(value)) = (
                reqwest::header::HeaderName::from_bytes(k.as_bytes()),
                reqwest::header::HeaderValue::from_str(v),
            ) {
                rb = rb.header(name, value);
            }
        }
        rb
    }
}

#[async_trait::async_trait]
impl FetchBackend for LocalFetcher {
    async fn fetch(&self, req: &FetchRequest) -> Result<FetchResponse> {
        let t0 = std::time::Instant::now();
        let url = url::Url::parse(&req.url).map_err(|e| Error::InvalidUrl(e.to_string()))?;

        let mut rb = self.client.get(url);
        if let Some(to) = req.timeout() {
            rb = rb.timeout(to);
        }
        rb = self.apply_headers(rb, &req.headers);
        let resp = rb.send().await.map_err(|e| Error::Fetch(e.to_string()))?;
        let final_url = resp.url().to_string();
        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(url = %req.url, status = status.as_u16(), "non-success status");
            return Err(Error::Fetch(format!("http status {}", status.as_u16())));
        }
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let max_bytes = req.max_bytes.unwrap_or(self.max_bytes) as usize;
        let mut truncated = false;
        let mut bytes = Vec::new();
        let mut stream = resp.bytes_stream();
        use futures_util::StreamExt;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Error::Fetch(e.to_string()))?;
            if bytes.len().saturating_add(chunk.len()) > max_bytes {
                let can_take = max_bytes.saturating_sub(bytes.len());
                bytes.extend_from_slice(&chunk[..can_take]);
                truncated = true;
                break;
            }
            bytes.extend_from_slice(&chunk);
        }

        tracing::debug!(
            url = %req.url,
            final_url = %final_url,
            bytes = bytes.len(),
            truncated,
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "fetched"
        );

        Ok(FetchResponse {
            url: req.url.clone(),
            final_url,
            status: status.as_u16(),
            content_type,
            bytes,
            truncated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::header, http::StatusCode, routing::get, Router};
    use std::net::SocketAddr;

    async fn serve(app: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    #[tokio::test]
    async fn local_fetcher_sends_user_agent_and_returns_body() {
        let app = Router::new().route(
            "/",
            get(|headers: axum::http::HeaderMap| async move {
                let ua = headers
                    .get(header::USER_AGENT)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("")
                    .to_string();
                ([(header::CONTENT_TYPE, "text/html")], format!("<p>{ua}</p>"))
            }),
        );
        let addr = serve(app).await;

        let fetcher = LocalFetcher::with_defaults().unwrap();
        let resp = fetcher
            .fetch(&FetchRequest::new(format!("http://{addr}/")))
            .await
            .unwrap();
        assert_eq!(resp.status, 200);
        assert_eq!(resp.content_type.as_deref(), Some("text/html"));
        assert!(resp.text_lossy().contains("Chrome/91"));
        assert!(!resp.truncated);
    }

    #[tokio::test]
    async fn local_fetcher_treats_error_status_as_fetch_error() {
        let app = Router::new().route("/", get(|| async { (StatusCode::NOT_FOUND, "nope") }));
        let addr = serve(app).await;

        let fetcher = LocalFetcher::with_defaults().unwrap();
        let err = fetcher
            .fetch(&FetchRequest::new(format!("http://{addr}/")))
            .await
            .unwrap_err();
        assert_eq!(err, Error::Fetch("http status 404".to_string()));
    }

    #[tokio::test]
    async fn local_fetcher_caps_body_at_max_bytes() {
        let big = "x".repeat(20_000);
        let app = Router::new().route(
            "/",
            get(move || {
                let body = big.clone();
                async move { ([(header::CONTENT_TYPE, "text/html")], body) }
            }),
        );
        let addr = serve(app).await;

        let fetcher = LocalFetcher::with_defaults().unwrap();
        let mut req = FetchRequest::new(format!("http://{addr}/"));
        req.max_bytes = Some(200);
        let resp = fetcher.fetch(&req).await.unwrap();
        assert_eq!(resp.bytes.len(), 200);
        assert!(resp.truncated);
    }

    #[tokio::test]
    async fn local_fetcher_times_out() {
        let app = Router::new().route(
            "/",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        );
        let addr = serve(app).await;

        let fetcher = LocalFetcher::with_defaults().unwrap();
        let mut req = FetchRequest::new(format!("http://{addr}/"));
        req.timeout_ms = Some(100);
        let err = fetcher.fetch(&req).await.unwrap_err();
        assert!(matches!(err, Error::Fetch(_)));
    }

    #[tokio::test]
    async fn local_fetcher_rejects_unparseable_url() {
        let fetcher = LocalFetcher::with_defaults().unwrap();
        let err = fetcher
            .fetch(&FetchRequest::new("not a url"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }
}
