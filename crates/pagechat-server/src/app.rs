//! HTTP surface: `/health`, `/scrape`, `/chat`, `/clear`.

use crate::envelope::{ErrorCode, ErrorReply};
use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use pagechat_core::{Document, FetchBackend};
use pagechat_local::reply::{compose_reply, NO_DOCUMENT_REPLY};
use pagechat_local::scrape::Scraper;
use pagechat_local::store::DocumentStore;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub const HEALTH_MESSAGE: &str = "Web Scraping Chatbot API is running";

pub struct AppState<B> {
    scraper: Scraper<B>,
}

impl<B: FetchBackend> AppState<B> {
    pub fn new(scraper: Scraper<B>) -> Self {
        Self { scraper }
    }

    pub fn store(&self) -> &Arc<DocumentStore> {
        self.scraper.store()
    }
}

#[derive(Debug, Default, Deserialize)]
struct ScrapeBody {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ChatBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ClearBody {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Serialize)]
struct HealthReply {
    success: bool,
    status: &'static str,
    message: &'static str,
    documents: usize,
}

#[derive(Serialize)]
struct ScrapeReply {
    success: bool,
    #[serde(flatten)]
    doc: Document,
}

#[derive(Serialize)]
struct ChatReply {
    success: bool,
    response: String,
    source: Option<String>,
}

#[derive(Serialize)]
struct ClearReply {
    success: bool,
    message: &'static str,
}

async fn health<B: FetchBackend>(State(state): State<Arc<AppState<B>>>) -> Json<HealthReply> {
    Json(HealthReply {
        success: true,
        status: "healthy",
        message: HEALTH_MESSAGE,
        documents: state.store().len(),
    })
}

async fn scrape<B: FetchBackend>(
    State(state): State<Arc<AppState<B>>>,
    body: Option<Json<ScrapeBody>>,
) -> Response {
    let body = body.map(|Json(b)| b).unwrap_or_default();
    let Some(url) = body.url else {
        return ErrorReply::new(ErrorCode::InvalidParams, "URL is required").into_response();
    };
    match state.scraper.scrape(&url).await {
        Ok(doc) => Json(ScrapeReply { success: true, doc }).into_response(),
        Err(e) => ErrorReply::from_scrape_error(&e).into_response(),
    }
}

async fn chat<B: FetchBackend>(
    State(state): State<Arc<AppState<B>>>,
    body: Option<Json<ChatBody>>,
) -> Response {
    let body = body.map(|Json(b)| b).unwrap_or_default();
    let Some(message) = body.message else {
        return ErrorReply::new(ErrorCode::InvalidParams, "Message is required").into_response();
    };
    let url = body.url.as_deref().map(str::trim).unwrap_or_default().to_string();
    let doc = if url.is_empty() {
        None
    } else {
        state.store().get(&url)
    };
    let reply = match doc {
        Some(doc) => ChatReply {
            success: true,
            response: compose_reply(&message, &doc),
            source: Some(url),
        },
        None => {
            tracing::debug!(url = %url, "chat without a stored document");
            ChatReply {
                success: true,
                response: NO_DOCUMENT_REPLY.to_string(),
                source: None,
            }
        }
    };
    Json(reply).into_response()
}

async fn clear<B: FetchBackend>(
    State(state): State<Arc<AppState<B>>>,
    body: Result<Json<ClearBody>, JsonRejection>,
) -> Response {
    // Clear-all needs a well-formed body; a rejected one must not empty the store.
    let body = match body {
        Ok(Json(b)) => b,
        Err(e) => {
            tracing::debug!(error = %e, "rejected clear body");
            return ErrorReply::new(ErrorCode::InvalidParams, "Invalid request").into_response();
        }
    };
    let url = body.url.as_deref().map(str::trim).unwrap_or_default();
    if url.is_empty() {
        state.store().clear();
        tracing::info!("cleared all documents");
        return Json(ClearReply {
            success: true,
            message: "All data cleared",
        })
        .into_response();
    }
    if state.store().delete(url) {
        tracing::info!(url = %url, "cleared document");
        Json(ClearReply {
            success: true,
            message: "Data cleared",
        })
        .into_response()
    } else {
        ErrorReply::new(ErrorCode::NotFound, "No data found for this URL").into_response()
    }
}

pub fn router<B: FetchBackend + 'static>(state: Arc<AppState<B>>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::<B>))
        .route("/scrape", post(scrape::<B>))
        .route("/chat", post(chat::<B>))
        .route("/clear", post(clear::<B>))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind `addr` and serve until ctrl-c.
pub async fn serve<B: FetchBackend + 'static>(
    addr: SocketAddr,
    state: Arc<AppState<B>>,
) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await?;
    Ok(())
}
