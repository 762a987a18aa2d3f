//! `pagechat-server` library surface.
//!
//! The `pagechat` binary is the usual entrypoint; the router is exposed so integration tests and
//! embedders can mount it on their own listener.

pub mod app;
pub mod config;
mod envelope;

pub use app::{router, serve, AppState};
