//! Shared HTTP client construction.
//!
//! Both the metadata lookup and the file download go through a client built
//! here so they agree on User-Agent and connect timeout.
//! No overall request timeout is set: a stalled transfer waits on the
//! transport, matching the single-shot nature of a run.
//!
//! The download client never negotiates compression. Decoding a
//! `Content-Encoding` body drops `Content-Length`, and the downloader checks
//! the bytes it writes against that header.

use std::time::Duration;

use reqwest::{Client, ClientBuilder};

use crate::user_agent;

/// HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Builds the client for API requests (gzip-capable).
///
/// # Errors
///
/// Returns the builder error if TLS or proxy initialization fails.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    base_builder().gzip(true).build()
}

/// Builds the client for file downloads: bodies arrive exactly as sent.
///
/// # Errors
///
/// Returns the builder error if TLS or proxy initialization fails.
pub fn build_download_client() -> Result<Client, reqwest::Error> {
    base_builder().gzip(false).build()
}

fn base_builder() -> ClientBuilder {
    Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .user_agent(user_agent::default_user_agent())
}
