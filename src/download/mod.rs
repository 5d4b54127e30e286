//! HTTP download of the mod archive.
//!
//! The response body is streamed straight to `<destination>/<file name>`.
//!
//! # Features
//!
//! - Streaming downloads with an inline progress bar
//! - Mandatory `Content-Length`; a short body never leaves a file behind
//! - Optional single re-attempt on gateway errors ([`RetryPolicy`])
//! - Structured error types with full context

mod client;
mod error;
mod retry;

pub use client::HttpClient;
pub use error::DownloadError;
pub use retry::{FailureType, MAX_ATTEMPTS, RetryDecision, RetryPolicy, classify_error};
