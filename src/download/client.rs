//! HTTP client wrapper for downloading the mod archive.
//!
//! This module provides the `HttpClient` struct which streams a response body
//! to disk, reports progress, and refuses to leave a short file behind.

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use indicatif::ProgressBar;
use reqwest::Client;
use reqwest::header::CONTENT_LENGTH;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::error::DownloadError;
use super::retry::{RetryDecision, RetryPolicy, classify_error};
use crate::http::build_download_client;

/// HTTP client for streaming a single file to disk.
///
/// # Example
///
/// ```no_run
/// use indicatif::ProgressBar;
/// use modfetch_core::download::HttpClient;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new()?;
/// let path = client
///     .download_to_file(
///         "https://gamebanana.com/dl/67890",
///         Path::new("./mods"),
///         "cool_skin.zip",
///         &ProgressBar::hidden(),
///     )
///     .await?;
/// println!("Downloaded to: {}", path.display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Client`] if the underlying client cannot be built.
    pub fn new() -> Result<Self, DownloadError> {
        let client = build_download_client().map_err(DownloadError::Client)?;
        Ok(Self { client })
    }

    /// Downloads `url` to `dest_dir/file_name`.
    ///
    /// The response must declare a `Content-Length`. `progress` is sized to it
    /// and advanced as chunks are written.
    ///
    /// # Returns
    ///
    /// The full path of the written file.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - The URL or file name is invalid
    /// - The request fails or the server returns a non-2xx status
    /// - `Content-Length` is absent ([`DownloadError::MissingContentLength`])
    /// - Writing to disk fails
    /// - Fewer bytes arrive than declared ([`DownloadError::Incomplete`]); the
    ///   partial file is deleted first
    #[must_use = "download result contains the path to the downloaded file"]
    #[instrument(skip(self, progress), fields(url = %url))]
    pub async fn download_to_file(
        &self,
        url: &str,
        dest_dir: &Path,
        file_name: &str,
        progress: &ProgressBar,
    ) -> Result<PathBuf, DownloadError> {
        debug!("starting download");

        Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;
        let file_path = dest_dir.join(validate_file_name(file_name)?);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        let expected_bytes =
            declared_length(&response).ok_or_else(|| DownloadError::missing_content_length(url))?;
        debug!(expected_bytes, path = %file_path.display(), "resolved output path");

        progress.set_length(expected_bytes);
        progress.set_position(0);

        let mut file = File::create(&file_path)
            .await
            .map_err(|e| DownloadError::io(&file_path, e))?;

        let bytes_written = match stream_to_file(&mut file, response, url, &file_path, progress).await
        {
            Ok(written) => written,
            Err(error) => {
                drop(file);
                remove_partial(&file_path).await;
                return Err(error);
            }
        };
        drop(file);

        discard_if_incomplete(&file_path, expected_bytes, bytes_written).await?;

        info!(path = %file_path.display(), bytes = bytes_written, "download complete");
        Ok(file_path)
    }

    /// Runs [`download_to_file`](Self::download_to_file) under `policy`.
    ///
    /// # Errors
    ///
    /// Returns the error of the last attempt.
    #[instrument(skip(self, progress, policy), fields(url = %url))]
    pub async fn download_with_retry(
        &self,
        url: &str,
        dest_dir: &Path,
        file_name: &str,
        progress: &ProgressBar,
        policy: &RetryPolicy,
    ) -> Result<PathBuf, DownloadError> {
        let mut attempt = 1;
        loop {
            let error = match self
                .download_to_file(url, dest_dir, file_name, progress)
                .await
            {
                Ok(path) => return Ok(path),
                Err(error) => error,
            };

            match policy.should_retry(classify_error(&error), attempt) {
                RetryDecision::Retry {
                    delay,
                    attempt: next,
                } => {
                    warn!(error = %error, ?delay, "encountered a gateway error, retrying");
                    tokio::time::sleep(delay).await;
                    attempt = next;
                }
                RetryDecision::DoNotRetry { reason } => {
                    debug!(reason = %reason, "not retrying");
                    return Err(error);
                }
            }
        }
    }
}

/// Streams response body to file, returning bytes written.
///
/// Extracted so the caller can clean up on error.
async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
    progress: &ProgressBar,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::network(url, e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(file_path, e))?;

        bytes_written += chunk.len() as u64;
        progress.inc(chunk.len() as u64);
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(file_path, e))?;

    Ok(bytes_written)
}

/// Best-effort removal of a partial download; the caller is already failing.
async fn remove_partial(path: &Path) -> bool {
    debug!(path = %path.display(), "cleaning up partial file after error");
    match tokio::fs::remove_file(path).await {
        Ok(()) => true,
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "failed to remove partial download"
            );
            false
        }
    }
}

/// Removes `path` and fails when `actual` differs from `expected`.
pub(crate) async fn discard_if_incomplete(
    path: &Path,
    expected: u64,
    actual: u64,
) -> Result<(), DownloadError> {
    if actual == expected {
        return Ok(());
    }
    warn!(
        path = %path.display(),
        expected,
        actual,
        "download size mismatch; removing partial file"
    );
    tokio::fs::remove_file(path)
        .await
        .map_err(|e| DownloadError::io(path, e))?;
    Err(DownloadError::incomplete(path, expected, actual))
}

/// Reads the `Content-Length` header as declared by the server.
fn declared_length(response: &reqwest::Response) -> Option<u64> {
    response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}

/// Accepts only a single, normal path component.
fn validate_file_name(name: &str) -> Result<&str, DownloadError> {
    let trimmed = name.trim();
    let is_plain = !trimmed.is_empty()
        && trimmed != "."
        && trimmed != ".."
        && !trimmed.contains(['/', '\\'])
        && Path::new(trimmed).file_name().is_some_and(|f| f == trimmed);
    if is_plain {
        Ok(trimmed)
    } else {
        Err(DownloadError::invalid_file_name(name))
    }
}
