//! Integration tests for the download module.
//!
//! These tests verify the full download flow against mock HTTP servers,
//! including hand-written responses that wiremock cannot produce (a body
//! shorter than its declared length, or no length at all).

use std::io::{Read, Write};
use std::net::TcpListener;

use indicatif::ProgressBar;
use modfetch_core::download::{DownloadError, HttpClient};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Serves `response` verbatim to the first connection, then closes it.
fn serve_raw_once(response: &'static [u8]) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind localhost");
    let addr = listener.local_addr().expect("local addr");
    std::thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut request = [0u8; 4096];
            let _ = stream.read(&mut request);
            let _ = stream.write_all(response);
            let _ = stream.flush();
        }
    });
    format!("http://{addr}/dl/1")
}

#[tokio::test]
async fn test_download_full_flow_preserves_content() {
    let content = b"This is the complete archive content.\nLine 2.\nLine 3.";
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dl/67890"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content.to_vec()))
        .mount(&mock_server)
        .await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    let client = HttpClient::new().expect("client");
    let url = format!("{}/dl/67890", mock_server.uri());
    let result = client
        .download_to_file(&url, temp_dir.path(), "cool_skin.zip", &ProgressBar::hidden())
        .await;

    let file_path = result.expect("download should succeed");
    assert_eq!(file_path, temp_dir.path().join("cool_skin.zip"));
    assert_eq!(std::fs::read(&file_path).expect("read file"), content);
}

#[tokio::test]
async fn test_download_truncated_body_leaves_no_partial_file() {
    let url = serve_raw_once(
        b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\nConnection: close\r\n\r\nonly ten b",
    );
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    let client = HttpClient::new().expect("client");
    let result = client
        .download_to_file(&url, temp_dir.path(), "short.zip", &ProgressBar::hidden())
        .await;

    assert!(result.is_err(), "short body must fail: {result:?}");
    assert!(
        !temp_dir.path().join("short.zip").exists(),
        "partial file must not exist after failure"
    );
}

#[tokio::test]
async fn test_download_without_content_length_is_fatal() {
    let url = serve_raw_once(b"HTTP/1.1 200 OK\r\nConnection: close\r\n\r\nunsized body");
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    let client = HttpClient::new().expect("client");
    let result = client
        .download_to_file(&url, temp_dir.path(), "unsized.zip", &ProgressBar::hidden())
        .await;

    assert!(
        matches!(result, Err(DownloadError::MissingContentLength { .. })),
        "got {result:?}"
    );
    assert!(!temp_dir.path().join("unsized.zip").exists());
}

#[tokio::test]
async fn test_download_overwrites_existing_file_with_same_name() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dl/5"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"new".to_vec()))
        .mount(&mock_server)
        .await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    std::fs::write(temp_dir.path().join("pack.zip"), b"old and longer").expect("seed file");

    let client = HttpClient::new().expect("client");
    let url = format!("{}/dl/5", mock_server.uri());
    let file_path = client
        .download_to_file(&url, temp_dir.path(), "pack.zip", &ProgressBar::hidden())
        .await
        .expect("download should succeed");

    assert_eq!(std::fs::read(file_path).expect("read file"), b"new");
}

#[tokio::test]
async fn test_download_rejects_path_like_file_name_before_requesting() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"x".to_vec()))
        .expect(0)
        .mount(&mock_server)
        .await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    let client = HttpClient::new().expect("client");
    let url = format!("{}/dl/5", mock_server.uri());
    let result = client
        .download_to_file(&url, temp_dir.path(), "../escape.zip", &ProgressBar::hidden())
        .await;

    assert!(
        matches!(result, Err(DownloadError::InvalidFileName { .. })),
        "got {result:?}"
    );
}
