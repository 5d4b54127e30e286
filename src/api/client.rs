//! Metadata lookups against the GameBanana API.

use reqwest::Client;
use tracing::{debug, info, instrument};

use super::error::ApiError;
use super::models::DownloadPage;
use crate::http::build_http_client;
use crate::link::ModReference;
use crate::site::Site;

/// Client for the mod metadata API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    site: Site,
}

impl ApiClient {
    /// Creates a client for `site`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Client`] if the HTTP client cannot be built.
    pub fn new(site: Site) -> Result<Self, ApiError> {
        let client = build_http_client().map_err(ApiError::Client)?;
        Ok(Self { client, site })
    }

    /// Fetches and decodes the download page of `mod_id`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Network`] when the request cannot be sent or read
    /// - [`ApiError::HttpStatus`] for any non-2xx status
    /// - [`ApiError::Decode`] when the body is not the expected JSON
    #[instrument(skip(self))]
    pub async fn download_page(&self, mod_id: &str) -> Result<DownloadPage, ApiError> {
        let url = self.site.download_page_url(mod_id);
        debug!(url = %url, "requesting download page");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::network(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::http_status(&url, status.as_u16()));
        }

        let page = response
            .json::<DownloadPage>()
            .await
            .map_err(|e| ApiError::decode(&url, e))?;
        debug!(files = page.files.len(), "download page decoded");
        Ok(page)
    }

    /// Returns the file name of the record matching `reference.file_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::FileNotFound`] when no record matches, or any
    /// error from [`download_page`](Self::download_page).
    #[instrument(skip(self), fields(reference = %reference))]
    pub async fn file_name(&self, reference: &ModReference) -> Result<String, ApiError> {
        let page = self.download_page(&reference.mod_id).await?;
        let record = page
            .find_file(&reference.file_id)
            .ok_or_else(|| ApiError::file_not_found(&reference.mod_id, &reference.file_id))?;

        info!(
            file = %record.file_name,
            size = ?record.size,
            "resolved file name"
        );
        Ok(record.file_name.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn reference(mod_id: &str, file_id: &str) -> ModReference {
        ModReference {
            mod_id: mod_id.to_string(),
            file_id: file_id.to_string(),
        }
    }

    async fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(Site::new(&server.uri()).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_file_name_returns_matching_record() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/apiv11/Mod/12345/DownloadPage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "_aFiles": [
                    {"_idRow": 11111, "_sFile": "other.zip"},
                    {"_idRow": 67890, "_sFile": "cool_skin.zip"}
                ]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let name = client.file_name(&reference("12345", "67890")).await.unwrap();
        assert_eq!(name, "cool_skin.zip");
    }

    #[tokio::test]
    async fn test_file_name_missing_record_is_lookup_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/apiv11/Mod/12345/DownloadPage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "_aFiles": [{"_idRow": 11111, "_sFile": "other.zip"}]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client
            .file_name(&reference("12345", "67890"))
            .await
            .unwrap_err();
        assert!(
            matches!(err, ApiError::FileNotFound { ref file_id, .. } if file_id == "67890"),
            "got {err:?}"
        );
    }

    #[tokio::test]
    async fn test_download_page_non_success_status_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/apiv11/Mod/1/DownloadPage"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.download_page("1").await.unwrap_err();
        assert!(
            matches!(err, ApiError::HttpStatus { status: 503, .. }),
            "got {err:?}"
        );
    }

    #[tokio::test]
    async fn test_download_page_invalid_json_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/apiv11/Mod/1/DownloadPage"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.download_page("1").await.unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }), "got {err:?}");
    }
}
