//! Remote host endpoints.

use url::Url;

/// Canonical host that share links point at.
pub const DEFAULT_BASE_URL: &str = "https://gamebanana.com";

/// Base URL from which the metadata and download endpoints are derived.
///
/// Defaults to the public host; tests and mirrors point it elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    base: String,
}

impl Default for Site {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Site {
    /// Creates a site rooted at `base`, e.g. `http://127.0.0.1:4000`.
    ///
    /// # Errors
    ///
    /// Returns the parse error when `base` is not an absolute URL.
    pub fn new(base: &str) -> Result<Self, url::ParseError> {
        let parsed = Url::parse(base)?;
        Ok(Self {
            base: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// Base URL without trailing slash.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// `GET` endpoint listing the downloadable files of a mod.
    #[must_use]
    pub fn download_page_url(&self, mod_id: &str) -> String {
        format!("{}/apiv11/Mod/{mod_id}/DownloadPage", self.base)
    }

    /// Binary download endpoint for a single file.
    #[must_use]
    pub fn file_download_url(&self, file_id: &str) -> String {
        format!("{}/dl/{file_id}", self.base)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_site_endpoints() {
        let site = Site::default();
        assert_eq!(
            site.download_page_url("12345"),
            "https://gamebanana.com/apiv11/Mod/12345/DownloadPage"
        );
        assert_eq!(
            site.file_download_url("67890"),
            "https://gamebanana.com/dl/67890"
        );
    }

    #[test]
    fn test_site_new_strips_trailing_slash() {
        let site = Site::new("http://127.0.0.1:4000/").unwrap();
        assert_eq!(site.base(), "http://127.0.0.1:4000");
        assert_eq!(site.file_download_url("1"), "http://127.0.0.1:4000/dl/1");
    }

    #[test]
    fn test_site_new_rejects_relative_url() {
        assert!(Site::new("gamebanana.com").is_err());
    }
}
