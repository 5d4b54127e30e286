//! Wire types for the GameBanana `DownloadPage` endpoint.

use std::fmt;

use serde::Deserialize;

/// Body of `GET /apiv11/Mod/{id}/DownloadPage`.
///
/// Only the fields the tool uses are decoded; everything else is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadPage {
    /// Downloadable files attached to the mod.
    #[serde(rename = "_aFiles", default)]
    pub files: Vec<FileRecord>,
}

/// One downloadable file of a mod.
#[derive(Debug, Clone, Deserialize)]
pub struct FileRecord {
    /// Row identifier; matches the `#FileInfo_` token of a share link.
    #[serde(rename = "_idRow")]
    pub id: RowId,
    /// File name as uploaded, including its archive extension.
    #[serde(rename = "_sFile")]
    pub file_name: String,
    /// Size in bytes, when reported.
    #[serde(rename = "_nFilesize", default)]
    pub size: Option<u64>,
}

/// Row identifier, which the API emits as a number but older payloads quote.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RowId {
    Number(u64),
    Text(String),
}

impl RowId {
    /// True when this id is textually equal to `file_id`.
    #[must_use]
    pub fn matches(&self, file_id: &str) -> bool {
        match self {
            Self::Number(n) => n.to_string() == file_id,
            Self::Text(s) => s == file_id,
        }
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl DownloadPage {
    /// Finds the record whose id equals `file_id`.
    #[must_use]
    pub fn find_file(&self, file_id: &str) -> Option<&FileRecord> {
        self.files.iter().find(|record| record.id.matches(file_id))
    }
}
