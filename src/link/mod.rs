//! Share-link parsing.
//!
//! GameBanana hands out two link shapes for a mod file:
//!
//! - `https://gamebanana.com/dl/<id>#FileInfo_<file id>`
//! - `https://gamebanana.com/mods/download/<id>#FileInfo_<file id>`
//!
//! Both are reduced to a [`ModReference`] by taking the last `/` segment and
//! splitting it on `#FileInfo_`.
//!
//! # Example
//!
//! ```
//! use modfetch_core::link::parse_share_link;
//!
//! let reference = parse_share_link("https://gamebanana.com/dl/12345#FileInfo_67890").unwrap();
//! assert_eq!(reference.mod_id, "12345");
//! assert_eq!(reference.file_id, "67890");
//! ```

mod error;

use std::fmt;

use tracing::{debug, instrument};

pub use error::LinkError;

/// Accepted link prefixes.
pub const SHARE_LINK_PREFIXES: [&str; 2] = [
    "https://gamebanana.com/dl/",
    "https://gamebanana.com/mods/download/",
];

/// Separator between the two identifiers in the last path segment.
pub const FILE_INFO_SEPARATOR: &str = "#FileInfo_";

/// Identifiers extracted from a share link.
///
/// `mod_id` scopes the metadata lookup; `file_id` selects the file to download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModReference {
    /// Token before `#FileInfo_`; used as the mod id in the metadata query.
    pub mod_id: String,
    /// Token after `#FileInfo_`; identifies the downloadable file.
    pub file_id: String,
}

impl fmt::Display for ModReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mod {} / file {}", self.mod_id, self.file_id)
    }
}

/// Parses a pasted share link into its two identifiers.
///
/// # Errors
///
/// - [`LinkError::UnsupportedLink`] if the link starts with neither accepted prefix
/// - [`LinkError::MalformedTail`] if the last segment does not split into two
///   non-empty identifiers
#[instrument(level = "debug")]
pub fn parse_share_link(link: &str) -> Result<ModReference, LinkError> {
    let link = link.trim();

    if !SHARE_LINK_PREFIXES
        .iter()
        .any(|prefix| link.starts_with(prefix))
    {
        return Err(LinkError::unsupported(link));
    }

    let tail = link.rsplit('/').next().unwrap_or_default();
    let parts: Vec<&str> = tail.split(FILE_INFO_SEPARATOR).collect();
    let [mod_id, file_id] = parts.as_slice() else {
        return Err(LinkError::malformed_tail(link));
    };
    if mod_id.is_empty() || file_id.is_empty() {
        return Err(LinkError::malformed_tail(link));
    }

    let reference = ModReference {
        mod_id: (*mod_id).to_string(),
        file_id: (*file_id).to_string(),
    };
    debug!(%reference, "parsed share link");
    Ok(reference)
}
