//! Error types for share-link parsing.

use thiserror::Error;

/// Errors that can occur while parsing a share link.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    /// The link does not start with any accepted prefix.
    #[error("invalid download link format '{link}': unsupported address\n  Suggestion: {suggestion}")]
    UnsupportedLink {
        /// The rejected link.
        link: String,
        /// How to fix the issue.
        suggestion: &'static str,
    },

    /// The final path segment does not split into two identifiers.
    #[error("invalid download link format '{link}': expected '<id>#FileInfo_<file id>' at the end")]
    MalformedTail {
        /// The rejected link.
        link: String,
    },
}

impl LinkError {
    /// Creates an `UnsupportedLink` error.
    #[must_use]
    pub fn unsupported(link: &str) -> Self {
        Self::UnsupportedLink {
            link: link.to_string(),
            suggestion: "Copy the link from the mod's download button on gamebanana.com",
        }
    }

    /// Creates a `MalformedTail` error.
    #[must_use]
    pub fn malformed_tail(link: &str) -> Self {
        Self::MalformedTail {
            link: link.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_message_mentions_link_and_format() {
        let msg = LinkError::unsupported("https://example.com/x").to_string();
        assert!(msg.contains("invalid download link format"), "{msg}");
        assert!(msg.contains("https://example.com/x"), "{msg}");
        assert!(msg.contains("gamebanana.com"), "{msg}");
    }

    #[test]
    fn test_malformed_tail_message_shows_expected_shape() {
        let msg = LinkError::malformed_tail("https://gamebanana.com/dl/1").to_string();
        assert!(msg.contains("#FileInfo_"), "{msg}");
    }
}
