//! Modfetch Core Library
//!
//! Installs a single GameBanana mod from a share link: looks up the file
//! name, downloads the archive, unpacks it into the user's mods directory,
//! and tidies the resulting layout.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`settings`] - Persisted destination directory
//! - [`link`] - Share-link parsing
//! - [`api`] - Mod metadata lookup
//! - [`download`] - Streaming download with length verification
//! - [`extract`] - zip / rar / 7z extraction
//! - [`layout`] - Post-extraction prune and flatten
//! - [`pipeline`] - The end-to-end run

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod console;
pub mod download;
pub mod extract;
pub mod http;
pub mod layout;
pub mod link;
pub mod pipeline;
pub mod settings;
pub mod site;
mod user_agent;

// Re-export commonly used types
pub use api::{ApiClient, ApiError};
pub use console::{Console, Prompter, Terminal};
pub use download::{DownloadError, HttpClient, RetryPolicy};
pub use extract::{ArchiveFormat, ExtractError, extract_archive};
pub use layout::{FlattenMode, FlattenReport, LayoutError};
pub use link::{LinkError, ModReference, parse_share_link};
pub use pipeline::{ExtractionOutcome, PipelineError, RunOptions, RunSummary, run};
pub use settings::{SettingsError, SettingsStore, resolve_destination};
pub use site::Site;
