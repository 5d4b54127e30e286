//! Mod metadata lookup.
//!
//! Resolves the human-readable file name of a share link's file id by
//! scanning the mod's `DownloadPage` file list.
//!
//! # Example
//!
//! ```no_run
//! use modfetch_core::api::ApiClient;
//! use modfetch_core::link::parse_share_link;
//! use modfetch_core::site::Site;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reference = parse_share_link("https://gamebanana.com/dl/12345#FileInfo_67890")?;
//! let client = ApiClient::new(Site::default())?;
//! let name = client.file_name(&reference).await?;
//! println!("{name}");
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod models;

pub use client::ApiClient;
pub use error::ApiError;
pub use models::{DownloadPage, FileRecord, RowId};
