//! One install run, from share link to flattened mod files.
//!
//! Stages run strictly in order, each handing its result to the next:
//! destination -> link -> file name -> download -> extract -> prune -> flatten.
//! Any stage error ends the run; nothing already written is rolled back except
//! the partial download itself.

use std::io;
use std::path::PathBuf;

use indicatif::ProgressBar;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::api::{ApiClient, ApiError};
use crate::console::Prompter;
use crate::download::{DownloadError, HttpClient, RetryPolicy};
use crate::extract::{ArchiveFormat, ExtractError, extract_archive_blocking};
use crate::layout::{self, FlattenMode, FlattenReport, LayoutError};
use crate::link::{LinkError, ModReference, parse_share_link};
use crate::settings::{SettingsError, SettingsStore, resolve_destination};
use crate::site::Site;

const LINK_PROMPT: &str = "\nPaste the download link for the GameBanana mod:";
const DONE_PROMPT: &str = "\nMod downloaded and extracted successfully\nPress enter to exit";

/// Errors that end a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// Reading the link or writing to the console failed.
    #[error("console error: {0}")]
    Console(#[source] io::Error),

    #[error(transparent)]
    Link(#[from] LinkError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Download(#[from] DownloadError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// The archive could not be deleted after extraction.
    #[error("failed to remove archive {path}: {source}")]
    RemoveArchive {
        /// Archive path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

/// Inputs for a single run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Remote host.
    pub site: Site,
    /// Destination to use (and remember) instead of the cached one.
    pub destination_override: Option<PathBuf>,
    /// Share link; prompted for when absent.
    pub link: Option<String>,
    /// Re-attempt policy for the download.
    pub retry: RetryPolicy,
    /// Depth of the post-extraction flatten.
    pub flatten_mode: FlattenMode,
    /// Wait for Enter after a successful install.
    pub wait_for_exit: bool,
}

/// What happened after the archive was downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionOutcome {
    /// Extension not supported; the download was left as is.
    Unsupported,
    /// Archive extracted, deleted, and the destination normalized.
    Extracted {
        /// Files found in the directories the archive was unpacked into.
        files: usize,
        /// Stray top-level files removed.
        pruned: usize,
        /// Result of the flatten pass.
        flatten: FlattenReport,
    },
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Directory the mod was installed into.
    pub destination: PathBuf,
    /// Identifiers parsed from the link.
    pub reference: ModReference,
    /// File name reported by the API.
    pub file_name: String,
    /// Where the archive was downloaded to.
    pub archive: PathBuf,
    /// Extraction result.
    pub outcome: ExtractionOutcome,
}

/// Runs the whole install pipeline.
///
/// # Errors
///
/// Returns the first stage error; see [`PipelineError`].
#[instrument(skip_all)]
pub async fn run<P: Prompter + ?Sized>(
    options: &RunOptions,
    store: &SettingsStore,
    console: &mut P,
    progress: &ProgressBar,
) -> Result<RunSummary, PipelineError> {
    let destination =
        resolve_destination(store, console, options.destination_override.as_deref())?;
    info!(destination = %destination.display(), "installing into destination");

    let link = match &options.link {
        Some(link) => link.clone(),
        None => console.prompt(LINK_PROMPT).map_err(PipelineError::Console)?,
    };
    let reference = parse_share_link(&link)?;

    let api = ApiClient::new(options.site.clone())?;
    let file_name = api.file_name(&reference).await?;

    let url = options.site.file_download_url(&reference.file_id);
    info!(file = %file_name, "downloading");
    let client = HttpClient::new()?;
    let archive = match client
        .download_with_retry(&url, &destination, &file_name, progress, &options.retry)
        .await
    {
        Ok(path) => {
            progress.finish();
            path
        }
        Err(error) => {
            progress.abandon();
            return Err(error.into());
        }
    };
    info!(path = %archive.display(), "downloaded");

    let Some(format) = ArchiveFormat::from_path(&archive) else {
        warn!(
            path = %archive.display(),
            "downloaded file does not have a valid archive extension; leaving it un-extracted"
        );
        return Ok(RunSummary {
            destination,
            reference,
            file_name,
            archive,
            outcome: ExtractionOutcome::Unsupported,
        });
    };

    let extracted_dirs =
        extract_archive_blocking(archive.clone(), format, destination.clone()).await?;
    std::fs::remove_file(&archive).map_err(|source| PipelineError::RemoveArchive {
        path: archive.clone(),
        source,
    })?;

    let files = layout::count_files(&extracted_dirs);
    let pruned = layout::prune_top_level_files(&destination)?;
    info!(directory = %destination.display(), "flattening directory structure");
    let flatten = layout::flatten(&destination, &extracted_dirs, options.flatten_mode)?;

    if options.wait_for_exit {
        console.pause(DONE_PROMPT).map_err(PipelineError::Console)?;
    }

    Ok(RunSummary {
        destination,
        reference,
        file_name,
        archive,
        outcome: ExtractionOutcome::Extracted {
            files,
            pruned,
            flatten,
        },
    })
}
