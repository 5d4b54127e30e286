//! Destination directory normalization after extraction.
//!
//! Two passes run once an archive has been unpacked into the destination:
//!
//! 1. [`prune_top_level_files`] deletes every regular file sitting directly in
//!    the destination. Directories (symlinked ones included) are left alone.
//! 2. [`flatten`] moves files out of the directories the archive was unpacked
//!    into and drops them directly into the destination.
//!
//! Only the directories named by the archive's entries are flattened. Other
//! folders already in the destination keep their contents.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

/// Errors from reading or rearranging the destination directory.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// A directory could not be listed or an entry could not be moved/removed.
    #[error("IO error reorganizing {path}: {source}")]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Walking an extracted directory failed.
    #[error("failed to walk extracted files: {0}")]
    Walk(#[from] walkdir::Error),
}

impl LayoutError {
    fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// How deep [`flatten`] reaches into each extracted directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlattenMode {
    /// Only files directly inside each extracted directory.
    Shallow,
    /// Files at any depth.
    #[default]
    Full,
}

/// Outcome of a [`flatten`] pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlattenReport {
    /// Files moved into the destination root.
    pub moved: usize,
    /// Files left in place because the root already had an entry with that name.
    pub skipped: Vec<PathBuf>,
}

/// Counts the files (at any depth) under `roots`.
#[must_use]
pub fn count_files(roots: &[PathBuf]) -> usize {
    roots
        .iter()
        .flat_map(|root| WalkDir::new(root).min_depth(1))
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .count()
}

/// Removes every regular file directly inside `dir`; returns how many.
///
/// Symlinks that resolve to files are removed (the link, not its target).
/// Directories and symlinks to directories are untouched.
///
/// # Errors
///
/// Returns [`LayoutError::Io`] if `dir` cannot be listed or a file cannot be removed.
#[instrument(level = "debug", skip_all, fields(dir = %dir.display()))]
pub fn prune_top_level_files(dir: &Path) -> Result<usize, LayoutError> {
    let mut removed = 0;
    for entry in fs::read_dir(dir).map_err(|e| LayoutError::io(dir, e))? {
        let entry = entry.map_err(|e| LayoutError::io(dir, e))?;
        let path = entry.path();
        if path.is_file() {
            fs::remove_file(&path).map_err(|e| LayoutError::io(&path, e))?;
            debug!(path = %path.display(), "removed stray file");
            removed += 1;
        }
    }
    if removed > 0 {
        info!(removed, "cleaned extraneous root items");
    }
    Ok(removed)
}

/// Moves files from each directory in `roots` into `dir`.
///
/// Directories themselves stay where they are, emptied or not. A file whose
/// name is already taken in `dir` is not overwritten; it is left in place and
/// listed in [`FlattenReport::skipped`].
///
/// # Errors
///
/// Returns [`LayoutError`] if a root cannot be walked or a move fails.
#[instrument(level = "debug", skip_all, fields(dir = %dir.display(), ?mode))]
pub fn flatten(
    dir: &Path,
    roots: &[PathBuf],
    mode: FlattenMode,
) -> Result<FlattenReport, LayoutError> {
    let max_depth = match mode {
        FlattenMode::Shallow => 1,
        FlattenMode::Full => usize::MAX,
    };

    // Collect first: moving while walking would let the walker see moved files.
    let mut files = Vec::new();
    for root in roots {
        for entry in WalkDir::new(root).min_depth(1).max_depth(max_depth) {
            let entry = entry?;
            if !entry.file_type().is_dir() {
                files.push(entry.into_path());
            }
        }
    }

    let mut report = FlattenReport::default();
    for source in files {
        let Some(name) = source.file_name() else {
            continue;
        };
        let target = dir.join(name);
        if fs::symlink_metadata(&target).is_ok() {
            warn!(
                file = %source.display(),
                "a file with this name already exists in the destination; leaving it in place"
            );
            report.skipped.push(source);
            continue;
        }
        fs::rename(&source, &target).map_err(|e| LayoutError::io(&source, e))?;
        report.moved += 1;
    }

    info!(moved = report.moved, skipped = report.skipped.len(), "flattened directory structure");
    Ok(report)
}
