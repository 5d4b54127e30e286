//! Persisted destination directory.
//!
//! The only setting the tool remembers is where mods get installed. It lives
//! in a one-line `path.txt` inside a `data/` directory next to the executable,
//! and is resolved at startup in this order:
//!
//! 1. An explicit override (for example `--dest`), when it exists on disk
//! 2. The cached value, when the directory it names still exists
//! 3. An interactive prompt that repeats until an existing path is entered
//!
//! Whatever wins in (1) or (3) is written back so the next run skips the prompt.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::console::Prompter;

/// Directory name (next to the executable) that holds persisted state.
pub const DATA_DIR_NAME: &str = "data";

/// File inside the data directory holding the destination path.
pub const PATH_FILE_NAME: &str = "path.txt";

const DESTINATION_PROMPT: &str = "Enter the path to your Ultimate 'mods' directory:";

/// Errors from reading or writing persisted settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file or its directory could not be read or written.
    #[error("IO error accessing settings at {path}: {source}")]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },

    /// The console failed while prompting for a destination.
    #[error("could not read destination from console: {0}")]
    Console(#[source] io::Error),

    /// The location of the running executable could not be determined.
    #[error("could not locate the running executable: {0}")]
    ExecutableLocation(#[source] io::Error),
}

impl SettingsError {
    fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Reads and writes the cached destination path.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    data_dir: PathBuf,
}

impl SettingsStore {
    /// Store rooted at an explicit data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Store rooted at `data/` beside the running executable.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::ExecutableLocation`] if the executable path
    /// cannot be resolved.
    pub fn beside_executable() -> Result<Self, SettingsError> {
        let exe = std::env::current_exe().map_err(SettingsError::ExecutableLocation)?;
        let exe_dir = exe
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        Ok(Self::new(exe_dir.join(DATA_DIR_NAME)))
    }

    /// Directory holding persisted state.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Full path of the settings file.
    #[must_use]
    pub fn path_file(&self) -> PathBuf {
        self.data_dir.join(PATH_FILE_NAME)
    }

    /// Creates the data directory if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Io`] if the directory cannot be created.
    pub fn ensure_data_dir(&self) -> Result<(), SettingsError> {
        fs::create_dir_all(&self.data_dir).map_err(|e| SettingsError::io(&self.data_dir, e))
    }

    /// Returns the cached destination if it is set and still exists.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Io`] if the settings file exists but cannot be read.
    pub fn load_destination(&self) -> Result<Option<PathBuf>, SettingsError> {
        let path_file = self.path_file();
        let raw = match fs::read_to_string(&path_file) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SettingsError::io(path_file, e)),
        };

        let cached = raw.trim();
        if cached.is_empty() {
            return Ok(None);
        }

        let destination = PathBuf::from(cached);
        if destination.is_dir() {
            Ok(Some(destination))
        } else {
            warn!(
                settings = %path_file.display(),
                destination = %destination.display(),
                "cached destination no longer exists"
            );
            Ok(None)
        }
    }

    /// Persists `destination` as the single line of the settings file.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Io`] if the data directory or file cannot be written.
    pub fn save_destination(&self, destination: &Path) -> Result<(), SettingsError> {
        self.ensure_data_dir()?;
        let path_file = self.path_file();
        fs::write(&path_file, destination.to_string_lossy().as_bytes())
            .map_err(|e| SettingsError::io(&path_file, e))?;
        debug!(settings = %path_file.display(), "destination saved");
        Ok(())
    }

    /// Forgets the cached destination.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Io`] if the file exists but cannot be removed.
    pub fn clear_destination(&self) -> Result<(), SettingsError> {
        let path_file = self.path_file();
        match fs::remove_file(&path_file) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SettingsError::io(path_file, e)),
        }
    }
}

/// Returns an existing destination directory, prompting until one is supplied.
///
/// See the module docs for the resolution order. An override that does not
/// exist is reported and ignored.
///
/// # Errors
///
/// Fails only on settings-file IO errors or when the console input closes.
#[instrument(level = "debug", skip(store, console))]
pub fn resolve_destination<P: Prompter + ?Sized>(
    store: &SettingsStore,
    console: &mut P,
    override_dir: Option<&Path>,
) -> Result<PathBuf, SettingsError> {
    store.ensure_data_dir()?;

    if let Some(dir) = override_dir {
        if dir.is_dir() {
            store.save_destination(dir)?;
            return Ok(dir.to_path_buf());
        }
        warn!(destination = %dir.display(), "destination override does not exist; ignoring");
    }

    if let Some(cached) = store.load_destination()? {
        debug!(destination = %cached.display(), "using cached destination");
        return Ok(cached);
    }

    let destination = loop {
        let answer = console
            .prompt(DESTINATION_PROMPT)
            .map_err(SettingsError::Console)?;
        let candidate = PathBuf::from(answer);
        if !candidate.as_os_str().is_empty() && candidate.is_dir() {
            break candidate;
        }
        console
            .say("Path does not exist. Please try again.")
            .map_err(SettingsError::Console)?;
    };

    store.save_destination(&destination)?;
    info!(destination = %destination.display(), "destination configured");
    Ok(destination)
}
