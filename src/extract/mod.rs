//! Archive extraction.
//!
//! Dispatch is purely on the (case-insensitive) file extension; exactly three
//! formats are supported. Each routine unpacks the whole archive into the
//! target directory, keeping the archive's internal folder structure, and
//! reports which top-level directories of the target its entries landed in.
//! Those are read from the archive's own entry names, so a folder that already
//! existed before extraction is still reported.

mod error;

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, instrument};

pub use error::ExtractError;

/// Supported archive format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    Rar,
    SevenZ,
}

impl ArchiveFormat {
    /// Detects the format from the file extension, ignoring case.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "zip" => Some(Self::Zip),
            "rar" => Some(Self::Rar),
            "7z" => Some(Self::SevenZ),
            _ => None,
        }
    }

    /// Canonical extension, without the dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::Rar => "rar",
            Self::SevenZ => "7z",
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}", self.extension())
    }
}

/// Unpacks `archive` into `dest` using the routine for `format`.
///
/// # Returns
///
/// The directories directly inside `dest` that hold the archive's entries,
/// sorted. Top-level files are not included.
///
/// # Errors
///
/// Returns [`ExtractError`] when the archive cannot be read or an entry
/// cannot be written.
#[instrument(skip_all, fields(archive = %archive.display(), %format))]
pub fn extract_archive(
    archive: &Path,
    format: ArchiveFormat,
    dest: &Path,
) -> Result<Vec<PathBuf>, ExtractError> {
    info!(dest = %dest.display(), "extracting");
    fs::create_dir_all(dest).map_err(|e| ExtractError::io(dest, e))?;

    let entry_names = match format {
        ArchiveFormat::Zip => extract_zip(archive, dest)?,
        ArchiveFormat::Rar => extract_rar(archive, dest)?,
        ArchiveFormat::SevenZ => extract_7z(archive, dest)?,
    };

    let roots = top_level_dirs(dest, &entry_names);
    debug!(entries = entry_names.len(), roots = roots.len(), "archive unpacked");
    Ok(roots)
}

/// Runs [`extract_archive`] on the blocking thread pool.
///
/// # Errors
///
/// Same as [`extract_archive`], plus [`ExtractError::Task`] if the worker dies.
pub async fn extract_archive_blocking(
    archive: PathBuf,
    format: ArchiveFormat,
    dest: PathBuf,
) -> Result<Vec<PathBuf>, ExtractError> {
    tokio::task::spawn_blocking(move || extract_archive(&archive, format, &dest))
        .await
        .map_err(|e| ExtractError::Task(e.to_string()))?
}

/// Existing directories in `dest` named by the first component of an entry.
fn top_level_dirs(dest: &Path, entry_names: &[PathBuf]) -> Vec<PathBuf> {
    let firsts: BTreeSet<OsString> = entry_names
        .iter()
        .filter_map(|name| match name.components().next() {
            Some(Component::Normal(first)) => Some(first.to_os_string()),
            _ => None,
        })
        .collect();

    firsts
        .into_iter()
        .map(|first| dest.join(first))
        .filter(|path| path.is_dir())
        .collect()
}

/// Archive entry names use `/` or `\` depending on the packer.
fn entry_path(name: &str) -> PathBuf {
    PathBuf::from(name.replace('\\', "/"))
}

fn extract_zip(archive_path: &Path, dest: &Path) -> Result<Vec<PathBuf>, ExtractError> {
    let file = fs::File::open(archive_path).map_err(|e| ExtractError::io(archive_path, e))?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| ExtractError::zip(archive_path, e))?;

    let mut names = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| ExtractError::zip(archive_path, e))?;

        let Some(entry_path) = entry.enclosed_name() else {
            debug!(name = entry.name(), "skipping entry with unsafe path");
            continue;
        };
        let output_path = dest.join(&entry_path);
        names.push(entry_path);

        if entry.is_dir() {
            fs::create_dir_all(&output_path).map_err(|e| ExtractError::io(&output_path, e))?;
            continue;
        }

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ExtractError::io(parent, e))?;
        }
        let mut outfile =
            fs::File::create(&output_path).map_err(|e| ExtractError::io(&output_path, e))?;
        io::copy(&mut entry, &mut outfile).map_err(|e| ExtractError::io(&output_path, e))?;
    }

    Ok(names)
}

fn extract_7z(archive_path: &Path, dest: &Path) -> Result<Vec<PathBuf>, ExtractError> {
    let mut names = Vec::new();
    sevenz_rust::decompress_file_with_extract_fn(archive_path, dest, |entry, reader, target| {
        names.push(entry_path(entry.name()));
        sevenz_rust::default_entry_extract_fn(entry, reader, target)
    })
    .map_err(|e| ExtractError::SevenZ {
        path: archive_path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(names)
}

fn extract_rar(archive_path: &Path, dest: &Path) -> Result<Vec<PathBuf>, ExtractError> {
    let archive_str = archive_path.to_str().ok_or_else(|| ExtractError::NonUtf8Path {
        path: archive_path.to_path_buf(),
    })?;
    let dest_str = dest.to_str().ok_or_else(|| ExtractError::NonUtf8Path {
        path: dest.to_path_buf(),
    })?;

    let archive = rar::Archive::extract_all(archive_str, dest_str, "").map_err(|e| {
        ExtractError::Rar {
            path: archive_path.to_path_buf(),
            message: format!("{e:?}"),
        }
    })?;
    Ok(archive.files.iter().map(|f| entry_path(&f.name)).collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use super::*;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        let file = fs::File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = SimpleFileOptions::default();
        for (name, body) in entries {
            if name.ends_with('/') {
                writer.add_directory(*name, options).unwrap();
            } else {
                writer.start_file(*name, options).unwrap();
                writer.write_all(body.as_bytes()).unwrap();
            }
        }
        writer.finish().unwrap();
    }

    fn write_7z(path: &Path, scratch: &Path, entries: &[(&str, &str)]) {
        let mut writer = sevenz_rust::SevenZWriter::create(path).unwrap();
        for (i, (name, body)) in entries.iter().enumerate() {
            let source = scratch.join(format!("entry{i}.src"));
            fs::write(&source, body).unwrap();
            writer
                .push_archive_entry(
                    sevenz_rust::SevenZArchiveEntry::from_path(&source, (*name).to_string()),
                    Some(fs::File::open(&source).unwrap()),
                )
                .unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn test_from_path_is_case_insensitive() {
        assert_eq!(
            ArchiveFormat::from_path(Path::new("a.zip")),
            Some(ArchiveFormat::Zip)
        );
        assert_eq!(
            ArchiveFormat::from_path(Path::new("A.ZIP")),
            Some(ArchiveFormat::Zip)
        );
        assert_eq!(
            ArchiveFormat::from_path(Path::new("pack.Rar")),
            Some(ArchiveFormat::Rar)
        );
        assert_eq!(
            ArchiveFormat::from_path(Path::new("pack.7Z")),
            Some(ArchiveFormat::SevenZ)
        );
    }

    #[test]
    fn test_from_path_rejects_other_extensions() {
        for name in ["a.tar.gz", "a.exe", "zip", "a.zip.txt", "noext"] {
            assert_eq!(ArchiveFormat::from_path(Path::new(name)), None, "{name}");
        }
    }

    #[test]
    fn test_display_uses_dotted_extension() {
        assert_eq!(ArchiveFormat::SevenZ.to_string(), ".7z");
    }

    #[test]
    fn test_extract_zip_preserves_structure() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("skin.zip");
        write_zip(
            &archive,
            &[
                ("skin/", ""),
                ("skin/model.numdlb", "model"),
                ("skin/textures/body.nutexb", "texture"),
            ],
        );
        let dest = temp.path().join("mods");

        let roots = extract_archive(&archive, ArchiveFormat::Zip, &dest).unwrap();

        assert_eq!(roots, vec![dest.join("skin")]);
        assert_eq!(
            fs::read(dest.join("skin").join("model.numdlb")).unwrap(),
            b"model"
        );
        assert_eq!(
            fs::read(dest.join("skin").join("textures").join("body.nutexb")).unwrap(),
            b"texture"
        );
    }

    #[test]
    fn test_extract_reports_folders_that_already_existed() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("skin.zip");
        write_zip(
            &archive,
            &[("skin/model.numdlb", "model"), ("readme.txt", "r")],
        );
        let dest = temp.path().join("mods");
        fs::create_dir_all(dest.join("skin")).unwrap();
        fs::create_dir_all(dest.join("other_mod")).unwrap();

        let roots = extract_archive(&archive, ArchiveFormat::Zip, &dest).unwrap();

        assert_eq!(roots, vec![dest.join("skin")]);
    }

    #[test]
    fn test_extract_7z_preserves_structure() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("skin.7z");
        write_7z(
            &archive,
            temp.path(),
            &[
                ("skin/model.numdlb", "model"),
                ("skin/textures/body.nutexb", "texture"),
            ],
        );
        let dest = temp.path().join("mods");

        let roots = extract_archive(&archive, ArchiveFormat::SevenZ, &dest).unwrap();

        assert_eq!(roots, vec![dest.join("skin")]);
        assert_eq!(
            fs::read_to_string(dest.join("skin").join("model.numdlb")).unwrap(),
            "model"
        );
        assert_eq!(
            fs::read_to_string(dest.join("skin").join("textures").join("body.nutexb")).unwrap(),
            "texture"
        );
    }

    #[test]
    fn test_extract_rar_writes_entries() {
        let temp = TempDir::new().unwrap();
        let archive = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join("single_file.rar");
        let dest = temp.path().join("mods");

        let roots = extract_archive(&archive, ArchiveFormat::Rar, &dest).unwrap();

        assert!(roots.is_empty(), "a top-level file is not a root: {roots:?}");
        assert_eq!(
            fs::read_to_string(dest.join("model.numdlb")).unwrap(),
            "rar model\n"
        );
    }

    #[test]
    fn test_top_level_dirs_ignores_unsafe_and_missing_names() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("skin")).unwrap();
        let names = [
            PathBuf::from("skin/a.bin"),
            PathBuf::from("skin/b.bin"),
            PathBuf::from("../escape/c.bin"),
            PathBuf::from("/abs/d.bin"),
            PathBuf::from("never_written/e.bin"),
        ];

        assert_eq!(top_level_dirs(temp.path(), &names), vec![temp.path().join("skin")]);
    }

    #[test]
    fn test_entry_path_normalizes_backslashes() {
        assert_eq!(entry_path("skin\\model.numdlb"), PathBuf::from("skin/model.numdlb"));
    }

    #[test]
    fn test_extract_corrupt_zip_fails() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("bad.zip");
        fs::write(&archive, b"definitely not a zip").unwrap();

        let err = extract_archive(&archive, ArchiveFormat::Zip, temp.path()).unwrap_err();
        assert!(matches!(err, ExtractError::Zip { .. }), "got {err:?}");
    }

    #[test]
    fn test_extract_corrupt_7z_fails() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("bad.7z");
        fs::write(&archive, b"definitely not a 7z archive").unwrap();

        let err = extract_archive(&archive, ArchiveFormat::SevenZ, &temp.path().join("out"))
            .unwrap_err();
        assert!(matches!(err, ExtractError::SevenZ { .. }), "got {err:?}");
    }

    #[test]
    fn test_extract_corrupt_rar_fails() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("bad.rar");
        fs::write(&archive, b"definitely not a rar archive").unwrap();

        let err = extract_archive(&archive, ArchiveFormat::Rar, &temp.path().join("out"))
            .unwrap_err();
        assert!(matches!(err, ExtractError::Rar { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn test_extract_archive_blocking_runs_zip() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("a.zip");
        write_zip(&archive, &[("a.txt", "a")]);
        let dest = temp.path().join("out");

        let roots = extract_archive_blocking(archive, ArchiveFormat::Zip, dest.clone())
            .await
            .unwrap();
        assert!(roots.is_empty());
        assert!(dest.join("a.txt").exists());
    }
}
