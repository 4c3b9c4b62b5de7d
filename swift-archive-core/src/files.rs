//! Local side of an archive run: finding stale files, checksumming them and
//! removing them once they are safely stored remotely.

use std::cmp::Ordering;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tracing::{debug, error, info};
use walkdir::{DirEntry, WalkDir};

use crate::error::LocalFileError;

/// Read size used when streaming a file through the hasher.
pub const CHUNK_SIZE: usize = 4096;

/// A regular file discovered during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub modified: SystemTime,
}

/// Lists every regular, non-symlink file under `root` whose last modification
/// is more than `threshold` ago.
pub fn stale_files(root: &Path, threshold: Duration) -> Result<Vec<PathBuf>, LocalFileError> {
    stale_files_at(root, threshold, SystemTime::now())
}

/// Same as [`stale_files`], measuring age against `now`.
///
/// Within a directory, files are listed before subdirectories and entries are
/// sorted by name, so the result is stable for a fixed tree.
pub fn stale_files_at(
    root: &Path,
    threshold: Duration,
    now: SystemTime,
) -> Result<Vec<PathBuf>, LocalFileError> {
    info!(root = %root.display(), threshold_secs = threshold.as_secs_f64(), "Scanning for stale files");
    let mut stale = Vec::new();

    // A root that is a plain file has no entries below it.
    if fs::metadata(root).is_ok_and(|meta| !meta.is_dir()) {
        info!(root = %root.display(), "Archive root is not a directory, nothing to scan");
        return Ok(stale);
    }

    for entry_res in WalkDir::new(root).follow_links(false).sort_by(files_first) {
        let entry = entry_res.map_err(|e| walk_error(root, e))?;
        if entry.path_is_symlink() || !entry.file_type().is_file() {
            debug!(path = %entry.path().display(), "Skipping non-regular entry");
            continue;
        }

        let file = FileEntry {
            modified: modified_at(entry.path())?,
            path: entry.into_path(),
        };
        if is_stale(file.modified, now, threshold) {
            debug!(path = %file.path.display(), "Stale file");
            stale.push(file.path);
        }
    }

    info!(count = stale.len(), "Completed scan");
    Ok(stale)
}

/// Whether a file last modified at `modified` is strictly older than
/// `threshold` at `now`. A zero threshold accepts every file.
pub fn is_stale(modified: SystemTime, now: SystemTime, threshold: Duration) -> bool {
    if threshold.is_zero() {
        return true;
    }
    match now.duration_since(modified) {
        Ok(age) => age > threshold,
        // modified in the future
        Err(_) => false,
    }
}

/// Last modification time of `path`.
pub fn modified_at(path: &Path) -> Result<SystemTime, LocalFileError> {
    fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map_err(|e| {
            error!(path = %path.display(), error = %e, "Failed to stat file");
            LocalFileError::from_io(path, e)
        })
}

/// Lowercase hex MD5 of the file contents, read in [`CHUNK_SIZE`] chunks.
pub fn md5_hex(path: &Path) -> Result<String, LocalFileError> {
    let mut file = File::open(path).map_err(|e| LocalFileError::from_io(path, e))?;
    let mut context = md5::Context::new();
    let mut buf = [0u8; CHUNK_SIZE];

    loop {
        match file.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => context.consume(&buf[..n]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(LocalFileError::from_io(path, e)),
        }
    }

    Ok(format!("{:x}", context.compute()))
}

/// Removes a single file. Directories are refused.
pub fn delete(path: &Path) -> Result<(), LocalFileError> {
    let meta = fs::symlink_metadata(path).map_err(|e| LocalFileError::from_io(path, e))?;
    if meta.is_dir() {
        error!(path = %path.display(), "Refusing to delete a directory");
        return Err(LocalFileError::IsDirectory {
            path: path.to_path_buf(),
        });
    }
    fs::remove_file(path).map_err(|e| LocalFileError::from_io(path, e))?;
    info!(path = %path.display(), "Deleted local file");
    Ok(())
}

fn files_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

fn walk_error(root: &Path, err: walkdir::Error) -> LocalFileError {
    let path = err.path().unwrap_or(root).to_path_buf();
    let message = err.to_string();
    match err.into_io_error() {
        Some(io_err) => LocalFileError::from_io(&path, io_err),
        None => LocalFileError::Unknown { path, message },
    }
}
