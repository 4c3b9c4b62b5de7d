//! High-level pipeline: validate → authenticate → scan → upload → verify → delete.
//!
//! This module holds the orchestration for a single archive run:
//!   - validates the raw options and aborts before any network call if a
//!     required setting is missing
//!   - authenticates once through an [`Authenticator`]
//!   - scans the archive path for stale files, producing the full list up front
//!   - uploads each file in turn, compares the local and remote checksums and
//!     deletes the local copy only when deletion is enabled and they match
//!
//! Every failure is fatal: the first error aborts the run and is returned to
//! the caller. Nothing is retried and nothing runs concurrently.
//!
//! # Navigation
//! - Entrypoints: [`run`], [`archive`]
//! - Output: [`ArchiveReport`]

use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, error, info, Instrument};

use crate::contract::{Authenticator, ObjectStore};
use crate::error::ArchiveError;
use crate::files;
use crate::options::{ArchiveOptions, RawOptions};
use crate::remote;

/// Outcome of a successful run, in upload order.
#[derive(Debug, Default, Serialize)]
pub struct ArchiveReport {
    pub files: Vec<ArchivedFile>,
}

impl ArchiveReport {
    pub fn deleted(&self) -> usize {
        self.files.iter().filter(|f| f.deleted).count()
    }
}

/// One verified upload.
#[derive(Debug, Clone, Serialize)]
pub struct ArchivedFile {
    pub local_path: PathBuf,
    pub object_name: String,
    pub local_checksum: String,
    pub remote_checksum: String,
    pub deleted: bool,
}

/// Runs a full archive from unvalidated options.
pub async fn run<A>(raw: RawOptions, authenticator: &A) -> Result<ArchiveReport, ArchiveError>
where
    A: Authenticator + ?Sized,
{
    let options = match raw.validate() {
        Ok(options) => options,
        Err(e) => {
            error!(error = %e, "[ARCHIVE][ERROR] Required configuration missing");
            return Err(e);
        }
    };

    info!(auth_url = %options.credentials.auth_url, "[ARCHIVE] Authenticating");
    let store = match authenticator.authenticate(&options.credentials).await {
        Ok(store) => store,
        Err(e) => {
            error!(error = %e, "[ARCHIVE][ERROR] Authentication failed");
            return Err(e.into());
        }
    };
    info!("[ARCHIVE] Authenticated");

    archive(&options, store.as_ref()).await
}

/// Archives every stale file under `options.archive_path` through `store`.
pub async fn archive<S>(options: &ArchiveOptions, store: &S) -> Result<ArchiveReport, ArchiveError>
where
    S: ObjectStore + ?Sized,
{
    let span = tracing::info_span!(
        "archive",
        container = %options.container,
        root = %options.archive_path.display()
    );
    archive_files(options, store).instrument(span).await
}

async fn archive_files<S>(options: &ArchiveOptions, store: &S) -> Result<ArchiveReport, ArchiveError>
where
    S: ObjectStore + ?Sized,
{
    info!("[ARCHIVE] Starting archive run");

    let candidates = match files::stale_files(&options.archive_path, options.staleness_threshold) {
        Ok(found) => found,
        Err(e) => {
            error!(error = %e, "[ARCHIVE][ERROR] Scan failed");
            return Err(e.into());
        }
    };
    info!(candidates = candidates.len(), "[ARCHIVE] Scan complete");
    for (i, path) in candidates.iter().enumerate() {
        debug!(index = i, path = %path.display(), "[ARCHIVE] Candidate");
    }

    let mut report = ArchiveReport::default();

    for path in candidates {
        debug!(file = %path.display(), "[ARCHIVE] Processing file");

        let local_checksum = files::md5_hex(&path).map_err(|e| {
            error!(file = %path.display(), error = %e, "[ARCHIVE][ERROR] Local checksum failed");
            e
        })?;
        debug!(file = %path.display(), md5 = %local_checksum, "[ARCHIVE] Local checksum");

        let remote_checksum =
            remote::put_object(store, &options.container, &path, &options.archive_path)
                .await
                .map_err(|e| {
                    error!(file = %path.display(), error = %e, "[ARCHIVE][ERROR][UPLOAD] Upload failed");
                    e
                })?;
        debug!(file = %path.display(), etag = %remote_checksum, "[ARCHIVE] Remote checksum");

        if local_checksum != remote_checksum {
            error!(
                file = %path.display(),
                local = %local_checksum,
                remote = %remote_checksum,
                "[ARCHIVE][ERROR] Checksum mismatch"
            );
            return Err(ArchiveError::ChecksumMismatch {
                path,
                local: local_checksum,
                remote: remote_checksum,
            });
        }

        let deleted = if options.delete_after_upload {
            debug!(file = %path.display(), "[ARCHIVE] Deleting local copy");
            files::delete(&path)?;
            true
        } else {
            false
        };

        info!(file = %path.display(), deleted, "[ARCHIVE] Archived");
        report.files.push(ArchivedFile {
            object_name: remote::object_name(&path, &options.archive_path),
            local_path: path,
            local_checksum,
            remote_checksum,
            deleted,
        });
    }

    match serde_json::to_string_pretty(&report) {
        Ok(json) => debug!(json = %json, "[ARCHIVE][DEBUG] Archive report as JSON"),
        Err(e) => error!(error = ?e, "[ARCHIVE][DEBUG] Failed to serialize archive report"),
    }
    info!(
        archived = report.files.len(),
        deleted = report.deleted(),
        "[ARCHIVE] Archive run complete"
    );
    Ok(report)
}
