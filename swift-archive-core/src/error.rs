//! Error taxonomy for an archive run.
//!
//! Each layer has its own enum: authentication, local filesystem and remote
//! store. [`ArchiveError`] wraps all three plus the failures the orchestrator
//! detects itself (missing configuration, checksum mismatch).

use std::io;
use std::path::{Path, PathBuf};

/// Failures while establishing the Keystone session.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Unable to establish connection: {0}")]
    ConnectionFailure(String),

    #[error("Authentication rejected with HTTP status {status}")]
    Rejected { status: u16 },

    #[error("Authentication response did not contain a token")]
    MissingToken,

    #[error("Invalid authentication response: {0}")]
    InvalidResponse(String),

    #[error("Service catalog has no public object-store endpoint")]
    NoObjectStoreEndpoint,
}

/// Failures touching files on the local disk.
#[derive(Debug, thiserror::Error)]
pub enum LocalFileError {
    #[error("File \"{}\" could not be found", .path.display())]
    NotFound { path: PathBuf },

    #[error("Permission error with \"{}\"", .path.display())]
    PermissionDenied { path: PathBuf },

    #[error("\"{}\" is a directory, will not delete directories", .path.display())]
    IsDirectory { path: PathBuf },

    #[error("Unknown error with \"{}\": {message}", .path.display())]
    Unknown { path: PathBuf, message: String },
}

impl LocalFileError {
    /// Classifies an I/O error raised while working on `path`.
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        let path = path.to_path_buf();
        match err.kind() {
            io::ErrorKind::NotFound => LocalFileError::NotFound { path },
            io::ErrorKind::PermissionDenied => LocalFileError::PermissionDenied { path },
            _ => LocalFileError::Unknown {
                path,
                message: err.to_string(),
            },
        }
    }
}

/// Failures uploading to the object store.
#[derive(Debug, thiserror::Error)]
pub enum RemoteStoreError {
    #[error("Upload of \"{}\" failed. Files over 3.5GB not supported", .path.display())]
    SizeLimitExceeded { path: PathBuf, size: u64 },

    #[error("Container \"{container}\" could not be created")]
    ContainerNotCreated { container: String },

    #[error("\"{}\" has no object name below the archive root", .path.display())]
    EmptyObjectName { path: PathBuf },

    #[error("File \"{}\" could not be found", .path.display())]
    NotFound { path: PathBuf },

    #[error("Permission error with \"{}\"", .path.display())]
    PermissionDenied { path: PathBuf },

    #[error("Swift Client Exception with \"{}\": {message}", .path.display())]
    Client { path: PathBuf, message: String },

    #[error("Unknown error with \"{}\": {message}", .path.display())]
    Unknown { path: PathBuf, message: String },
}

impl RemoteStoreError {
    /// Classifies an I/O error raised while reading `path` for upload.
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        let path = path.to_path_buf();
        match err.kind() {
            io::ErrorKind::NotFound => RemoteStoreError::NotFound { path },
            io::ErrorKind::PermissionDenied => RemoteStoreError::PermissionDenied { path },
            _ => RemoteStoreError::Unknown {
                path,
                message: err.to_string(),
            },
        }
    }
}

/// Any failure that aborts an archive run.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("{}", missing_configuration_message(.missing))]
    MissingConfiguration { missing: Vec<&'static str> },

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    LocalFile(#[from] LocalFileError),

    #[error(transparent)]
    RemoteStore(#[from] RemoteStoreError),

    #[error("checksum mismatch: file=\"{}\" local=\"{local}\" remote=\"{remote}\"", .path.display())]
    ChecksumMismatch {
        path: PathBuf,
        local: String,
        remote: String,
    },
}

fn missing_configuration_message(missing: &[&'static str]) -> String {
    format!(
        "swift-archive requires OS_USERNAME, OS_PASSWORD, OS_PROJECT_NAME,\n\
         OS_AUTH_URL, CONTAINER, and ARCHIVE_PATH to be set or overridden with\n\
         --os-username, --os-password, --os-project-name, --os-auth-url,\n\
         --container, or --archive-path.\n\
         missing: {}",
        missing.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_file_errors_name_the_path() {
        let path = Path::new("missing_file");
        let err = LocalFileError::from_io(path, io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(err.to_string(), "File \"missing_file\" could not be found");

        let err = LocalFileError::from_io(
            Path::new("permission_file"),
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert_eq!(err.to_string(), "Permission error with \"permission_file\"");
    }

    #[test]
    fn unknown_local_errors_carry_the_os_message() {
        let err = LocalFileError::from_io(
            Path::new("io_error"),
            io::Error::new(io::ErrorKind::Other, "Input/output error"),
        );
        assert_eq!(
            err.to_string(),
            "Unknown error with \"io_error\": Input/output error"
        );
    }

    #[test]
    fn remote_errors_render_like_the_backend_reports_them() {
        let err = RemoteStoreError::SizeLimitExceeded {
            path: PathBuf::from("object"),
            size: 3_600_000_000,
        };
        assert_eq!(
            err.to_string(),
            "Upload of \"object\" failed. Files over 3.5GB not supported"
        );

        let err = RemoteStoreError::ContainerNotCreated {
            container: "container".into(),
        };
        assert_eq!(err.to_string(), "Container \"container\" could not be created");

        let err = RemoteStoreError::Client {
            path: PathBuf::from("object"),
            message: "Unknown".into(),
        };
        assert_eq!(err.to_string(), "Swift Client Exception with \"object\": Unknown");
    }

    #[test]
    fn missing_configuration_lists_every_required_setting() {
        let err = ArchiveError::MissingConfiguration {
            missing: vec!["OS_PASSWORD"],
        };
        let msg = err.to_string();
        for name in [
            "OS_USERNAME",
            "OS_PASSWORD",
            "OS_PROJECT_NAME",
            "OS_AUTH_URL",
            "CONTAINER",
            "ARCHIVE_PATH",
        ] {
            assert!(msg.contains(name), "{name} missing from: {msg}");
        }
        assert!(msg.ends_with("missing: OS_PASSWORD"));
    }

    #[test]
    fn checksum_mismatch_names_file_and_both_digests() {
        let err = ArchiveError::ChecksumMismatch {
            path: PathBuf::from("/tmp/mock.txt"),
            local: "123456".into(),
            remote: "abcdef".into(),
        };
        assert_eq!(
            err.to_string(),
            "checksum mismatch: file=\"/tmp/mock.txt\" local=\"123456\" remote=\"abcdef\""
        );
    }
}
