use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info};

use crate::error::ArchiveError;

/// Settings as resolved from flags and environment, before validation.
#[derive(Clone, Default)]
pub struct RawOptions {
    pub username: Option<String>,
    pub password: Option<String>,
    pub project_name: Option<String>,
    pub auth_url: Option<String>,
    pub container: Option<String>,
    pub archive_path: Option<PathBuf>,
    pub delete_after_upload: bool,
    pub staleness_threshold: Duration,
    pub debug: bool,
}

impl std::fmt::Debug for RawOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawOptions")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("project_name", &self.project_name)
            .field("auth_url", &self.auth_url)
            .field("container", &self.container)
            .field("archive_path", &self.archive_path)
            .field("delete_after_upload", &self.delete_after_upload)
            .field("staleness_threshold", &self.staleness_threshold)
            .field("debug", &self.debug)
            .finish()
    }
}

/// Keystone credentials used once at startup.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub project_name: String,
    pub auth_url: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("project_name", &self.project_name)
            .field("auth_url", &self.auth_url)
            .finish()
    }
}

/// Validated options for one archive run. Only built by [`RawOptions::validate`].
#[derive(Debug, Clone)]
pub struct ArchiveOptions {
    pub credentials: Credentials,
    pub container: String,
    pub archive_path: PathBuf,
    pub delete_after_upload: bool,
    pub staleness_threshold: Duration,
    pub debug: bool,
}

impl RawOptions {
    /// Checks that every required setting is present and non-empty.
    ///
    /// On failure the error lists each missing setting by its environment
    /// variable name.
    pub fn validate(self) -> Result<ArchiveOptions, ArchiveError> {
        let mut missing = Vec::new();

        let mut require = |value: Option<String>, name: &'static str| -> String {
            match value {
                Some(v) if !v.trim().is_empty() => v,
                _ => {
                    missing.push(name);
                    String::new()
                }
            }
        };

        let username = require(self.username, "OS_USERNAME");
        let password = require(self.password, "OS_PASSWORD");
        let project_name = require(self.project_name, "OS_PROJECT_NAME");
        let auth_url = require(self.auth_url, "OS_AUTH_URL");
        let container = require(self.container, "CONTAINER");
        let archive_path = require(
            self.archive_path.map(|p| p.to_string_lossy().into_owned()),
            "ARCHIVE_PATH",
        );

        if !missing.is_empty() {
            return Err(ArchiveError::MissingConfiguration { missing });
        }

        let options = ArchiveOptions {
            credentials: Credentials {
                username,
                password,
                project_name,
                auth_url,
            },
            container,
            archive_path: PathBuf::from(archive_path),
            delete_after_upload: self.delete_after_upload,
            staleness_threshold: self.staleness_threshold,
            debug: self.debug,
        };
        options.trace_loaded();
        Ok(options)
    }
}

impl ArchiveOptions {
    pub fn trace_loaded(&self) {
        info!(
            container = %self.container,
            archive_path = %self.archive_path.display(),
            delete = self.delete_after_upload,
            seconds_since_updated = self.staleness_threshold.as_secs_f64(),
            "Loaded archive options"
        );
        debug!(?self, "Archive options (full debug)");
    }
}
