///
/// This module implements the CLI interface for swift-archive: flag parsing
/// with environment fallbacks and the async entrypoint used by `main` and the
/// integration tests.
///
/// All archiving logic (scanning, checksums, the upload pipeline) lives in the
/// [`swift-archive-core`] crate. This module is strictly CLI glue.
///
/// ## How To Use
/// - For command-line users: run the installed `swift-archive` binary with `--help`.
/// - For programmatic/integration use: call [`run`] with a constructed [`Cli`].
///
/// [`swift-archive-core`]: ../../swift-archive-core/
/// [`Cli`]: struct.Cli.html
/// [`run`]: fn.run.html
use crate::load_config::load_options;
use crate::swift::SwiftAuthenticator;
use anyhow::Result;
use clap::builder::BoolishValueParser;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use swift_archive_core::ArchiveReport;

/// CLI for swift-archive: move stale local files into OpenStack Swift.
#[derive(Parser, Debug, Default)]
#[clap(
    name = "swift-archive",
    version,
    about = "Archive files that have not been updated recently to an OpenStack Swift container"
)]
pub struct Cli {
    /// Log at debug level
    #[clap(long, env = "DEBUG", value_parser = BoolishValueParser::new())]
    pub debug: bool,

    /// OpenStack Keystone username
    #[clap(long, env = "OS_USERNAME")]
    pub os_username: Option<String>,

    /// OpenStack Keystone password
    #[clap(long, env = "OS_PASSWORD", hide_env_values = true)]
    pub os_password: Option<String>,

    /// OpenStack Keystone project name
    #[clap(long, env = "OS_PROJECT_NAME")]
    pub os_project_name: Option<String>,

    /// OpenStack Keystone v3 auth URL
    #[clap(long, env = "OS_AUTH_URL")]
    pub os_auth_url: Option<String>,

    /// OpenStack Swift container to archive into
    #[clap(long, env = "CONTAINER")]
    pub container: Option<String>,

    /// Local path to archive to OpenStack Swift
    #[clap(long, env = "ARCHIVE_PATH")]
    pub archive_path: Option<PathBuf>,

    /// Delete local files once they are uploaded and verified
    #[clap(long, env = "LOCAL_DELETE", value_parser = BoolishValueParser::new())]
    pub delete: bool,

    /// Archive only files not updated for longer than this many seconds
    #[clap(
        long,
        env = "SECONDS_SINCE_UPDATED",
        default_value = "0",
        value_parser = parse_seconds
    )]
    pub seconds_since_updated: Duration,
}

fn parse_seconds(raw: &str) -> Result<Duration, String> {
    let secs: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("`{raw}` is not a number of seconds"))?;
    Duration::try_from_secs_f64(secs)
        .map_err(|_| format!("`{raw}` must be a non-negative number of seconds"))
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<ArchiveReport> {
    tracing::info!("trace_initialised");

    let raw = load_options(&cli);
    match swift_archive_core::run(raw, &SwiftAuthenticator).await {
        Ok(report) => {
            tracing::info!(
                command = "archive",
                archived = report.files.len(),
                deleted = report.deleted(),
                "Archive complete"
            );
            Ok(report)
        }
        Err(e) => {
            tracing::error!(command = "archive", error = %e, "Archive failed");
            Err(e.into())
        }
    }
}
