/// `load_config` module: adapts the parsed command line (flags with
/// environment fallbacks already applied by clap) into the core's
/// [`RawOptions`] record.
///
/// Validation of required settings happens in the core, so that a missing
/// setting aborts the run before any authentication is attempted regardless
/// of how the options were produced.
use crate::cli::Cli;
use swift_archive_core::RawOptions;
use tracing::{debug, info};

/// Maps the CLI surface onto the unvalidated options record.
pub fn load_options(cli: &Cli) -> RawOptions {
    debug!(os_username = ?cli.os_username, "Resolved option");
    debug!(os_password_set = cli.os_password.is_some(), "Resolved option");
    debug!(os_project_name = ?cli.os_project_name, "Resolved option");
    debug!(os_auth_url = ?cli.os_auth_url, "Resolved option");
    debug!(container = ?cli.container, "Resolved option");
    debug!(archive_path = ?cli.archive_path, "Resolved option");
    debug!(delete = cli.delete, "Resolved option");
    debug!(
        seconds_since_updated = cli.seconds_since_updated.as_secs_f64(),
        "Resolved option"
    );

    let raw = RawOptions {
        username: cli.os_username.clone(),
        password: cli.os_password.clone(),
        project_name: cli.os_project_name.clone(),
        auth_url: cli.os_auth_url.clone(),
        container: cli.container.clone(),
        archive_path: cli.archive_path.clone(),
        delete_after_upload: cli.delete,
        staleness_threshold: cli.seconds_since_updated,
        debug: cli.debug,
    };
    info!(debug = raw.debug, "Command line options loaded");
    raw
}
