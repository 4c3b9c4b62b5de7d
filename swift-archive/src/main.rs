use clap::Parser;
use swift_archive::cli::{run, Cli};
use tracing::Level;

/// Builds the process-wide subscriber from the parsed `--debug` flag.
fn init_tracing(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::INFO };
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("[WARN] Could not install tracing subscriber: {e}");
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Load environment
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.debug);
    tracing::info!("CLI arguments parsed, invoking run");

    match run(cli).await {
        Ok(report) => {
            println!(
                "Archive complete: {} file(s) archived, {} deleted.",
                report.files.len(),
                report.deleted()
            );
            std::process::exit(0);
        }
        Err(e) => {
            eprintln!("[ERROR] Archive failed: {e:#}");
            std::process::exit(1);
        }
    }
}
