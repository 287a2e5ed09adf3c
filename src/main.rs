mod args;
mod classify;
mod collect;
mod config;
mod execute;
mod logging;
mod notify;
mod paths;
mod summary;
mod utils;
mod verify;

use anyhow::{Context, Result};
use args::Args;
use chrono::Local;
use config::MailConfig;
use paths::Paths;
use tracing::{info, warn};

fn main() -> Result<()> {
    do_main(&Args::parse_args())
}

fn do_main(args: &Args) -> Result<()> {
    let paths = Paths::from_args(args).context("Failed to resolve directories")?;
    paths.ensure().context("Failed to create directories")?;
    let log_file = logging::init_logger(&paths.log_dir)?;
    info!("=== Run started ===");

    let config = MailConfig::from_env();
    if let Err(err) = config.credentials() {
        warn!("Summary email cannot be sent: {}", err);
    }

    if !args.quiet {
        eprintln!("Processing files...");
    }
    let summary =
        execute::process_intake(&paths.intake_dir, || Local::now().naive_local(), args.quiet)
        .with_context(|| format!("Failed to list {}", paths.intake_dir.display()))?;

    if !args.quiet {
        eprintln!("Sending summary...");
    }
    notify::notify(&config, &summary, &log_file, Local::now().date_naive());

    info!("=== Run finished ===");
    Ok(())
}
