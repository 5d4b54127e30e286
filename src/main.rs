//! CLI entry point for modfetch.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use modfetch_core::{ExtractionOutcome, RetryPolicy, RunOptions, SettingsStore, Site, run};
use tracing::{debug, error, info};

mod cli;

use cli::Args;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");

    let store = match &args.data_dir {
        Some(dir) => SettingsStore::new(dir),
        None => SettingsStore::beside_executable()?,
    };
    if args.reset_path {
        store.clear_destination()?;
        info!("forgot remembered mods directory");
    }

    let site = match args.base_url.as_deref() {
        Some(base) => Site::new(base).with_context(|| format!("invalid --base-url '{base}'"))?,
        None => Site::default(),
    };

    let options = RunOptions {
        site,
        destination_override: args.dest.clone(),
        link: args.link.clone(),
        retry: if args.retry {
            RetryPolicy::single_retry()
        } else {
            RetryPolicy::no_retry()
        },
        flatten_mode: args.flatten.into(),
        wait_for_exit: !args.no_wait,
    };

    let progress = download_progress_bar(args.quiet);
    let mut console = modfetch_core::console::stdio();

    // Failures are reported, not turned into exit codes.
    match run(&options, &store, console.as_mut(), &progress).await {
        Ok(summary) => match summary.outcome {
            ExtractionOutcome::Extracted {
                files,
                pruned,
                flatten,
            } => info!(
                mod_file = %summary.file_name,
                destination = %summary.destination.display(),
                files,
                pruned,
                moved = flatten.moved,
                skipped = flatten.skipped.len(),
                "mod installed"
            ),
            ExtractionOutcome::Unsupported => info!(
                path = %summary.archive.display(),
                "download kept without extraction"
            ),
        },
        Err(e) => error!(error = %e, "install aborted"),
    }

    Ok(())
}

fn download_progress_bar(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template(
            "{bytes} of {total_bytes} [{bar:40.cyan/blue}] {bytes_per_sec} eta {eta}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> "),
    );
    bar
}
