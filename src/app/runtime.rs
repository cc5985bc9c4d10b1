//! Top-level run: arguments, config, collaborators, batch, summary.

use std::io::IsTerminal;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tubegrab_core::{AudioExtractor, DownloadEngine, HttpClient, JobOptions, VideoInfoResolver};

use crate::ProcessExit;
use crate::app::{config_manager, exit_handler, summary, terminal};
use crate::cli::Args;

pub(crate) async fn run_tubegrab() -> Result<ProcessExit> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    terminal::init_tracing(terminal::resolve_default_log_level(&args));
    debug!(?args, "CLI arguments parsed");

    let settings = config_manager::resolve_config(&args)?;
    debug!(?settings, "run settings resolved");

    // A missing ffmpeg is reported once, before any download starts.
    let audio = if settings.audio {
        let extractor = AudioExtractor::locate(settings.ffmpeg_path.as_deref())
            .context("audio extraction requested")?;
        info!(ffmpeg = %extractor.binary_path().display(), "audio extraction enabled");
        Some(extractor)
    } else {
        None
    };

    let resolver = VideoInfoResolver::new(&settings.metadata_host, settings.timeouts)
        .context("invalid metadata host")?;
    let client =
        HttpClient::with_timeouts(settings.timeouts).context("failed to build HTTP client")?;
    let engine = DownloadEngine::new(settings.concurrency, Arc::new(resolver), client, audio)?;

    let mut options = JobOptions::new(settings.output_dir.clone());
    options.want_audio = settings.audio;
    options.want_progress = terminal::should_draw_progress(
        settings.progress,
        std::io::stderr().is_terminal(),
        args.quiet,
        terminal::is_dumb_terminal(),
    );

    info!(
        urls = settings.urls.len(),
        concurrency = engine.concurrency(),
        "tubegrab starting"
    );
    let report = engine.run_batch(&settings.urls, &options).await?;

    summary::print_completion_summary(&report, &settings.output_dir, args.quiet);

    Ok(exit_handler::determine_exit_outcome(report.stats.failed()))
}
