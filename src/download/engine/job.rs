//! One unit of work: validate, resolve, transfer.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indicatif::MultiProgress;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::error::JobError;
use crate::audio::AudioExtractor;
use crate::download::{
    HttpClient, ProgressCounter, TransferOptions, TransferOutcome, spawn_progress_reporter,
};
use crate::parser::parse_video_url;
use crate::resolver::Resolver;

/// Settings shared by every job of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOptions {
    /// Directory that receives the downloaded files. Must already exist.
    pub output_dir: PathBuf,
    /// Extract an MP3 track after each download.
    pub want_audio: bool,
    /// Render a progress bar per transfer.
    pub want_progress: bool,
}

impl JobOptions {
    /// Options writing into `output_dir` with audio and progress disabled.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            want_audio: false,
            want_progress: false,
        }
    }
}

/// An immutable request to download one input URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadJob {
    input_url: String,
    output_dir: PathBuf,
    want_audio: bool,
    want_progress: bool,
}

impl DownloadJob {
    /// Creates a job for `input_url` with the batch options.
    #[must_use]
    pub fn new(input_url: impl Into<String>, options: &JobOptions) -> Self {
        Self {
            input_url: input_url.into(),
            output_dir: options.output_dir.clone(),
            want_audio: options.want_audio,
            want_progress: options.want_progress,
        }
    }

    /// The URL as given by the user.
    #[must_use]
    pub fn input_url(&self) -> &str {
        &self.input_url
    }

    /// Destination directory.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Whether audio extraction was requested.
    #[must_use]
    pub fn want_audio(&self) -> bool {
        self.want_audio
    }

    /// Whether progress reporting was requested.
    #[must_use]
    pub fn want_progress(&self) -> bool {
        self.want_progress
    }
}

/// Terminal state of a job.
#[derive(Debug)]
pub enum JobOutcome {
    /// The video (and audio, if requested) is on disk.
    Completed(TransferOutcome),
    /// The job failed.
    Failed(JobError),
    /// A sibling failed before this job started; nothing was done.
    Canceled,
}

impl JobOutcome {
    /// Returns the failure, if any.
    #[must_use]
    pub fn error(&self) -> Option<&JobError> {
        match self {
            Self::Failed(error) => Some(error),
            _ => None,
        }
    }
}

/// Collaborators a job needs, shared across the batch.
#[derive(Clone)]
pub(super) struct JobContext {
    pub(super) resolver: Arc<dyn Resolver>,
    pub(super) client: HttpClient,
    pub(super) audio: Option<Arc<AudioExtractor>>,
    pub(super) progress: MultiProgress,
    pub(super) cancel: CancellationToken,
}

/// Runs one job to a terminal state.
///
/// Cancellation is checked once, before any work. Any failure cancels jobs
/// that have not started yet.
#[instrument(skip_all, fields(url = %job.input_url()))]
pub(super) async fn run_job(job: &DownloadJob, ctx: &JobContext) -> JobOutcome {
    if ctx.cancel.is_cancelled() {
        debug!("batch canceled before start");
        return JobOutcome::Canceled;
    }

    match execute(job, ctx).await {
        Ok(outcome) => {
            info!(path = %outcome.path.display(), bytes = outcome.bytes_written, "job completed");
            JobOutcome::Completed(outcome)
        }
        Err(error) => {
            warn!(error = %error, "job failed; canceling jobs not yet started");
            ctx.cancel.cancel();
            JobOutcome::Failed(error)
        }
    }
}

async fn execute(job: &DownloadJob, ctx: &JobContext) -> Result<TransferOutcome, JobError> {
    let url = job.input_url();
    let video_url = parse_video_url(url).map_err(|source| JobError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;

    ensure_output_dir(url, job.output_dir()).await?;

    let video = ctx
        .resolver
        .resolve(&video_url.video_id)
        .await
        .map_err(|source| JobError::Resolve {
            url: url.to_string(),
            source,
        })?;
    debug!(title = %video.title, file_name = %video.file_name, "resolved stream");

    let mut options = TransferOptions::new(&video.file_name);
    let reporter = if job.want_progress() {
        let counter = ProgressCounter::new();
        options = options.with_progress(counter.clone());
        Some(spawn_progress_reporter(&ctx.progress, video.file_name.clone(), counter))
    } else {
        None
    };
    if job.want_audio()
        && let Some(extractor) = ctx.audio.as_deref()
    {
        options = options.with_audio(extractor);
    }

    let result = ctx
        .client
        .transfer(video.source_url(), job.output_dir(), options)
        .await;

    if let Some(reporter) = reporter {
        reporter.finish().await;
    }

    result.map_err(|source| JobError::Transfer {
        url: url.to_string(),
        source,
    })
}

async fn ensure_output_dir(url: &str, dir: &Path) -> Result<(), JobError> {
    let failure = |reason: String| JobError::OutputDir {
        url: url.to_string(),
        path: dir.to_path_buf(),
        reason,
    };
    let metadata = tokio::fs::metadata(dir)
        .await
        .map_err(|e| failure(e.to_string()))?;
    if !metadata.is_dir() {
        return Err(failure("not a directory".to_string()));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_download_job_copies_options() {
        let options = JobOptions {
            output_dir: PathBuf::from("/videos"),
            want_audio: true,
            want_progress: false,
        };
        let job = DownloadJob::new("https://www.youtube.com/watch?v=abc", &options);
        assert_eq!(job.input_url(), "https://www.youtube.com/watch?v=abc");
        assert_eq!(job.output_dir(), Path::new("/videos"));
        assert!(job.want_audio());
        assert!(!job.want_progress());
    }

    #[tokio::test]
    async fn test_ensure_output_dir_rejects_missing_and_files() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ensure_output_dir("u", dir.path()).await.is_ok());

        let missing = dir.path().join("missing");
        let err = ensure_output_dir("u", &missing).await.unwrap_err();
        assert!(matches!(err, JobError::OutputDir { .. }));

        let file = dir.path().join("file.txt");
        std::fs::write(&file, b"x").unwrap();
        let err = ensure_output_dir("u", &file).await.unwrap_err();
        match err {
            JobError::OutputDir { reason, .. } => assert_eq!(reason, "not a directory"),
            other => panic!("expected OutputDir, got {other:?}"),
        }
    }

    #[test]
    fn test_job_outcome_error_accessor() {
        assert!(JobOutcome::Canceled.error().is_none());
        let failed = JobOutcome::Failed(JobError::OutputDir {
            url: "u".to_string(),
            path: PathBuf::from("/x"),
            reason: "r".to_string(),
        });
        assert_eq!(failed.error().unwrap().url(), "u");
    }
}
