//! Download engine for concurrent multi-URL batches.
//!
//! This module provides the `DownloadEngine` which runs one job per input URL
//! under a semaphore-based concurrency limit. Jobs share a cancellation
//! token: the first failure of any kind cancels every job that has not
//! started yet, while running jobs finish normally.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tubegrab_core::download::{DownloadEngine, HttpClient, JobOptions};
//! use tubegrab_core::http_client::HttpTimeouts;
//! use tubegrab_core::resolver::{DEFAULT_METADATA_HOST, VideoInfoResolver};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = VideoInfoResolver::new(DEFAULT_METADATA_HOST, HttpTimeouts::default())?;
//! let engine = DownloadEngine::new(10, Arc::new(resolver), HttpClient::new()?, None)?;
//! let urls = vec!["https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string()];
//! let stats = engine.run(&urls, &JobOptions::new("./videos")).await?;
//! println!("Completed: {}, Failed: {}", stats.completed(), stats.failed());
//! # Ok(())
//! # }
//! ```

mod error;
mod job;

pub use error::JobError;
pub use job::{DownloadJob, JobOptions, JobOutcome};

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures_util::FutureExt;
use indicatif::MultiProgress;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use self::job::{JobContext, run_job};
use super::HttpClient;
use crate::audio::AudioExtractor;
use crate::resolver::Resolver;

/// Minimum allowed concurrency value.
const MIN_CONCURRENCY: usize = 1;

/// Maximum allowed concurrency value.
const MAX_CONCURRENCY: usize = 100;

/// Default concurrency if not specified.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Error type for download engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Invalid concurrency value provided.
    #[error(
        "invalid concurrency value {value}: must be between {MIN_CONCURRENCY} and {MAX_CONCURRENCY}"
    )]
    InvalidConcurrency {
        /// The invalid value that was provided.
        value: usize,
    },

    /// Audio was requested but the engine has no extractor.
    #[error("audio extraction requested but no extraction tool is configured")]
    AudioUnavailable,

    /// Semaphore was closed unexpectedly.
    #[error("semaphore closed unexpectedly")]
    SemaphoreClosed,

    /// The first job failure of the batch, by completion order.
    #[error(transparent)]
    Job(#[from] JobError),
}

/// Statistics from a download batch run.
///
/// Uses atomic counters for thread-safe updates from concurrent jobs.
#[derive(Debug, Default)]
pub struct DownloadStats {
    completed: AtomicUsize,
    failed: AtomicUsize,
    canceled: AtomicUsize,
}

impl DownloadStats {
    /// Creates a new stats tracker with zero counts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of successfully completed jobs.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Returns the number of failed jobs.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }

    /// Returns the number of jobs skipped because the batch was canceled.
    #[must_use]
    pub fn canceled(&self) -> usize {
        self.canceled.load(Ordering::SeqCst)
    }

    /// Returns the total number of jobs that reached a terminal state.
    #[must_use]
    pub fn total(&self) -> usize {
        self.completed() + self.failed() + self.canceled()
    }

    fn record(&self, outcome: &JobOutcome) {
        let counter = match outcome {
            JobOutcome::Completed(_) => &self.completed,
            JobOutcome::Failed(_) => &self.failed,
            JobOutcome::Canceled => &self.canceled,
        };
        counter.fetch_add(1, Ordering::SeqCst);
    }

    fn snapshot(&self) -> Self {
        Self {
            completed: AtomicUsize::new(self.completed()),
            failed: AtomicUsize::new(self.failed()),
            canceled: AtomicUsize::new(self.canceled()),
        }
    }
}

/// Outcome of one job, tagged with its input URL.
#[derive(Debug)]
pub struct JobReport {
    /// The URL as given by the user.
    pub input_url: String,
    /// How the job ended.
    pub outcome: JobOutcome,
}

/// Every job outcome of a batch, in completion order.
#[derive(Debug)]
pub struct BatchReport {
    /// Job reports ordered by the time each job finished.
    pub jobs: Vec<JobReport>,
    /// Aggregate counters.
    pub stats: DownloadStats,
}

impl BatchReport {
    /// The first failure by completion order.
    #[must_use]
    pub fn first_error(&self) -> Option<&JobError> {
        self.jobs.iter().find_map(|report| report.outcome.error())
    }

    /// Converts the report into the batch result: the first failure, or the
    /// stats when every job succeeded or was canceled.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Job`] with the first failure by completion order.
    pub fn into_result(self) -> Result<DownloadStats, EngineError> {
        let first_error = self.jobs.into_iter().find_map(|report| match report.outcome {
            JobOutcome::Failed(error) => Some(error),
            _ => None,
        });
        match first_error {
            Some(error) => Err(EngineError::Job(error)),
            None => Ok(self.stats),
        }
    }
}

/// Download engine for concurrent video downloads.
///
/// # Concurrency Model
///
/// - Each job runs in its own Tokio task inside a [`JoinSet`]
/// - A semaphore permit is acquired before a job is spawned
/// - Permits are released automatically when jobs complete (RAII)
/// - Every job checks the shared [`CancellationToken`] before doing any work
pub struct DownloadEngine {
    /// Semaphore for concurrency control.
    semaphore: Arc<Semaphore>,
    /// Configured concurrency limit.
    concurrency: usize,
    resolver: Arc<dyn Resolver>,
    client: HttpClient,
    audio: Option<Arc<AudioExtractor>>,
    progress: MultiProgress,
}

impl std::fmt::Debug for DownloadEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadEngine")
            .field("concurrency", &self.concurrency)
            .field("resolver", &self.resolver.name())
            .field("audio", &self.audio)
            .finish_non_exhaustive()
    }
}

impl DownloadEngine {
    /// Creates a new download engine.
    ///
    /// # Arguments
    ///
    /// * `concurrency` - Maximum number of concurrent jobs (1-100)
    /// * `resolver` - Metadata resolver shared by all jobs
    /// * `client` - HTTP client for transfers
    /// * `audio` - Extractor used when jobs request audio
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConcurrency`] if the value is outside
    /// the valid range (1-100).
    #[instrument(level = "debug", skip(resolver, client, audio))]
    pub fn new(
        concurrency: usize,
        resolver: Arc<dyn Resolver>,
        client: HttpClient,
        audio: Option<AudioExtractor>,
    ) -> Result<Self, EngineError> {
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(EngineError::InvalidConcurrency { value: concurrency });
        }

        debug!(
            concurrency,
            resolver = resolver.name(),
            audio = audio.is_some(),
            "creating download engine"
        );

        Ok(Self {
            semaphore: Arc::new(Semaphore::new(concurrency)),
            concurrency,
            resolver,
            client,
            audio: audio.map(Arc::new),
            progress: MultiProgress::new(),
        })
    }

    /// Replaces the progress bar container (tests draw to a hidden target).
    #[must_use]
    pub fn with_progress_container(mut self, progress: MultiProgress) -> Self {
        self.progress = progress;
        self
    }

    /// Returns the configured concurrency limit.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Runs one job per input and returns the first failure by completion
    /// order, or the stats when no job failed.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Job`] with the first job failure, and the
    /// setup errors of [`DownloadEngine::run_batch`].
    pub async fn run(
        &self,
        inputs: &[String],
        options: &JobOptions,
    ) -> Result<DownloadStats, EngineError> {
        self.run_batch(inputs, options).await?.into_result()
    }

    /// Runs one job per input and reports every outcome.
    ///
    /// Every job reaches a terminal state before this returns; no input is
    /// processed twice.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::AudioUnavailable`] before starting any job if
    /// audio is requested without an extractor, and
    /// [`EngineError::SemaphoreClosed`] if the semaphore is closed.
    #[instrument(skip(self, inputs, options), fields(jobs = inputs.len(), output_dir = %options.output_dir.display()))]
    pub async fn run_batch(
        &self,
        inputs: &[String],
        options: &JobOptions,
    ) -> Result<BatchReport, EngineError> {
        if options.want_audio && self.audio.is_none() {
            return Err(EngineError::AudioUnavailable);
        }

        let stats = Arc::new(DownloadStats::new());
        let cancel = CancellationToken::new();
        let completion_seq = Arc::new(AtomicUsize::new(0));
        let ctx = JobContext {
            resolver: Arc::clone(&self.resolver),
            client: self.client.clone(),
            audio: self.audio.clone(),
            progress: self.progress.clone(),
            cancel: cancel.clone(),
        };
        let mut tasks = JoinSet::new();

        info!("starting batch");

        for input in inputs {
            let job = DownloadJob::new(input.clone(), options);

            // Acquire semaphore permit (blocks if at concurrency limit)
            let permit = self
                .semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|_| EngineError::SemaphoreClosed)?;

            let ctx = ctx.clone();
            let stats = Arc::clone(&stats);
            let completion_seq = Arc::clone(&completion_seq);

            tasks.spawn(async move {
                let _permit = permit;
                let outcome = match AssertUnwindSafe(run_job(&job, &ctx)).catch_unwind().await {
                    Ok(outcome) => outcome,
                    Err(payload) => {
                        let reason = panic_message(payload.as_ref());
                        warn!(url = %job.input_url(), %reason, "job panicked; canceling jobs not yet started");
                        ctx.cancel.cancel();
                        JobOutcome::Failed(JobError::Aborted {
                            url: job.input_url().to_string(),
                            reason,
                        })
                    }
                };
                stats.record(&outcome);
                let seq = completion_seq.fetch_add(1, Ordering::SeqCst);
                (
                    seq,
                    JobReport {
                        input_url: job.input_url().to_string(),
                        outcome,
                    },
                )
            });
        }

        debug!(task_count = tasks.len(), "waiting for jobs to complete");

        let mut finished = Vec::with_capacity(inputs.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(entry) => finished.push(entry),
                // Panics are caught inside the task; only an abort lands here.
                Err(e) => warn!(error = %e, "download task did not finish"),
            }
        }
        finished.sort_by_key(|(seq, _)| *seq);

        let stats = stats.snapshot();
        info!(
            completed = stats.completed(),
            failed = stats.failed(),
            canceled = stats.canceled(),
            total = stats.total(),
            "batch complete"
        );

        Ok(BatchReport {
            jobs: finished.into_iter().map(|(_, report)| report).collect(),
            stats,
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with a non-string payload".to_string()
    }
}
