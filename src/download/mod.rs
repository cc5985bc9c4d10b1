//! Transfer engine and batch orchestration.
//!
//! This module streams a resolved media URL to disk and runs many such jobs
//! concurrently.
//!
//! # Features
//!
//! - Streaming downloads (memory-efficient for large files)
//! - Best-effort size probing with a HEAD request
//! - Per-job progress counters rendered as terminal bars
//! - Semaphore-bounded concurrency with cooperative cancellation
//! - Structured error types with full context
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use tubegrab_core::download::{HttpClient, TransferOptions};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new()?;
//! let outcome = client
//!     .transfer(
//!         "https://cdn.example.com/video.mp4",
//!         Path::new("./videos"),
//!         TransferOptions::new("video.mp4"),
//!     )
//!     .await?;
//! println!("Downloaded: {}", outcome.path.display());
//! # Ok(())
//! # }
//! ```

mod client;
mod engine;
mod error;
mod progress;

pub use client::{HttpClient, TransferOptions, TransferOutcome};
pub use engine::{
    BatchReport, DEFAULT_CONCURRENCY, DownloadEngine, DownloadJob, DownloadStats, EngineError,
    JobError, JobOptions, JobOutcome, JobReport,
};
pub use error::TransferError;
pub use progress::{ProgressCounter, ProgressReporter, spawn_progress_reporter};
