//! Per-job failure type.

use std::path::PathBuf;

use thiserror::Error;

use crate::download::TransferError;
use crate::parser::ParseError;
use crate::resolver::ResolveError;

/// Why a single job failed, always naming the input URL.
#[derive(Debug, Error)]
pub enum JobError {
    /// The input is not a watch-page URL.
    #[error("invalid input '{url}': {source}")]
    InvalidUrl {
        /// The rejected input.
        url: String,
        /// The validation failure.
        #[source]
        source: ParseError,
    },

    /// The output directory is missing or not a directory.
    #[error("output directory {} unusable for '{url}': {reason}", .path.display())]
    OutputDir {
        /// The input whose job failed.
        url: String,
        /// The configured output directory.
        path: PathBuf,
        /// What is wrong with it.
        reason: String,
    },

    /// Metadata could not be resolved.
    #[error("metadata lookup failed for '{url}': {source}")]
    Resolve {
        /// The input whose job failed.
        url: String,
        /// The resolver failure.
        #[source]
        source: ResolveError,
    },

    /// The stream could not be downloaded (or its audio extracted).
    #[error("download failed for '{url}': {source}")]
    Transfer {
        /// The input whose job failed.
        url: String,
        /// The transfer failure.
        #[source]
        source: TransferError,
    },

    /// The job panicked before reaching a terminal state.
    #[error("job for '{url}' aborted: {reason}")]
    Aborted {
        /// The input whose job failed.
        url: String,
        /// The panic message, when it was a string.
        reason: String,
    },
}

impl JobError {
    /// Input URL of the failed job.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::InvalidUrl { url, .. }
            | Self::OutputDir { url, .. }
            | Self::Resolve { url, .. }
            | Self::Transfer { url, .. }
            | Self::Aborted { url, .. } => url,
        }
    }
}
