//! Error types for the transfer engine.
//!
//! Every variant names the URL or path involved so a failure can be
//! diagnosed from the message alone.

use std::path::PathBuf;

use thiserror::Error;

use crate::audio::AudioError;

/// Errors that can occur while streaming a source URL to disk.
#[derive(Debug, Error)]
pub enum TransferError {
    /// The source URL is malformed.
    #[error("invalid source URL: {url}")]
    InvalidUrl {
        /// The rejected URL.
        url: String,
    },

    /// The destination file could not be created.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The destination path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The GET request failed before a response arrived.
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The source URL.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// The GET request answered with a non-success status.
    #[error("HTTP {status} {reason} downloading {url}")]
    HttpStatus {
        /// The source URL.
        url: String,
        /// The HTTP status code.
        status: u16,
        /// Canonical reason phrase for the status.
        reason: String,
    },

    /// The body stopped short or could not be written; the partial file is kept.
    #[error(
        "incomplete download of {path}: wrote {written} of {} bytes: {reason}",
        .expected.map_or_else(|| "unknown".to_string(), |bytes| bytes.to_string())
    )]
    Incomplete {
        /// The partially written file.
        path: PathBuf,
        /// Bytes written before the failure.
        written: u64,
        /// Expected total, when the server reported one.
        expected: Option<u64>,
        /// What interrupted the copy.
        reason: String,
    },

    /// The video was downloaded but audio extraction failed; the video is kept.
    #[error("audio extraction failed for {video_path}: {source}")]
    AudioExtractionFailed {
        /// The downloaded video file.
        video_path: PathBuf,
        /// The extraction failure.
        #[source]
        source: AudioError,
    },
}

impl TransferError {
    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16, reason: &str) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
            reason: reason.to_string(),
        }
    }

    /// Creates an incomplete-copy error.
    pub fn incomplete(
        path: impl Into<PathBuf>,
        written: u64,
        expected: Option<u64>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Incomplete {
            path: path.into(),
            written,
            expected,
            reason: reason.into(),
        }
    }

    /// Creates an audio extraction error.
    pub fn audio_extraction_failed(video_path: impl Into<PathBuf>, source: AudioError) -> Self {
        Self::AudioExtractionFailed {
            video_path: video_path.into(),
            source,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_error_http_status_display() {
        let msg = TransferError::http_status("https://cdn/v.mp4", 403, "Forbidden").to_string();
        assert!(msg.contains("403"), "Expected '403' in: {msg}");
        assert!(msg.contains("Forbidden"), "Expected reason in: {msg}");
        assert!(msg.contains("https://cdn/v.mp4"), "Expected URL in: {msg}");
    }

    #[test]
    fn test_transfer_error_incomplete_display_known_total() {
        let msg = TransferError::incomplete("/tmp/v.mp4", 10, Some(100), "body ended early")
            .to_string();
        assert!(msg.contains("wrote 10 of 100 bytes"), "{msg}");
        assert!(msg.contains("body ended early"), "{msg}");
    }

    #[test]
    fn test_transfer_error_incomplete_display_unknown_total() {
        let msg = TransferError::incomplete("/tmp/v.mp4", 10, None, "connection reset").to_string();
        assert!(msg.contains("wrote 10 of unknown bytes"), "{msg}");
    }

    #[test]
    fn test_transfer_error_io_display() {
        let err = TransferError::io(
            "/readonly/v.mp4",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/readonly/v.mp4"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_transfer_error_audio_keeps_source() {
        use std::error::Error as _;

        let err = TransferError::audio_extraction_failed(
            "/tmp/v.mp4",
            AudioError::tool_not_found("ffmpeg", "missing"),
        );
        assert!(err.to_string().contains("/tmp/v.mp4"));
        assert!(err.source().is_some());
    }
}
