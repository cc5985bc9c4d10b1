//! Error types for metadata resolution.
//!
//! Each variant names the video or endpoint involved and, where the user can
//! act on it, carries a suggestion line.

use thiserror::Error;

use crate::query::QueryError;

/// Errors that can occur while turning a video id into stream metadata.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The configured metadata host is not a usable base URL.
    #[error("invalid metadata host '{base_url}': {reason}\n  Suggestion: Set metadata_host to an absolute http(s) URL")]
    InvalidEndpoint {
        /// The configured base URL.
        base_url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build metadata HTTP client: {source}")]
    Client {
        /// The underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// The metadata request never produced a response body.
    #[error("network error fetching metadata from {url}: {source}")]
    Network {
        /// The metadata endpoint that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// The metadata endpoint answered with a non-success status.
    #[error("metadata request to {url} failed with HTTP {status} {reason}")]
    HttpStatus {
        /// The metadata endpoint.
        url: String,
        /// The HTTP status code.
        status: u16,
        /// Canonical reason phrase for the status.
        reason: String,
    },

    /// The metadata body is not a well-formed query string.
    #[error("could not decode metadata for video '{video_id}': {source}")]
    Decode {
        /// Video whose metadata failed to decode.
        video_id: String,
        /// The underlying decode error.
        #[source]
        source: QueryError,
    },

    /// The metadata decoded but its embedded document is missing or malformed.
    #[error("could not parse metadata for video '{video_id}': {reason}")]
    Parse {
        /// Video whose metadata failed to parse.
        video_id: String,
        /// What was wrong with the document.
        reason: String,
    },

    /// The video exposes no downloadable streams.
    #[error("no playable streams for video '{video_id}'\n  Suggestion: The video may be private, age-restricted, or live")]
    NoStreams {
        /// Video without streaming data.
        video_id: String,
    },
}

impl ResolveError {
    /// Creates an `InvalidEndpoint` error.
    #[must_use]
    pub fn invalid_endpoint(base_url: &str, reason: &str) -> Self {
        Self::InvalidEndpoint {
            base_url: base_url.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates a `Network` error from a reqwest error.
    #[must_use]
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an `HttpStatus` error.
    #[must_use]
    pub fn http_status(url: impl Into<String>, status: u16, reason: &str) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
            reason: reason.to_string(),
        }
    }

    /// Creates a `Decode` error.
    #[must_use]
    pub fn decode(video_id: &str, source: QueryError) -> Self {
        Self::Decode {
            video_id: video_id.to_string(),
            source,
        }
    }

    /// Creates a `Parse` error.
    #[must_use]
    pub fn parse(video_id: &str, reason: impl Into<String>) -> Self {
        Self::Parse {
            video_id: video_id.to_string(),
            reason: reason.into(),
        }
    }

    /// Creates a `NoStreams` error.
    #[must_use]
    pub fn no_streams(video_id: &str) -> Self {
        Self::NoStreams {
            video_id: video_id.to_string(),
        }
    }
}
