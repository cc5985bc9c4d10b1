//! Error types for watch-page URL validation.

use thiserror::Error;

/// Why an identifier was rejected.
///
/// Messages omit the identifier itself; callers report it alongside.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The identifier does not have the watch-page shape.
    #[error(
        "not a video watch page URL\n  Suggestion: Use a URL of the form https://www.youtube.com/watch?v=VIDEO_ID"
    )]
    NotWatchPage {
        /// The rejected identifier, trimmed.
        url: String,
    },

    /// The `v` parameter is absent or holds characters outside `[A-Za-z0-9_-]`.
    #[error("no usable video id in the `v` parameter\n  Suggestion: Copy the full watch page URL including `?v=`")]
    MissingVideoId {
        /// The rejected identifier, trimmed.
        url: String,
    },
}

impl ParseError {
    pub(crate) fn not_watch_page(url: &str) -> Self {
        Self::NotWatchPage {
            url: url.to_string(),
        }
    }

    pub(crate) fn missing_video_id(url: &str) -> Self {
        Self::MissingVideoId {
            url: url.to_string(),
        }
    }

    /// The identifier that failed validation.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::NotWatchPage { url } | Self::MissingVideoId { url } => url,
        }
    }
}
