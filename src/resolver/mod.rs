//! Metadata resolution: turning a video id into a title and a stream URL.
//!
//! # Architecture
//!
//! - [`Resolver`] - Async trait the download engine calls for each job
//! - [`VideoInfoResolver`] - Fetches `get_video_info` from a metadata host
//! - [`ResolvedVideo`] - Title, derived file name, and the chosen stream
//! - [`derive_file_name`] - Title to safe file name conversion
//!
//! # Example
//!
//! ```no_run
//! use tubegrab_core::http_client::HttpTimeouts;
//! use tubegrab_core::resolver::{Resolver, VideoInfoResolver};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = VideoInfoResolver::new("https://www.youtube.com", HttpTimeouts::default())?;
//! let video = resolver.resolve("dQw4w9WgXcQ").await?;
//! println!("{} -> {}", video.title, video.file_name);
//! # Ok(())
//! # }
//! ```

mod error;
mod filename;
mod video_info;

pub use error::ResolveError;
pub use filename::derive_file_name;
pub use video_info::{DEFAULT_METADATA_HOST, VideoInfoResolver, parse_video_info};

use async_trait::async_trait;

/// One downloadable stream advertised by the metadata document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamCandidate {
    /// Full MIME type, e.g. `video/mp4; codecs="avc1.42001E"`.
    pub mime_type: String,
    /// Direct URL of the media bytes.
    pub source_url: String,
}

impl StreamCandidate {
    /// Creates a candidate from its MIME type and source URL.
    #[must_use]
    pub fn new(mime_type: impl Into<String>, source_url: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            source_url: source_url.into(),
        }
    }

    /// Container format: the text between the first `/` and the first `;`
    /// of the MIME type.
    ///
    /// Returns `None` when either delimiter is missing or they are out of order.
    #[must_use]
    pub fn container_format(&self) -> Option<&str> {
        let start = self.mime_type.find('/')? + 1;
        let end = self.mime_type.find(';')?;
        self.mime_type.get(start..end)
    }
}

/// Metadata for a single video, ready to hand to the transfer engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVideo {
    /// The video id that was resolved.
    pub video_id: String,
    /// Human-readable title as published.
    pub title: String,
    /// Sanitized output file name.
    pub file_name: String,
    /// The stream that will be downloaded (first advertised format).
    pub candidate: StreamCandidate,
}

impl ResolvedVideo {
    /// URL of the media bytes.
    #[must_use]
    pub fn source_url(&self) -> &str {
        &self.candidate.source_url
    }
}

/// Resolves a video id into downloadable metadata.
///
/// Uses `async_trait` so the engine can hold an `Arc<dyn Resolver>`; Rust
/// 2024 native async traits are not object-safe.
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Returns the resolver's name for logging.
    fn name(&self) -> &str;

    /// Fetches metadata for `video_id`.
    async fn resolve(&self, video_id: &str) -> Result<ResolvedVideo, ResolveError>;
}
