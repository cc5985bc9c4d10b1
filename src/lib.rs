//! Tubegrab Core Library
//!
//! This library provides the core functionality for the tubegrab tool, which
//! resolves video pages into stream URLs, downloads them, and optionally
//! extracts their audio track.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`query`] - Nested query-string decoder (`a[b][]=c` syntax)
//! - [`parser`] - Watch-page URL validation and video id extraction
//! - [`resolver`] - Metadata lookup producing a title and stream URL
//! - [`download`] - Streaming transfers and the concurrent batch engine
//! - [`audio`] - External `ffmpeg` audio extraction
//! - [`http_client`] - Shared HTTP client policy

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod audio;
pub mod download;
pub mod http_client;
pub mod parser;
pub mod query;
pub mod resolver;
#[cfg(test)]
pub(crate) mod test_support;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use audio::{AudioError, AudioExtractor};
pub use download::{
    BatchReport, DEFAULT_CONCURRENCY, DownloadEngine, DownloadStats, EngineError, HttpClient,
    JobError, JobOptions, JobOutcome, TransferError,
};
pub use parser::{ParseError, VideoUrl, parse_video_url};
pub use query::{DecodedTree, QueryError, QueryValue, decode};
pub use resolver::{ResolveError, ResolvedVideo, Resolver, VideoInfoResolver};
