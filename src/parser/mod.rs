//! Input parsing for video page URLs.
//!
//! Each command-line identifier is validated independently against the
//! expected watch-page shape and reduced to its video id.
//!
//! # Example
//!
//! ```
//! use tubegrab_core::parser::parse_video_url;
//!
//! let video = parse_video_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ").unwrap();
//! assert_eq!(video.video_id, "dQw4w9WgXcQ");
//! ```

mod error;
mod url;

pub use error::ParseError;
pub use url::{VideoUrl, parse_video_url};
