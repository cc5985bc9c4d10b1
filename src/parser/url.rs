//! Watch-page URL validation and video id extraction.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;
use url::Url;

use super::error::ParseError;

/// Shape every accepted identifier must start with.
#[allow(clippy::expect_used)]
static WATCH_URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://www\.youtube\.com/watch\?v=[\w-]+").expect("watch URL regex is valid") // Static pattern, safe to panic
});

#[allow(clippy::expect_used)]
static VIDEO_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w-]+$").expect("video id regex is valid"));

/// A validated watch-page URL together with the video id it names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoUrl {
    /// The URL exactly as supplied (trimmed).
    pub url: String,
    /// Value of the `v` query parameter.
    pub video_id: String,
}

/// Validates a watch-page URL and extracts its video id.
///
/// # Errors
///
/// Returns [`ParseError::NotWatchPage`] when the URL does not match the
/// watch-page shape or cannot be parsed, and [`ParseError::MissingVideoId`]
/// when it carries no usable `v` parameter.
#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_video_url(input: &str) -> Result<VideoUrl, ParseError> {
    let raw = input.trim();
    if !WATCH_URL_PATTERN.is_match(raw) {
        debug!(url = %raw, "URL does not match watch page shape");
        return Err(ParseError::not_watch_page(raw));
    }

    let parsed = Url::parse(raw).map_err(|error| {
        debug!(url = %raw, %error, "watch page URL failed to parse");
        ParseError::not_watch_page(raw)
    })?;
    let video_id = parsed
        .query_pairs()
        .find(|(name, _)| name == "v")
        .map(|(_, value)| value.into_owned())
        .filter(|id| VIDEO_ID_PATTERN.is_match(id))
        .ok_or_else(|| ParseError::missing_video_id(raw))?;

    Ok(VideoUrl {
        url: raw.to_string(),
        video_id,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_video_url_extracts_id() {
        let video = parse_video_url("https://www.youtube.com/watch?v=abc_DEF-123").unwrap();
        assert_eq!(video.video_id, "abc_DEF-123");
        assert_eq!(video.url, "https://www.youtube.com/watch?v=abc_DEF-123");
    }

    #[test]
    fn test_parse_video_url_ignores_extra_parameters() {
        let video = parse_video_url("https://www.youtube.com/watch?v=abc123&t=42s").unwrap();
        assert_eq!(video.video_id, "abc123");
    }

    #[test]
    fn test_parse_video_url_trims_whitespace() {
        let video = parse_video_url("  https://www.youtube.com/watch?v=abc123\n").unwrap();
        assert_eq!(video.video_id, "abc123");
    }

    #[test]
    fn test_parse_video_url_rejects_other_hosts() {
        let err = parse_video_url("https://example.com/watch?v=abc123").unwrap_err();
        assert!(matches!(err, ParseError::NotWatchPage { .. }));
    }

    #[test]
    fn test_parse_video_url_rejects_plain_http() {
        assert!(parse_video_url("http://www.youtube.com/watch?v=abc123").is_err());
    }

    #[test]
    fn test_parse_video_url_rejects_missing_parameter() {
        assert!(parse_video_url("https://www.youtube.com/watch?list=abc").is_err());
        assert!(parse_video_url("https://www.youtube.com/watch?v=").is_err());
    }

    #[test]
    fn test_parse_video_url_rejects_id_with_bad_characters() {
        let err = parse_video_url("https://www.youtube.com/watch?v=ab%20cd").unwrap_err();
        assert_eq!(
            err,
            ParseError::missing_video_id("https://www.youtube.com/watch?v=ab%20cd")
        );
    }

    #[test]
    fn test_parse_video_url_rejects_bare_id() {
        assert!(parse_video_url("dQw4w9WgXcQ").is_err());
    }
}
