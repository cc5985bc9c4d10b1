//! Resolver backed by the `get_video_info` metadata endpoint.
//!
//! The endpoint answers with a form-encoded body whose `player_response`
//! field holds a JSON document. Only two parts of that document are used:
//! `videoDetails.title` and the first entry of `streamingData.formats`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, trace};
use url::Url;

use super::{ResolveError, ResolvedVideo, Resolver, StreamCandidate, derive_file_name};
use crate::http_client::{HttpTimeouts, build_http_client};
use crate::query;

/// Metadata host used when none is configured.
pub const DEFAULT_METADATA_HOST: &str = "https://www.youtube.com";

const VIDEO_INFO_PATH: &str = "/get_video_info";

// ==================== player_response Types ====================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
    video_details: Option<VideoDetails>,
    streaming_data: Option<StreamingData>,
}

#[derive(Debug, Deserialize)]
struct VideoDetails {
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamingData {
    formats: Option<Vec<RawFormat>>,
}

/// A format entry; fields are optional so one odd entry does not fail the
/// whole document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFormat {
    mime_type: Option<String>,
    url: Option<String>,
}

// ==================== VideoInfoResolver ====================

/// Fetches `{host}/get_video_info?video_id={id}` and extracts the title and
/// first stream.
pub struct VideoInfoResolver {
    client: Client,
    base_url: Url,
}

impl VideoInfoResolver {
    /// Creates a resolver for the given metadata host.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::InvalidEndpoint`] when `base_url` is not an
    /// absolute http(s) URL, or [`ResolveError::Client`] if the HTTP client
    /// cannot be built.
    #[tracing::instrument(skip(timeouts))]
    pub fn new(base_url: &str, timeouts: HttpTimeouts) -> Result<Self, ResolveError> {
        let parsed = Url::parse(base_url)
            .map_err(|e| ResolveError::invalid_endpoint(base_url, &e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ResolveError::invalid_endpoint(
                base_url,
                "scheme must be http or https",
            ));
        }
        let client =
            build_http_client(timeouts).map_err(|source| ResolveError::Client { source })?;
        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    /// Builds the metadata URL for `video_id`.
    #[must_use]
    pub fn endpoint_for(&self, video_id: &str) -> Url {
        let mut endpoint = self.base_url.clone();
        endpoint.set_path(VIDEO_INFO_PATH);
        endpoint.set_query(None);
        endpoint
            .query_pairs_mut()
            .append_pair("video_id", video_id);
        endpoint
    }
}

impl std::fmt::Debug for VideoInfoResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoInfoResolver")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Resolver for VideoInfoResolver {
    fn name(&self) -> &'static str {
        "video_info"
    }

    #[tracing::instrument(skip(self), fields(resolver = "video_info"))]
    async fn resolve(&self, video_id: &str) -> Result<ResolvedVideo, ResolveError> {
        let endpoint = self.endpoint_for(video_id);
        debug!(url = %endpoint, "Requesting video metadata");

        let response = self
            .client
            .get(endpoint.clone())
            .send()
            .await
            .map_err(|e| ResolveError::network(endpoint.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("Unknown");
            debug!(status = status.as_u16(), %reason, "Metadata endpoint error");
            return Err(ResolveError::http_status(
                endpoint.as_str(),
                status.as_u16(),
                reason,
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ResolveError::network(endpoint.as_str(), e))?;
        trace!(body_len = body.len(), "Received metadata body");

        let video = parse_video_info(video_id, &body)?;
        debug!(title = %video.title, file_name = %video.file_name, "Resolved video");
        Ok(video)
    }
}

/// Extracts a [`ResolvedVideo`] from a `get_video_info` response body.
///
/// A document without `streamingData` yields [`ResolveError::NoStreams`]
/// before any other field is inspected. An empty `formats` list is reported
/// the same way.
///
/// # Errors
///
/// - [`ResolveError::Decode`] when the body is not a valid query string
/// - [`ResolveError::Parse`] when `player_response` is missing, is not JSON,
///   or lacks the title or a usable first format
/// - [`ResolveError::NoStreams`] when no stream is advertised
pub fn parse_video_info(video_id: &str, body: &str) -> Result<ResolvedVideo, ResolveError> {
    let form = query::decode(body).map_err(|e| ResolveError::decode(video_id, e))?;

    let raw_player = form
        .get_str("player_response")
        .ok_or_else(|| ResolveError::parse(video_id, "response has no player_response field"))?;

    let player: PlayerResponse = serde_json::from_str(raw_player).map_err(|e| {
        ResolveError::parse(video_id, format!("player_response is not valid JSON: {e}"))
    })?;

    let Some(streaming_data) = player.streaming_data else {
        return Err(ResolveError::no_streams(video_id));
    };

    let title = player
        .video_details
        .and_then(|details| details.title)
        .ok_or_else(|| ResolveError::parse(video_id, "videoDetails.title is missing"))?;

    let first = streaming_data
        .formats
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or_else(|| ResolveError::no_streams(video_id))?;

    let (Some(mime_type), Some(source_url)) = (first.mime_type, first.url) else {
        return Err(ResolveError::parse(
            video_id,
            "first format lacks mimeType or url",
        ));
    };
    let candidate = StreamCandidate::new(mime_type, source_url);

    let container = candidate.container_format().ok_or_else(|| {
        ResolveError::parse(
            video_id,
            format!(
                "cannot derive container format from MIME type '{}'",
                candidate.mime_type
            ),
        )
    })?;
    let file_name = derive_file_name(&title, container);

    Ok(ResolvedVideo {
        video_id: video_id.to_string(),
        title,
        file_name,
        candidate,
    })
}
