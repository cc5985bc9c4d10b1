//! HTTP client wrapper for streaming a media URL to disk.
//!
//! This module provides the `HttpClient` struct which asks for the size with a
//! HEAD request, streams the GET body into the destination file while
//! feeding an optional progress counter, and runs audio extraction once the
//! video is complete.

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use reqwest::Client;
use reqwest::header::{
    CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE, HeaderMap, HeaderName,
    HeaderValue,
};
use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::error::TransferError;
use super::progress::ProgressCounter;
use crate::audio::{AudioExtractor, audio_path_for};
use crate::http_client::{HttpTimeouts, build_transfer_client};

/// HTTP client for streaming media files with a HEAD size lookup.
///
/// Create once and reuse for every job to share the connection pool.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use tubegrab_core::download::{HttpClient, TransferOptions};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new()?;
/// let outcome = client
///     .transfer(
///         "https://cdn.example.com/video.mp4",
///         Path::new("./videos"),
///         TransferOptions::new("video.mp4"),
///     )
///     .await?;
/// println!("Downloaded {} bytes to {}", outcome.bytes_written, outcome.path.display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

/// Per-transfer settings.
#[derive(Debug, Clone)]
pub struct TransferOptions<'a> {
    /// File name inside the destination directory.
    pub file_name: &'a str,
    /// Counter updated on every write, when progress is reported.
    pub progress: Option<ProgressCounter>,
    /// Extractor to run on the finished file, when audio is wanted.
    pub audio: Option<&'a AudioExtractor>,
}

impl<'a> TransferOptions<'a> {
    /// Options for a plain transfer without progress or audio.
    #[must_use]
    pub fn new(file_name: &'a str) -> Self {
        Self {
            file_name,
            progress: None,
            audio: None,
        }
    }

    /// Attaches a progress counter.
    #[must_use]
    pub fn with_progress(mut self, counter: ProgressCounter) -> Self {
        self.progress = Some(counter);
        self
    }

    /// Requests audio extraction after the download.
    #[must_use]
    pub fn with_audio(mut self, extractor: &'a AudioExtractor) -> Self {
        self.audio = Some(extractor);
        self
    }
}

/// Result of a finished transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutcome {
    /// Path of the downloaded video.
    pub path: PathBuf,
    /// Bytes written to `path`.
    pub bytes_written: u64,
    /// Size reported by the server, when known.
    pub total_bytes: Option<u64>,
    /// Path of the extracted audio, when requested.
    pub audio_path: Option<PathBuf>,
}

impl HttpClient {
    /// Creates a client with default timeouts (30s connect, 5min between reads).
    ///
    /// # Errors
    ///
    /// Returns the `reqwest` error when the client cannot be built.
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_timeouts(HttpTimeouts::default())
    }

    /// Creates a client with explicit timeouts.
    ///
    /// # Errors
    ///
    /// Returns the `reqwest` error when the client cannot be built.
    #[instrument(level = "debug")]
    pub fn with_timeouts(timeouts: HttpTimeouts) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_transfer_client(timeouts)?,
        })
    }

    /// Streams `source_url` into `destination/{file_name}`.
    ///
    /// The destination file is created (or truncated) first. A HEAD request
    /// supplies the expected size; its failure only makes the total unknown.
    /// When the body ends short of a known total, or the copy is interrupted,
    /// the transfer fails with [`TransferError::Incomplete`] and the partial
    /// file stays on disk. Audio extraction runs only after a complete
    /// download and never removes the video.
    ///
    /// # Errors
    ///
    /// - [`TransferError::InvalidUrl`] if `source_url` cannot be parsed
    /// - [`TransferError::Io`] if the destination cannot be created
    /// - [`TransferError::Network`] if the GET request fails to send
    /// - [`TransferError::HttpStatus`] on a non-success GET status
    /// - [`TransferError::Incomplete`] on a short or interrupted copy
    /// - [`TransferError::AudioExtractionFailed`] if extraction fails
    #[instrument(skip(self, options), fields(url = %source_url, file_name = %options.file_name))]
    pub async fn transfer(
        &self,
        source_url: &str,
        destination: &Path,
        options: TransferOptions<'_>,
    ) -> Result<TransferOutcome, TransferError> {
        let parsed_url =
            Url::parse(source_url).map_err(|_| TransferError::invalid_url(source_url))?;

        let path = destination.join(options.file_name);
        let mut file = File::create(&path)
            .await
            .map_err(|e| TransferError::io(path.clone(), e))?;
        debug!(path = %path.display(), "opened destination");

        let head_total = self.head_content_length(&parsed_url).await;

        let response = self
            .client
            .get(parsed_url.clone())
            .headers(attachment_headers(options.file_name))
            .send()
            .await
            .map_err(|e| TransferError::network(source_url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransferError::http_status(
                source_url,
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown"),
            ));
        }

        let total_bytes = head_total.or_else(|| header_content_length(response.headers()));
        if let Some(counter) = &options.progress {
            counter.set_total(total_bytes);
        }

        let bytes_written =
            stream_to_file(&mut file, response, &path, total_bytes, options.progress.as_ref())
                .await?;

        if let Some(expected) = total_bytes
            && bytes_written < expected
        {
            warn!(
                path = %path.display(),
                written = bytes_written,
                expected,
                "body ended before the reported length"
            );
            return Err(TransferError::incomplete(
                path,
                bytes_written,
                total_bytes,
                "body ended before the reported length",
            ));
        }

        info!(path = %path.display(), bytes = bytes_written, "download complete");

        let audio_path = match options.audio {
            Some(extractor) => {
                let audio_path = audio_path_for(&path);
                extractor
                    .extract(&path, &audio_path)
                    .await
                    .map_err(|e| TransferError::audio_extraction_failed(path.clone(), e))?;
                Some(audio_path)
            }
            None => None,
        };

        Ok(TransferOutcome {
            path,
            bytes_written,
            total_bytes,
            audio_path,
        })
    }

    /// Best-effort size lookup; any failure yields `None`.
    async fn head_content_length(&self, url: &Url) -> Option<u64> {
        let response = match self.client.head(url.clone()).send().await {
            Ok(response) => response,
            Err(error) => {
                debug!(error = %error, "HEAD request failed; total size unknown");
                return None;
            }
        };
        if !response.status().is_success() {
            debug!(status = response.status().as_u16(), "HEAD request rejected; total size unknown");
            return None;
        }
        let total = header_content_length(response.headers());
        debug!(total = ?total, "content length from HEAD");
        total
    }

    /// Returns a reference to the underlying reqwest client.
    #[must_use]
    pub fn inner(&self) -> &Client {
        &self.client
    }
}

/// Streams the response body to `file`, returning bytes written.
///
/// Any read or write failure becomes [`TransferError::Incomplete`] carrying
/// the bytes written so far; the file is left in place.
async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    path: &Path,
    expected: Option<u64>,
    progress: Option<&ProgressCounter>,
) -> Result<u64, TransferError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = match chunk_result {
            Ok(chunk) => chunk,
            Err(error) => {
                // Keep what has been received so far.
                let mut reason = format!("connection interrupted: {error}");
                if let Some(note) = flush_partial(&mut writer, path).await {
                    reason.push_str(&note);
                }
                return Err(TransferError::incomplete(path, bytes_written, expected, reason));
            }
        };

        writer.write_all(&chunk).await.map_err(|e| {
            TransferError::incomplete(path, bytes_written, expected, format!("write failed: {e}"))
        })?;

        let len = chunk.len() as u64;
        bytes_written += len;
        if let Some(counter) = progress {
            counter.add(len);
        }
    }

    writer.flush().await.map_err(|e| {
        TransferError::incomplete(path, bytes_written, expected, format!("flush failed: {e}"))
    })?;

    Ok(bytes_written)
}

/// Flushes whatever is buffered after an interrupted stream. On failure the
/// error is logged and returned as a note for the `Incomplete` reason, since
/// fewer bytes than counted may then be on disk.
async fn flush_partial<W>(writer: &mut W, path: &Path) -> Option<String>
where
    W: AsyncWrite + Unpin,
{
    match writer.flush().await {
        Ok(()) => None,
        Err(error) => {
            warn!(path = %path.display(), error = %error, "could not flush partial download");
            Some(format!("; flush of buffered bytes failed ({error}), fewer bytes may be on disk"))
        }
    }
}

fn header_content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
}

/// Fixed attachment-style request headers naming the output file.
fn attachment_headers(file_name: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("public"));
    headers.insert(
        HeaderName::from_static("content-description"),
        HeaderValue::from_static("File Transfer"),
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/zip"));
    headers.insert(
        HeaderName::from_static("content-transfer-encoding"),
        HeaderValue::from_static("binary"),
    );
    // Derived file names only contain [A-Za-z0-9._-], so this never fails for them.
    if let Ok(value) = HeaderValue::from_str(&format!("attachment; filename={file_name}")) {
        headers.insert(CONTENT_DISPOSITION, value);
    }
    headers
}
