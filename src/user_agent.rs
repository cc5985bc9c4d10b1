//! Shared User-Agent string for metadata and transfer HTTP clients.

/// Default User-Agent for every request the tool makes (identifies the tool).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("tubegrab/{version} (video-downloader)")
}
