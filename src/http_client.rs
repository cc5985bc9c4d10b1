//! Shared HTTP client construction policy.
//!
//! The metadata resolver and the transfer engine build their `reqwest`
//! clients here so both agree on timeouts, user-agent, and compression.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::user_agent;

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (5 minutes for large files).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Connect/read timeouts applied to every request of a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    /// Maximum time to establish a connection, in seconds.
    pub connect_secs: u64,
    /// Read limit in seconds: the whole request for metadata clients, the
    /// longest silence between body chunks for transfer clients.
    pub read_secs: u64,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            connect_secs: CONNECT_TIMEOUT_SECS,
            read_secs: READ_TIMEOUT_SECS,
        }
    }
}

/// Builds a pooled HTTP client for short metadata requests.
///
/// `read_secs` bounds the whole request, body included.
///
/// # Errors
///
/// Returns the underlying `reqwest` error when the TLS backend or system
/// configuration cannot be initialized.
pub fn build_http_client(timeouts: HttpTimeouts) -> Result<Client, reqwest::Error> {
    debug!(
        connect_secs = timeouts.connect_secs,
        read_secs = timeouts.read_secs,
        "building metadata HTTP client"
    );
    base_builder(timeouts)
        .timeout(Duration::from_secs(timeouts.read_secs))
        .build()
}

/// Builds a pooled HTTP client for media transfers.
///
/// There is no cap on total request time; `read_secs` only bounds the gap
/// between two reads, so a slow but steady body runs to completion.
///
/// # Errors
///
/// Returns the underlying `reqwest` error when the TLS backend or system
/// configuration cannot be initialized.
pub fn build_transfer_client(timeouts: HttpTimeouts) -> Result<Client, reqwest::Error> {
    debug!(
        connect_secs = timeouts.connect_secs,
        idle_read_secs = timeouts.read_secs,
        "building transfer HTTP client"
    );
    base_builder(timeouts)
        .read_timeout(Duration::from_secs(timeouts.read_secs))
        .build()
}

fn base_builder(timeouts: HttpTimeouts) -> reqwest::ClientBuilder {
    Client::builder()
        .connect_timeout(Duration::from_secs(timeouts.connect_secs))
        .gzip(true)
        .user_agent(user_agent::default_user_agent())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeouts() {
        let timeouts = HttpTimeouts::default();
        assert_eq!(timeouts.connect_secs, 30);
        assert_eq!(timeouts.read_secs, 300);
    }

    #[test]
    fn test_build_http_client_with_custom_timeouts() {
        let client = build_http_client(HttpTimeouts {
            connect_secs: 1,
            read_secs: 2,
        });
        assert!(client.is_ok());
    }

    #[test]
    fn test_build_transfer_client_with_custom_timeouts() {
        let client = build_transfer_client(HttpTimeouts {
            connect_secs: 1,
            read_secs: 2,
        });
        assert!(client.is_ok());
    }
}
