//! Long-lived HTTP session shared by every download.
//!
//! The session wraps a single `reqwest::Client` so that all concurrent
//! downloads reuse one connection pool. It is opened once before the prompt
//! starts accepting input and closed once after `exit`.

use reqwest::Client;
use tracing::{debug, instrument};

use super::error::DownloadError;
use crate::user_agent;

/// Shared HTTP session (connection pool) for the lifetime of the prompt.
///
/// Cloning is cheap and hands out another reference to the same pool; the
/// download tasks each hold such a clone for read-only use.
///
/// No request or connect timeout is configured: a stalled server stalls only
/// its own download.
#[derive(Debug, Clone)]
pub struct Session {
    client: Client,
}

impl Session {
    /// Opens the session.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Client`] if the HTTP client cannot be built
    /// (for example when no TLS backend can be initialised).
    #[instrument(level = "debug")]
    pub fn open() -> Result<Self, DownloadError> {
        let client = Client::builder()
            .gzip(true)
            .user_agent(user_agent::default_download_user_agent())
            .build()
            .map_err(|source| DownloadError::Client { source })?;
        debug!("HTTP session opened");
        Ok(Self { client })
    }

    /// Issues a GET for `url` and returns the response once headers arrive.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Network`] if the request cannot be sent and
    /// [`DownloadError::HttpStatus`] for non-success status codes.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn get(&self, url: &str) -> Result<reqwest::Response, DownloadError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        debug!(
            status = status.as_u16(),
            content_length = response.content_length(),
            "response headers received"
        );
        Ok(response)
    }

    /// Closes the session.
    ///
    /// Clones still held by in-flight downloads keep their connections until
    /// those downloads end; this handle is released immediately.
    #[instrument(level = "debug", skip(self))]
    pub fn close(self) {
        drop(self.client);
        debug!("HTTP session closed");
    }
}
