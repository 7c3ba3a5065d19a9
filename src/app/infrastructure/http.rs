//! HTTP access to tile servers.
//!
//! The tile fetcher only talks to [`TileClient`], so tests can swap in a
//! canned client instead of hitting the network.

use tracing::{debug, trace};

use super::error::{AppError, Result};

/// Blocking HTTP GET for tile images.
pub trait TileClient: Send + Sync {
    /// Fetch `url` and return the response body.
    fn get(&self, url: &str) -> Result<Vec<u8>>;
}

/// [`TileClient`] backed by `minreq`.
#[derive(Debug, Clone)]
pub struct MinreqClient {
    user_agent: String,
    timeout_secs: u64,
}

impl MinreqClient {
    pub fn new(user_agent: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            user_agent: user_agent.into(),
            timeout_secs,
        }
    }
}

impl TileClient for MinreqClient {
    fn get(&self, url: &str) -> Result<Vec<u8>> {
        trace!(url, "GET");
        let response = minreq::get(url)
            .with_header("User-Agent", &self.user_agent)
            .with_timeout(self.timeout_secs)
            .send()?;

        if !(200..300).contains(&response.status_code) {
            return Err(AppError::HttpStatus {
                status: response.status_code,
                url: url.to_string(),
            });
        }

        let body = response.into_bytes();
        debug!(url, bytes = body.len(), "tile downloaded");
        Ok(body)
    }
}
