// src/core/net.rs
// Blocking HTTP GET. One client per run, shared by all workers.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::config::consts::USER_AGENT;
use crate::error::FetchError;

#[derive(Clone, Debug)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(timeout_secs: u64) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }

    /// Body of a 200 response as text. Any other status is an error.
    pub fn get(&self, url: &str) -> Result<String, FetchError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|source| FetchError::Transport { url: url.to_string(), source })?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            return Err(FetchError::Status { url: url.to_string(), status: status.as_u16() });
        }
        let body = resp
            .text()
            .map_err(|source| FetchError::Transport { url: url.to_string(), source })?;
        logd!("GET {url} -> {} bytes", body.len());
        Ok(body)
    }
}

/// Anything that can hand back a page body for a URL.
/// Workers share one source across threads.
pub trait PageSource: Sync {
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

impl PageSource for Fetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.get(url)
    }
}
