use anyhow::{Context, Result};
use std::time::Duration;

const USER_AGENT: &str = concat!("fxbot/", env!("CARGO_PKG_VERSION"));

/// Builds the HTTP client shared by every request of a rate source.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .context("Failed to build HTTP client")
}
