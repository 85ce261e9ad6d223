//! Shared outbound HTTP client.
//!
//! One `reqwest::Client` for the whole process: fixed per-request
//! timeout, desktop User-Agent (several of the sources serve a stripped
//! page to unknown agents), rustls transport.

use std::time::Duration;

use anyhow::{Context, Result};

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0 Safari/537.36";

/// Build the process-wide client. Timeout covers connect plus body read;
/// a hung source page must fail inside its own task, never the batch.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .context("building http client")
}

/// Fetch a page and return its body text. Non-2xx is an error.
pub async fn fetch_text(client: &reqwest::Client, url: &str) -> Result<String> {
    let resp = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("requesting {url}"))?;
    let resp = resp
        .error_for_status()
        .with_context(|| format!("bad status from {url}"))?;
    resp.text()
        .await
        .with_context(|| format!("reading body of {url}"))
}
