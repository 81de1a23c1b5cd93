// src/fetch/mod.rs

use anyhow::{Context, Result};
use futures_util::StreamExt;
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

pub mod codes;
pub mod population;
pub mod titles;

/// Build the single client used for a run. No timeout and no retry policy:
/// a hung or failing request halts the caller.
pub fn build_client(user_agent: &str) -> Result<Client> {
    Client::builder()
        .user_agent(user_agent)
        .build()
        .context("building HTTP client")
}

/// Upper bound on the preallocation taken from a `Content-Length` header.
const MAX_PREALLOC: usize = 64 << 20;

/// GET `url` and decode the body as strict UTF-8. Non-success statuses and
/// malformed bytes are errors.
pub async fn get_text(client: &Client, url: &str) -> Result<String> {
    let url = Url::parse(url).with_context(|| format!("parsing URL {}", url))?;
    debug!("Fetching text from {}", url);
    let body = client
        .get(url.clone())
        .send()
        .await
        .with_context(|| format!("GET {} failed", url))?
        .error_for_status()
        .with_context(|| format!("Non-success status {}", url))?
        .bytes()
        .await
        .with_context(|| format!("Reading body from {}", url))?;
    String::from_utf8(body.to_vec())
        .with_context(|| format!("Body of {} is not valid UTF-8", url))
}

/// GET `url` with `query` appended and collect the streamed body into memory.
pub async fn get_bytes(client: &Client, url: &str, query: &[(&str, &str)]) -> Result<Vec<u8>> {
    let url = Url::parse_with_params(url, query)
        .with_context(|| format!("parsing URL {}", url))?;
    debug!("Fetching bytes from {}", url);
    let response = client
        .get(url.clone())
        .send()
        .await
        .with_context(|| format!("GET {} failed", url))?
        .error_for_status()
        .with_context(|| format!("Non-success status {}", url))?;

    let hint = response.content_length().unwrap_or(0).min(MAX_PREALLOC as u64) as usize;
    let mut body = Vec::with_capacity(hint);
    let mut stream = response.bytes_stream();
    let mut next_report = 1024 * 1024;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.with_context(|| format!("Reading body chunk from {}", url))?;
        body.extend_from_slice(&chunk);

        if body.len() >= next_report {
            debug!("Downloaded {} KiB", body.len() / 1024);
            next_report += 1024 * 1024;
        }
    }

    info!(bytes = body.len(), "downloaded {}", url);
    Ok(body)
}
