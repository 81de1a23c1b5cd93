// src/fetch/titles.rs

use anyhow::{anyhow, Result};
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, instrument};

use super::get_text;
use crate::config::TitleConfig;

/// Fetch the configured forum listing and return its post titles in document order.
#[instrument(level = "info", skip(client, cfg), fields(url = %cfg.url))]
pub async fn fetch_titles(client: &Client, cfg: &TitleConfig) -> Result<Vec<String>> {
    let html = get_text(client, &cfg.url).await?;
    extract_titles(&html, &cfg.selector)
}

/// Every element matching `container` contributes the text of its first link.
/// Containers without a link (deleted posts) are skipped.
pub fn extract_titles(html: &str, container: &str) -> Result<Vec<String>> {
    let container_sel = Selector::parse(container)
        .map_err(|e| anyhow!("invalid selector {:?}: {:?}", container, e))?;
    let link_sel = Selector::parse("a").map_err(|e| anyhow!("invalid link selector: {:?}", e))?;

    let document = Html::parse_document(html);
    let mut titles = Vec::new();
    for (idx, elem) in document.select(&container_sel).enumerate() {
        match elem.select(&link_sel).next() {
            Some(link) => titles.push(link.text().collect::<String>()),
            None => debug!(idx, "title container without link, skipping"),
        }
    }
    Ok(titles)
}
