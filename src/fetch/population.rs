// src/fetch/population.rs

use anyhow::Result;
use reqwest::Client;
use tracing::instrument;

use super::get_bytes;
use crate::config::Config;

/// Download the zipped World Bank population indicator.
#[instrument(level = "info", skip(client, cfg), fields(url = %cfg.population_url))]
pub async fn request_population_data(client: &Client, cfg: &Config) -> Result<Vec<u8>> {
    get_bytes(
        client,
        &cfg.population_url,
        &[("downloadformat", cfg.download_format.as_str())],
    )
    .await
}
