// src/fetch/codes.rs

use anyhow::{anyhow, bail, Result};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use tracing::{info, instrument, trace};

use super::get_text;
use crate::config::Config;

/// Alpha-3 → alpha-2 ISO country codes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryCodes {
    alpha3_to_alpha2: HashMap<String, String>,
}

impl CountryCodes {
    pub fn get(&self, alpha3: &str) -> Option<&str> {
        self.alpha3_to_alpha2.get(alpha3).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.alpha3_to_alpha2.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alpha3_to_alpha2.is_empty()
    }
}

impl<A: Into<String>, B: Into<String>> FromIterator<(A, B)> for CountryCodes {
    fn from_iter<I: IntoIterator<Item = (A, B)>>(iter: I) -> Self {
        Self {
            alpha3_to_alpha2: iter
                .into_iter()
                .map(|(a3, a2)| (a3.into(), a2.into()))
                .collect(),
        }
    }
}

#[instrument(level = "info", skip(client, cfg), fields(url = %cfg.country_codes_url))]
pub async fn fetch_country_codes(client: &Client, cfg: &Config) -> Result<CountryCodes> {
    let html = get_text(client, &cfg.country_codes_url).await?;
    let codes = parse_code_table(&html)?;
    info!(count = codes.len(), "parsed country code table");
    Ok(codes)
}

/// Parse every `<tbody>` row as `name, alpha-2, alpha-3, numeric`.
/// A row with any other number of cells means the page layout changed.
pub fn parse_code_table(html: &str) -> Result<CountryCodes> {
    let row_sel = selector("table tbody tr")?;
    let cell_sel = selector("td")?;

    let document = Html::parse_document(html);
    let mut map = HashMap::new();
    for (idx, row) in document.select(&row_sel).enumerate() {
        let cells: Vec<String> = row.select(&cell_sel).map(cell_text).collect();
        let [name, alpha2, alpha3, _numeric] = cells.as_slice() else {
            bail!(
                "country code table row {} has {} cells, expected 4",
                idx,
                cells.len()
            );
        };
        trace!(%name, %alpha3, %alpha2, "code row");
        map.insert(alpha3.clone(), alpha2.clone());
    }

    Ok(CountryCodes {
        alpha3_to_alpha2: map,
    })
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("invalid selector {:?}: {:?}", css, e))
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}
