// src/pipeline.rs

use anyhow::{Context, Result};
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

use crate::config::Config;
use crate::fetch::codes::{fetch_country_codes, CountryCodes};
use crate::fetch::population::request_population_data;
use crate::process::{build_population_map, parse_sheet, read_member_text, PopulationMap, Sheet};
use crate::render::{Choropleth, RegionMap};

pub const MAP_TITLE: &str = "World population (source: World Bank)";

pub fn output_file_name(year: i32) -> String {
    format!("country-map-{}.svg", year)
}

/// Download the archive, extract the data member and parse it.
pub async fn load_sheet(client: &Client, cfg: &Config) -> Result<Sheet> {
    let bytes = request_population_data(client, cfg).await?;
    let content = read_member_text(&bytes, &cfg.member_prefix)?;
    parse_sheet(&content)
}

/// Full run: population sheet + code table → SVG written to
/// `<output_dir>/country-map-<year>.svg`. Nothing is written on error.
#[instrument(level = "info", skip_all)]
pub async fn generate_population_map<R: RegionMap + ?Sized>(
    client: &Client,
    cfg: &Config,
    regions: &R,
) -> Result<PathBuf> {
    let sheet = load_sheet(client, cfg).await?;
    let codes = fetch_country_codes(client, cfg).await?;
    let (path, _) = render_population_map(&sheet, &codes, regions, &cfg.output_dir).await?;
    Ok(path)
}

/// Filter the sheet down to the report year, render it and write the file.
pub async fn render_population_map<R: RegionMap + ?Sized>(
    sheet: &Sheet,
    codes: &CountryCodes,
    regions: &R,
    output_dir: &Path,
) -> Result<(PathBuf, PopulationMap)> {
    let year = sheet.report_year();
    info!(last_updated = %sheet.last_updated, year, "report year");

    let values = build_population_map(sheet, codes, year, regions)?;
    let svg = regions.render(&Choropleth {
        title: MAP_TITLE,
        label: year.to_string(),
        values: &values,
    })?;
    let path = write_map(output_dir, year, &svg).await?;
    Ok((path, values))
}

pub async fn write_map(output_dir: &Path, year: i32, svg: &str) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)
        .await
        .with_context(|| format!("creating {:?}", output_dir))?;
    let path = output_dir.join(output_file_name(year));
    fs::write(&path, svg)
        .await
        .with_context(|| format!("writing {:?}", path))?;
    info!(path = %path.display(), bytes = svg.len(), "wrote map");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::WorldMap;
    use chrono::NaiveDate;
    use tempfile::tempdir;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,popmap=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    #[test]
    fn file_name_follows_year() {
        assert_eq!(output_file_name(2020), "country-map-2020.svg");
    }

    #[tokio::test]
    async fn renders_and_writes_one_file() -> Result<()> {
        init_test_logging();
        let tmp = tempdir()?;
        let sheet = Sheet {
            last_updated: NaiveDate::from_ymd_opt(2021, 3, 1).unwrap(),
            headers: vec!["Country Code".into(), "2020".into()],
            rows: vec![
                vec!["USA".into(), "329484123".into()],
                vec!["WLD".into(), "7820982606".into()],
            ],
        };
        let codes: CountryCodes = [("USA", "US")].into_iter().collect();

        let out = tmp.path().join("maps");
        let (path, values) = render_population_map(&sheet, &codes, &WorldMap::new(), &out).await?;

        assert_eq!(path, out.join("country-map-2020.svg"));
        assert_eq!(values.len(), 1);
        assert_eq!(values.get("us"), Some(&329_484_123));

        let svg = std::fs::read_to_string(&path)?;
        assert!(svg.contains(MAP_TITLE));
        assert_eq!(std::fs::read_dir(&out)?.count(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn bad_value_writes_nothing() -> Result<()> {
        init_test_logging();
        let tmp = tempdir()?;
        let sheet = Sheet {
            last_updated: NaiveDate::from_ymd_opt(2021, 3, 1).unwrap(),
            headers: vec!["Country Code".into(), "2020".into()],
            rows: vec![vec!["USA".into(), "n/a".into()]],
        };
        let codes: CountryCodes = [("USA", "US")].into_iter().collect();

        let res = render_population_map(&sheet, &codes, &WorldMap::new(), tmp.path()).await;
        assert!(res.is_err());
        assert_eq!(std::fs::read_dir(tmp.path())?.count(), 0);
        Ok(())
    }
}
