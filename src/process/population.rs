// src/process/population.rs

use anyhow::{anyhow, Context, Result};
use std::collections::BTreeMap;
use tracing::{info, instrument, trace, warn};

use super::sheet::Sheet;
use crate::fetch::codes::CountryCodes;
use crate::render::RegionMap;

pub const COUNTRY_CODE_COLUMN: &str = "Country Code";

/// Lower-cased alpha-2 code → population for one year.
pub type PopulationMap = BTreeMap<String, u64>;

/// Keep a row only when its alpha-3 code maps to a non-empty alpha-2 code the
/// region map knows, and its value for `year` is non-empty. Aggregates such as
/// "World" or "Euro area" have no alpha-2 entry and drop out here.
#[instrument(level = "info", skip(sheet, codes, regions), fields(rows = sheet.rows.len()))]
pub fn build_population_map<R: RegionMap + ?Sized>(
    sheet: &Sheet,
    codes: &CountryCodes,
    year: i32,
    regions: &R,
) -> Result<PopulationMap> {
    let code_idx = sheet
        .column_index(COUNTRY_CODE_COLUMN)
        .ok_or_else(|| anyhow!("sheet has no {:?} column", COUNTRY_CODE_COLUMN))?;
    let year_key = year.to_string();
    let year_idx = sheet.column_index(&year_key);
    if year_idx.is_none() {
        warn!(year, "sheet has no column for the report year");
    }

    let mut map = PopulationMap::new();
    for row in &sheet.rows {
        let alpha3 = row.get(code_idx).map(String::as_str).unwrap_or("");
        let code = codes.get(alpha3).unwrap_or("").to_lowercase();
        if code.is_empty() || !regions.recognizes(&code) {
            trace!(alpha3, %code, "no map region, skipping");
            continue;
        }

        let value = year_idx
            .and_then(|idx| row.get(idx))
            .map(String::as_str)
            .unwrap_or("");
        if value.is_empty() {
            trace!(alpha3, year, "no value, skipping");
            continue;
        }

        let population: u64 = value
            .parse()
            .with_context(|| format!("population {:?} for {} in {}", value, alpha3, year))?;
        map.insert(code, population);
    }

    info!(year, countries = map.len(), "built population map");
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Choropleth;
    use chrono::NaiveDate;
    use std::collections::HashSet;

    struct KnownRegions(HashSet<&'static str>);

    impl RegionMap for KnownRegions {
        fn recognizes(&self, code: &str) -> bool {
            self.0.contains(code)
        }

        fn render(&self, _chart: &Choropleth<'_>) -> Result<String> {
            Ok(String::new())
        }
    }

    fn regions(codes: &[&'static str]) -> KnownRegions {
        KnownRegions(codes.iter().copied().collect())
    }

    fn sheet(rows: &[[&str; 3]]) -> Sheet {
        Sheet {
            last_updated: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
            headers: vec!["Country Name".into(), "Country Code".into(), "2020".into()],
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn maps_alpha3_row_to_lowercase_alpha2() -> Result<()> {
        let sheet = sheet(&[["United States", "USA", "123456"]]);
        let codes: CountryCodes = [("USA", "US")].into_iter().collect();
        let map = build_population_map(&sheet, &codes, 2020, &regions(&["us"]))?;
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("us"), Some(&123456));
        Ok(())
    }

    #[test]
    fn blank_value_is_excluded() -> Result<()> {
        let sheet = sheet(&[["United States", "USA", ""], ["France", "FRA", "67000000"]]);
        let codes: CountryCodes = [("USA", "US"), ("FRA", "FR")].into_iter().collect();
        let map = build_population_map(&sheet, &codes, 2020, &regions(&["us", "fr"]))?;
        assert!(!map.contains_key("us"));
        assert_eq!(map.get("fr"), Some(&67_000_000));
        Ok(())
    }

    #[test]
    fn unknown_alpha3_is_excluded() -> Result<()> {
        let sheet = sheet(&[["World", "WLD", "7800000000"]]);
        let codes: CountryCodes = [("USA", "US")].into_iter().collect();
        let map = build_population_map(&sheet, &codes, 2020, &regions(&["us"]))?;
        assert!(map.is_empty());
        Ok(())
    }

    #[test]
    fn unrecognized_region_is_excluded() -> Result<()> {
        let sheet = sheet(&[["Kosovo", "XKX", "1790000"]]);
        let codes: CountryCodes = [("XKX", "XK")].into_iter().collect();
        let map = build_population_map(&sheet, &codes, 2020, &regions(&["us"]))?;
        assert!(map.is_empty());
        Ok(())
    }

    #[test]
    fn missing_year_column_yields_empty_map() -> Result<()> {
        let sheet = sheet(&[["United States", "USA", "123456"]]);
        let codes: CountryCodes = [("USA", "US")].into_iter().collect();
        let map = build_population_map(&sheet, &codes, 1999, &regions(&["us"]))?;
        assert!(map.is_empty());
        Ok(())
    }

    #[test]
    fn non_integer_value_is_an_error() {
        let sheet = sheet(&[["United States", "USA", "12.5e3"]]);
        let codes: CountryCodes = [("USA", "US")].into_iter().collect();
        assert!(build_population_map(&sheet, &codes, 2020, &regions(&["us"])).is_err());
    }

    #[test]
    fn missing_code_column_is_an_error() {
        let mut sheet = sheet(&[]);
        sheet.headers[1] = "ISO3".into();
        let codes = CountryCodes::default();
        assert!(build_population_map(&sheet, &codes, 2020, &regions(&[])).is_err());
    }
}
