// src/config.rs

use std::path::PathBuf;

// one can view the population data at https://data.worldbank.org/indicator/SP.POP.TOTL
pub const POPULATION_URL: &str = "https://api.worldbank.org/v2/en/indicator/SP.POP.TOTL";
pub const DOWNLOAD_FORMAT: &str = "csv";
/// The archive also ships two `Metadata*.csv` files next to the data file.
pub const POPULATION_MEMBER_PREFIX: &str = "API_SP.POP.TOTL";
pub const COUNTRY_CODES_URL: &str = "https://www.iban.com/country-codes";

pub const FORUM_URL: &str = "https://www.ptt.cc/bbs/Python/index442.html";
pub const TITLE_SELECTOR: &str = "div.title";
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) \
    Chrome/93.0.4577.82 Safari/537.36";

/// Settings for the population map pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub population_url: String,
    pub download_format: String,
    pub member_prefix: String,
    pub country_codes_url: String,
    pub user_agent: String,
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            population_url: POPULATION_URL.to_string(),
            download_format: DOWNLOAD_FORMAT.to_string(),
            member_prefix: POPULATION_MEMBER_PREFIX.to_string(),
            country_codes_url: COUNTRY_CODES_URL.to_string(),
            user_agent: BROWSER_USER_AGENT.to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}

/// Settings for the forum title scraper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleConfig {
    pub url: String,
    pub selector: String,
    pub user_agent: String,
}

impl Default for TitleConfig {
    fn default() -> Self {
        Self {
            url: FORUM_URL.to_string(),
            selector: TITLE_SELECTOR.to_string(),
            user_agent: BROWSER_USER_AGENT.to_string(),
        }
    }
}
