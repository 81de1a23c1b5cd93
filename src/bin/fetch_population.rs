use anyhow::Result;
use popmap::{config::Config, fetch::build_client, pipeline::load_sheet};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Download and parse the population sheet without rendering anything.
#[tokio::main]
async fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let cfg = Config::default();
    let client = build_client(&cfg.user_agent)?;

    let sheet = load_sheet(&client, &cfg).await?;
    info!(
        last_updated = %sheet.last_updated,
        report_year = sheet.report_year(),
        columns = sheet.headers.len(),
        rows = sheet.rows.len(),
        "population sheet loaded"
    );
    Ok(())
}
