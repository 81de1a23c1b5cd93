use anyhow::Result;
use popmap::{
    config::TitleConfig,
    fetch::{build_client, titles::fetch_titles},
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the titles, logs go to stderr
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let cfg = TitleConfig::default();
    let client = build_client(&cfg.user_agent)?;

    let titles = fetch_titles(&client, &cfg).await?;
    for title in &titles {
        println!("{}", title);
    }

    info!(count = titles.len(), "titles printed");
    Ok(())
}
