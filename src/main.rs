use anyhow::Result;
use popmap::{
    config::Config,
    fetch::build_client,
    pipeline::generate_population_map,
    render::WorldMap,
};
use tokio::time::Instant;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) configure ────────────────────────────────────────────────
    let cfg = Config::default();
    let client = build_client(&cfg.user_agent)?;
    info!(output_dir = %cfg.output_dir.display(), "config loaded");

    // ─── 3) fetch, filter, render, write ─────────────────────────────
    let start = Instant::now();
    let path = generate_population_map(&client, &cfg, &WorldMap::new()).await?;

    info!(path = %path.display(), elapsed = ?start.elapsed(), "all done");
    Ok(())
}
