use anyhow::Result;
use censuscrawl::{Config, Crawler};
use tokio::time::Instant;
use tracing::{error, info};
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
    let config = Config::load().inspect_err(|e| error!("invalid configuration: {:#}", e))?;
    info!(
        base = %config.base_url,
        output = %config.output_dir.display(),
        reports = config.report_types.len(),
        "configured"
    );

    // ─── 3) output dir + client ──────────────────────────────────────
    let crawler = Crawler::from_config(&config).inspect_err(|e| error!("setup failed: {:#}", e))?;

    // ─── 4) crawl ────────────────────────────────────────────────────
    let start = Instant::now();
    let summary = crawler.run().await;

    info!(elapsed = ?start.elapsed(), "all done: {}", summary);
    Ok(())
}
