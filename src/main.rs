//! Market News Sentinel — Binary Entrypoint
//! Boots the filter pipeline, the cycle scheduler, and the Axum command
//! surface. Configuration errors here are fatal; everything after startup
//! recovers locally.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use market_news_sentinel::api::{create_router, AppState};
use market_news_sentinel::collect::providers::{
    gnews::GnewsCollector, social::SocialSearchCollector,
};
use market_news_sentinel::collect::types::SourceCollector;
use market_news_sentinel::config::AppConfig;
use market_news_sentinel::dedup::SeenStore;
use market_news_sentinel::judge::openai::OpenAiJudge;
use market_news_sentinel::metrics::Metrics;
use market_news_sentinel::notify::telegram::TelegramNotifier;
use market_news_sentinel::pipeline::FilterPipeline;
use market_news_sentinel::scheduler::SentinelScheduler;
use market_news_sentinel::scoring::KeywordScorer;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("market_news_sentinel=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    // Fatal on missing credentials or bad thresholds: refuse to start
    // half-configured.
    let cfg = AppConfig::from_env()?;
    let scorer = KeywordScorer::from_toml()?;

    let metrics = Metrics::init(cfg.interval_secs);

    let mut collectors: Vec<Box<dyn SourceCollector>> = vec![Box::new(
        GnewsCollector::from_api_key(cfg.gnews_api_key.clone())?,
    )];
    if let Some(url) = cfg.social_search_url.clone() {
        collectors.push(Box::new(SocialSearchCollector::from_url(
            url,
            cfg.social_search_query.clone(),
        )?));
    }

    let judge = Arc::new(OpenAiJudge::new(cfg.openai_api_key.clone(), None)?);
    let notifier = Arc::new(TelegramNotifier::new(
        cfg.telegram_token.clone(),
        cfg.telegram_chat_id.clone(),
    ));

    let pipeline = Arc::new(FilterPipeline::new(
        collectors,
        SeenStore::default(),
        scorer,
        judge,
        notifier,
    ));

    let scheduler = Arc::new(SentinelScheduler::new(
        pipeline,
        Duration::from_secs(cfg.interval_secs),
    ));
    scheduler.start();

    let router = create_router(AppState {
        scheduler: scheduler.clone(),
    })
    .merge(metrics.router());

    let listener = tokio::net::TcpListener::bind(cfg.bind_addr).await?;
    tracing::info!(addr = %cfg.bind_addr, interval_secs = cfg.interval_secs, "sentinel listening");
    axum::serve(listener, router).await?;
    Ok(())
}
