// src/config.rs
//! Process configuration from the environment. Missing credentials are a
//! startup error: the process refuses to run half-configured.

use anyhow::{Context, Result};
use std::net::SocketAddr;

pub const ENV_TELEGRAM_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
pub const ENV_TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_GNEWS_API_KEY: &str = "GNEWS_API_KEY";
pub const ENV_SOCIAL_SEARCH_URL: &str = "SOCIAL_SEARCH_URL";
pub const ENV_SOCIAL_SEARCH_QUERY: &str = "SOCIAL_SEARCH_QUERY";
pub const ENV_INTERVAL_SECS: &str = "SENTINEL_INTERVAL_SECS";
pub const ENV_BIND_ADDR: &str = "SENTINEL_BIND_ADDR";

pub const DEFAULT_INTERVAL_SECS: u64 = 300;
// The cadence this service is meant for: 3 to 15 minutes.
pub const MIN_INTERVAL_SECS: u64 = 180;
pub const MAX_INTERVAL_SECS: u64 = 900;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub telegram_token: String,
    pub telegram_chat_id: String,
    pub openai_api_key: String,
    pub gnews_api_key: String,
    /// Optional social search feed; absent means news-only.
    pub social_search_url: Option<String>,
    pub social_search_query: String,
    pub interval_secs: u64,
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let telegram_token = require(ENV_TELEGRAM_TOKEN)?;
        let telegram_chat_id = require(ENV_TELEGRAM_CHAT_ID)?;
        let openai_api_key = require(ENV_OPENAI_API_KEY)?;
        let gnews_api_key = require(ENV_GNEWS_API_KEY)?;

        let social_search_url = std::env::var(ENV_SOCIAL_SEARCH_URL)
            .ok()
            .filter(|s| !s.trim().is_empty());
        let social_search_query = std::env::var(ENV_SOCIAL_SEARCH_QUERY)
            .unwrap_or_else(|_| "market OR stocks OR fed".to_string());

        let interval_secs = parse_interval(std::env::var(ENV_INTERVAL_SECS).ok());

        let bind_addr = std::env::var(ENV_BIND_ADDR)
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse::<SocketAddr>()
            .context("parsing SENTINEL_BIND_ADDR")?;

        Ok(Self {
            telegram_token,
            telegram_chat_id,
            openai_api_key,
            gnews_api_key,
            social_search_url,
            social_search_query,
            interval_secs,
            bind_addr,
        })
    }
}

fn require(name: &str) -> Result<String> {
    let v = std::env::var(name).unwrap_or_default();
    if v.trim().is_empty() {
        anyhow::bail!("missing required env var {name}");
    }
    Ok(v)
}

// Invalid or out-of-range values fall back to the clamped default.
fn parse_interval(raw: Option<String>) -> u64 {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_INTERVAL_SECS)
        .clamp(MIN_INTERVAL_SECS, MAX_INTERVAL_SECS)
}
