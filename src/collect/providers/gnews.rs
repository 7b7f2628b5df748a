// src/collect/providers/gnews.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::collect::types::{Item, SourceCollector, SourceKind};

const GNEWS_TOP_HEADLINES: &str = "https://gnews.io/api/v4/top-headlines";

#[derive(Debug, Deserialize)]
struct GnewsResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    title: Option<String>,
    content: Option<String>,
    url: Option<String>,
}

/// Top-headlines feed from the GNews JSON API.
pub struct GnewsCollector {
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http {
        url: String,
        api_key: String,
        client: reqwest::Client,
    },
}

impl GnewsCollector {
    pub fn from_api_key(api_key: String) -> Result<Self> {
        Self::from_url(GNEWS_TOP_HEADLINES.to_string(), api_key)
    }

    /// Custom base URL, used by tests to point at a local stub.
    pub fn from_url(url: String, api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(15))
            .build()
            .context("building gnews http client")?;
        Ok(Self {
            mode: Mode::Http {
                url,
                api_key,
                client,
            },
        })
    }

    pub fn from_fixture(body: &str) -> Self {
        Self {
            mode: Mode::Fixture(body.to_string()),
        }
    }

    fn parse_items_from_str(s: &str) -> Result<Vec<Item>> {
        let resp: GnewsResponse = serde_json::from_str(s).context("parsing gnews json")?;

        let mut out = Vec::with_capacity(resp.articles.len());
        for a in resp.articles {
            let text = format!(
                "{} {}",
                a.title.as_deref().unwrap_or_default(),
                a.content.as_deref().unwrap_or_default()
            );
            // Article URL is the natural dedup key; hash the text if absent.
            let id = a
                .url
                .unwrap_or_else(|| crate::collect::content_hash(&text));
            out.push(Item {
                id,
                text,
                source: SourceKind::News,
            });
        }
        Ok(out)
    }
}

#[async_trait]
impl SourceCollector for GnewsCollector {
    async fn collect(&self) -> Result<Vec<Item>> {
        match &self.mode {
            Mode::Fixture(s) => Self::parse_items_from_str(s),
            Mode::Http {
                url,
                api_key,
                client,
            } => {
                let body = client
                    .get(url)
                    .query(&[("token", api_key.as_str()), ("lang", "en")])
                    .send()
                    .await
                    .context("gnews http get()")?
                    .error_for_status()
                    .context("gnews non-2xx")?
                    .text()
                    .await
                    .context("gnews http .text()")?;
                Self::parse_items_from_str(&body)
            }
        }
    }

    fn name(&self) -> &'static str {
        "gnews"
    }
}
