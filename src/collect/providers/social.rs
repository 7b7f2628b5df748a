// src/collect/providers/social.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::collect::types::{Item, SourceCollector, SourceKind};

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    posts: Vec<Post>,
}

#[derive(Debug, Deserialize)]
struct Post {
    id: Option<String>,
    text: Option<String>,
}

/// Keyword-search feed against a social-media search endpoint returning
/// `{"posts": [{"id", "text"}]}`.
pub struct SocialSearchCollector {
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http {
        url: String,
        query: String,
        client: reqwest::Client,
    },
}

impl SocialSearchCollector {
    pub fn from_url(url: String, query: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(15))
            .build()
            .context("building social search http client")?;
        Ok(Self {
            mode: Mode::Http { url, query, client },
        })
    }

    pub fn from_fixture(body: &str) -> Self {
        Self {
            mode: Mode::Fixture(body.to_string()),
        }
    }

    fn parse_items_from_str(s: &str) -> Result<Vec<Item>> {
        let resp: SearchResponse = serde_json::from_str(s).context("parsing social json")?;

        let mut out = Vec::with_capacity(resp.posts.len());
        for p in resp.posts {
            let text = p.text.unwrap_or_default();
            let id = p
                .id
                .unwrap_or_else(|| crate::collect::content_hash(&text));
            out.push(Item {
                id,
                text,
                source: SourceKind::Social,
            });
        }
        Ok(out)
    }
}

#[async_trait]
impl SourceCollector for SocialSearchCollector {
    async fn collect(&self) -> Result<Vec<Item>> {
        match &self.mode {
            Mode::Fixture(s) => Self::parse_items_from_str(s),
            Mode::Http { url, query, client } => {
                let body = client
                    .get(url)
                    .query(&[("q", query.as_str())])
                    .send()
                    .await
                    .context("social http get()")?
                    .error_for_status()
                    .context("social non-2xx")?
                    .text()
                    .await
                    .context("social http .text()")?;
                Self::parse_items_from_str(&body)
            }
        }
    }

    fn name(&self) -> &'static str {
        "social-search"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_constructor_reports_client_build_outcome() {
        let c = SocialSearchCollector::from_url("https://example.test/search".into(), "fed".into())
            .expect("client with timeouts");
        assert!(matches!(c.mode, Mode::Http { .. }));
    }

    #[tokio::test]
    async fn fixture_parse_uses_post_id_or_hash() {
        let c = SocialSearchCollector::from_fixture(
            r#"{"posts": [{"id": "p1", "text": "Dow futures up"}, {"text": "anonymous post"}]}"#,
        );
        let items = c.collect().await.expect("parse fixture");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "p1");
        assert_eq!(items[0].source, SourceKind::Social);
        assert_eq!(items[1].id, crate::collect::content_hash("anonymous post"));
    }
}
