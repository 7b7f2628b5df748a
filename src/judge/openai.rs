// src/judge/openai.rs
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{parse_verdict, Judge, Verdict};

const SYSTEM_PROMPT: &str = "You judge whether a news or social-media item can move financial \
markets (indices, FX, commodities, CFDs). Reply with ONLY a JSON object, no prose: \
{\"relevant\": bool, \"action\": \"suggested instrument or action, or empty\", \
\"risk\": \"low|medium|high\", \"rationale\": \"one short sentence\"}";

/// OpenAI-backed judge (Chat Completions API). Requires an API key.
pub struct OpenAiJudge {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenAiJudge {
    /// `model_override`: pass Some("gpt-4o") to override; defaults to gpt-4o-mini.
    pub fn new(api_key: String, model_override: Option<&str>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("market-news-sentinel/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(15))
            .build()
            .context("building judge http client")?;
        Ok(Self {
            http,
            api_key,
            model: model_override.unwrap_or("gpt-4o-mini").to_string(),
        })
    }
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct Req<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct Resp {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMsg,
}

#[derive(Deserialize)]
struct ChoiceMsg {
    content: String,
}

#[async_trait::async_trait]
impl Judge for OpenAiJudge {
    async fn judge(&self, text: &str) -> Result<Verdict> {
        if self.api_key.is_empty() {
            bail!("judge called without OPENAI_API_KEY");
        }

        let req = Req {
            model: &self.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                Msg {
                    role: "user",
                    content: text,
                },
            ],
            temperature: 0.0,
            max_tokens: 200,
        };

        let resp = self
            .http
            .post("https://api.openai.com/v1/chat/completions")
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await
            .context("judge request failed")?
            .error_for_status()
            .context("judge non-2xx")?;

        let body: Resp = resp.json().await.context("judge body not json")?;
        let content = body
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .unwrap_or("");

        // Schema mismatch is not an error: the contract says treat it as
        // not relevant, so the item is silently dropped upstream.
        Ok(parse_verdict(content).unwrap_or_else(|| {
            tracing::warn!(target: "judge", "verdict did not match schema, treating as not relevant");
            Verdict::not_relevant("judge reply did not match verdict schema")
        }))
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}
