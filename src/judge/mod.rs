// src/judge/mod.rs
//! LLM judge seam: verdict schema, provider trait, strict response parsing.
//!
//! The judge is consulted only for top-tier items. Its reply must be a JSON
//! object matching [`Verdict`]; anything else is treated as a not-relevant
//! verdict rather than guessed at from prose.

pub mod openai;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Structured verdict returned by the judge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Verdict {
    pub relevant: bool,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub risk: String,
    #[serde(default)]
    pub rationale: String,
}

impl Verdict {
    /// Fallback verdict for schema mismatches: never forwarded.
    pub fn not_relevant(rationale: impl Into<String>) -> Self {
        Self {
            relevant: false,
            action: String::new(),
            risk: String::new(),
            rationale: rationale.into(),
        }
    }
}

#[async_trait::async_trait]
pub trait Judge: Send + Sync {
    /// Judge one item's text. Transport failures surface as `Err`; the
    /// caller treats those as DROP for the cycle.
    async fn judge(&self, text: &str) -> Result<Verdict>;
    fn name(&self) -> &'static str;
}

/// Parse the model reply against the strict verdict schema.
/// Code fences are tolerated; any other deviation yields `None`.
pub fn parse_verdict(content: &str) -> Option<Verdict> {
    let trimmed = strip_code_fence(content.trim());
    serde_json::from_str::<Verdict>(trimmed).ok()
}

fn strip_code_fence(s: &str) -> &str {
    let s = s
        .strip_prefix("```json")
        .or_else(|| s.strip_prefix("```"))
        .unwrap_or(s);
    s.strip_suffix("```").unwrap_or(s).trim()
}

/// Deterministic judge for tests and local runs.
#[derive(Clone)]
pub struct MockJudge {
    pub fixed: Verdict,
}

#[async_trait::async_trait]
impl Judge for MockJudge {
    async fn judge(&self, _text: &str) -> Result<Verdict> {
        Ok(self.fixed.clone())
    }
    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_exact_schema() {
        let v = parse_verdict(
            r#"{"relevant": true, "action": "watch US30", "risk": "medium", "rationale": "rate shock"}"#,
        )
        .expect("valid verdict");
        assert!(v.relevant);
        assert_eq!(v.action, "watch US30");
    }

    #[test]
    fn parse_tolerates_code_fences() {
        let v = parse_verdict("```json\n{\"relevant\": false}\n```").expect("fenced verdict");
        assert!(!v.relevant);
        assert_eq!(v.action, "");
    }

    #[test]
    fn parse_rejects_prose() {
        assert!(parse_verdict("Yes, this seems relevant. Score: 7/10.").is_none());
        assert!(parse_verdict("").is_none());
        assert!(parse_verdict("{\"relevant\": \"maybe\"}").is_none());
    }
}
