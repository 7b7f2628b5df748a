// src/collect/types.rs
use anyhow::Result;

/// Where an item came from. Informational only; scoring ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    News,
    Social,
}

/// One unit of candidate text, created fresh each collection cycle.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct Item {
    /// Stable dedup key: source URL, post id, or a content hash when the
    /// feed provides neither.
    pub id: String,
    /// Normalized title+body (news) or post text (social).
    pub text: String,
    pub source: SourceKind,
}

#[async_trait::async_trait]
pub trait SourceCollector: Send + Sync {
    async fn collect(&self) -> Result<Vec<Item>>;
    fn name(&self) -> &'static str;
}
