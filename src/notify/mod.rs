// src/notify/mod.rs
pub mod telegram;

use anyhow::Result;

use crate::collect::types::Item;
use crate::judge::Verdict;

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one formatted message. Failures are logged and the message
    /// dropped by the caller; there is no retry.
    async fn send(&self, message: &str) -> Result<()>;
    fn name(&self) -> &'static str;
}

/// Message for a mid-tier item forwarded without a judge call.
pub fn format_raw(item: &Item, score: f32, matched: &[String]) -> String {
    format!(
        "Market item ({:?}):\n{}\n\nscore {}, categories: {}",
        item.source,
        item.text,
        format_score(score),
        if matched.is_empty() {
            "-".to_string()
        } else {
            matched.join(", ")
        }
    )
}

/// Message for a top-tier item the judge confirmed as relevant.
pub fn format_escalated(item: &Item, score: f32, verdict: &Verdict) -> String {
    format!(
        "Market alert ({:?}):\n{}\n\nscore {}\naction: {}\nrisk: {}\nrationale: {}",
        item.source,
        item.text,
        format_score(score),
        non_empty(&verdict.action),
        non_empty(&verdict.risk),
        non_empty(&verdict.rationale),
    )
}

fn non_empty(s: &str) -> &str {
    if s.is_empty() {
        "-"
    } else {
        s
    }
}

// "score 5" rather than "score 5.0" for whole numbers.
fn format_score(score: f32) -> String {
    if score.fract() == 0.0 {
        format!("{}", score as i64)
    } else {
        format!("{score:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect::types::SourceKind;

    fn item(text: &str) -> Item {
        Item {
            id: "x".into(),
            text: text.into(),
            source: SourceKind::News,
        }
    }

    #[test]
    fn raw_message_contains_text_score_and_categories() {
        let msg = format_raw(
            &item("Fed raises interest rates"),
            5.0,
            &["macro".to_string()],
        );
        assert!(msg.contains("Fed raises interest rates"));
        assert!(msg.contains("score 5"));
        assert!(!msg.contains("score 5.0"));
        assert!(msg.contains("categories: macro"));
    }

    #[test]
    fn escalated_message_embeds_verdict() {
        let v = Verdict {
            relevant: true,
            action: "short US30".into(),
            risk: "high".into(),
            rationale: "surprise hike".into(),
        };
        let msg = format_escalated(&item("Emergency rate hike"), 9.5, &v);
        assert!(msg.contains("Emergency rate hike"));
        assert!(msg.contains("score 9.50"));
        assert!(msg.contains("action: short US30"));
        assert!(msg.contains("risk: high"));
        assert!(msg.contains("rationale: surprise hike"));
    }
}
