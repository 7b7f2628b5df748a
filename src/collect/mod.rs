// src/collect/mod.rs
pub mod providers;
pub mod types;

use crate::collect::types::{Item, SourceCollector};
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("collect_items_total", "Total items parsed from feeds.");
        describe_counter!(
            "collect_empty_dropped_total",
            "Items dropped because their text normalized to empty."
        );
        describe_counter!(
            "collect_feed_errors_total",
            "Feed fetch/parse errors (feed skipped for the cycle)."
        );
    });
}

/// Normalize text: decode HTML entities, strip tags, collapse whitespace.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    // 3) Normalize “ ” ‘ ’ « » to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();
    out = out.trim().to_string();

    // 5) Length cap: 1500 chars
    if out.chars().count() > 1500 {
        out = out.chars().take(1500).collect();
    }

    out
}

/// Short stable hash for items without a natural id. Hex, 12 chars.
pub fn content_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/// Fetch from every collector once. A failing feed contributes zero items
/// for this cycle; the error is logged and counted, never propagated.
pub async fn run_collectors(collectors: &[Box<dyn SourceCollector>]) -> Vec<Item> {
    ensure_metrics_described();

    let mut raw = Vec::new();
    for c in collectors {
        match c.collect().await {
            Ok(mut v) => raw.append(&mut v),
            Err(e) => {
                tracing::warn!(error = ?e, feed = c.name(), "feed error, skipping for this cycle");
                counter!("collect_feed_errors_total").increment(1);
            }
        }
    }

    let mut kept = Vec::with_capacity(raw.len());
    let mut empty_dropped = 0usize;
    for mut item in raw {
        item.text = normalize_text(&item.text);
        if item.text.is_empty() {
            empty_dropped += 1;
            continue;
        }
        kept.push(item);
    }

    counter!("collect_items_total").increment(kept.len() as u64);
    counter!("collect_empty_dropped_total").increment(empty_dropped as u64);

    kept
}
