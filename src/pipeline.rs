// src/pipeline.rs
//! # Relevance filter pipeline
//! Per-item flow: dedup check-and-set → keyword score → tier → act.
//! Owns all decision state explicitly (seen-store, scorer, thresholds) and
//! treats collaborators (collectors, judge, notifier) as trait objects.
//!
//! Failure discipline: nothing that happens to one item may abort the batch
//! or crash the process. Judge and notifier errors are logged, counted, and
//! the item is dropped for this cycle.

use std::sync::Arc;

use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::collect::types::{Item, SourceCollector};
use crate::collect::run_collectors;
use crate::dedup::SeenStore;
use crate::judge::Judge;
use crate::notify::{format_escalated, format_raw, Notifier};
use crate::scoring::{KeywordScorer, Tier};

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("sentinel_items_total", "Items entering the filter.");
        describe_counter!("sentinel_duplicates_total", "Items dropped as duplicates.");
        describe_counter!("sentinel_sent_total", "Messages handed to the notifier.");
        describe_counter!("sentinel_escalated_total", "Items sent to the LLM judge.");
        describe_counter!("sentinel_judge_failures_total", "Judge calls that failed.");
        describe_counter!(
            "sentinel_notify_failures_total",
            "Notifier sends that failed (message dropped)."
        );
    });
}

/// Counters for one cycle, returned to manual-trigger callers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct CycleReport {
    pub collected: usize,
    pub fresh: usize,
    pub sent: usize,
    pub escalated: usize,
    pub judge_failures: usize,
    pub notify_failures: usize,
}

impl CycleReport {
    pub fn summary(&self) -> String {
        format!(
            "{} collected, {} fresh, {} escalated, {} sent",
            self.collected, self.fresh, self.escalated, self.sent
        )
    }
}

pub struct FilterPipeline {
    collectors: Vec<Box<dyn SourceCollector>>,
    seen: SeenStore,
    scorer: KeywordScorer,
    judge: Arc<dyn Judge>,
    notifier: Arc<dyn Notifier>,
}

impl FilterPipeline {
    pub fn new(
        collectors: Vec<Box<dyn SourceCollector>>,
        seen: SeenStore,
        scorer: KeywordScorer,
        judge: Arc<dyn Judge>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        ensure_metrics_described();
        Self {
            collectors,
            seen,
            scorer,
            judge,
            notifier,
        }
    }

    /// One full cycle: collect from every feed, then filter the batch.
    pub async fn run_cycle(&self) -> CycleReport {
        let items = run_collectors(&self.collectors).await;
        self.process_batch(items).await
    }

    /// Filter a batch of already-collected items. Items are independent;
    /// a failure on one never blocks the rest.
    pub async fn process_batch(&self, items: Vec<Item>) -> CycleReport {
        let mut report = CycleReport {
            collected: items.len(),
            ..Default::default()
        };
        counter!("sentinel_items_total").increment(items.len() as u64);

        for item in items {
            if !self.seen.is_new(&item.id) {
                counter!("sentinel_duplicates_total").increment(1);
                debug!(target: "pipeline", id = %item.id, "duplicate, skipping");
                continue;
            }
            report.fresh += 1;
            self.process_item(&item, &mut report).await;
        }

        info!(target: "pipeline", summary = %report.summary(), "cycle done");
        report
    }

    async fn process_item(&self, item: &Item, report: &mut CycleReport) {
        let breakdown = self.scorer.score(&item.text);
        match self.scorer.classify(breakdown.score) {
            Tier::Drop => {
                debug!(target: "pipeline", id = %item.id, score = breakdown.score, "below low threshold");
            }
            Tier::Raw => {
                let msg = format_raw(item, breakdown.score, &breakdown.matched);
                self.deliver(&msg, report).await;
            }
            Tier::Escalate => {
                report.escalated += 1;
                counter!("sentinel_escalated_total").increment(1);
                match self.judge.judge(&item.text).await {
                    Ok(verdict) if verdict.relevant => {
                        let msg = format_escalated(item, breakdown.score, &verdict);
                        self.deliver(&msg, report).await;
                    }
                    Ok(verdict) => {
                        // Judge declined: swallow silently, regardless of score.
                        debug!(
                            target: "pipeline",
                            id = %item.id,
                            rationale = %verdict.rationale,
                            "judge says not relevant"
                        );
                    }
                    Err(e) => {
                        report.judge_failures += 1;
                        counter!("sentinel_judge_failures_total").increment(1);
                        warn!(target: "pipeline", id = %item.id, error = ?e, "judge failed, dropping item");
                    }
                }
            }
        }
    }

    async fn deliver(&self, message: &str, report: &mut CycleReport) {
        match self.notifier.send(message).await {
            Ok(()) => {
                report.sent += 1;
                counter!("sentinel_sent_total").increment(1);
            }
            Err(e) => {
                report.notify_failures += 1;
                counter!("sentinel_notify_failures_total").increment(1);
                warn!(
                    target: "pipeline",
                    notifier = self.notifier.name(),
                    error = ?e,
                    "notify failed, message dropped"
                );
            }
        }
    }
}
