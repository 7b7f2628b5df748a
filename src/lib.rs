// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod collect;
pub mod config;
pub mod dedup;
pub mod judge;
pub mod metrics;
pub mod notify;
pub mod pipeline;
pub mod scheduler;
pub mod scoring;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::collect::types::{Item, SourceCollector, SourceKind};
pub use crate::dedup::SeenStore;
pub use crate::judge::{Judge, Verdict};
pub use crate::notify::Notifier;
pub use crate::pipeline::{CycleReport, FilterPipeline};
pub use crate::scheduler::{RunState, SentinelScheduler};
pub use crate::scoring::{KeywordScorer, Tier};
