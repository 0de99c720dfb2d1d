//! Item catalogue metrics.

use metrics::{counter, histogram};
use std::time::Duration;

/// How a swap attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapOutcome {
    Swapped,
    NotFound,
    NotAvailable,
    /// Item was transferred but the posting call failed
    PostingFailed,
    Error,
}

impl SwapOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwapOutcome::Swapped => "swapped",
            SwapOutcome::NotFound => "not_found",
            SwapOutcome::NotAvailable => "not_available",
            SwapOutcome::PostingFailed => "posting_failed",
            SwapOutcome::Error => "error",
        }
    }
}

pub struct SwapMetrics;

impl SwapMetrics {
    pub fn record_swap(kind: &'static str, outcome: SwapOutcome, elapsed: Duration) {
        counter!("item_swaps_total", "kind" => kind, "outcome" => outcome.as_str()).increment(1);
        histogram!("item_swap_duration_seconds", "kind" => kind).record(elapsed.as_secs_f64());
    }

    pub fn record_upsert(kind: &'static str, created: bool) {
        counter!(
            "item_upserts_total",
            "kind" => kind,
            "created" => if created { "true" } else { "false" }
        )
        .increment(1);
    }
}
