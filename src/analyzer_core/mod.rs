//! Analyzer Core - Streaming Access-Log Aggregation Engine
//!
//! This module provides the single-pass algorithms that turn an ordered
//! access-log record stream into activity aggregates and abuse-suppression
//! decisions.
//!
//! # Architecture
//!
//! ```text
//! Access log → LogReader → LineParser
//!     ↓
//! TrafficSummary (host hits, resource bytes, timestamp sequences)
//!     ↓                              ↓
//! SlidingWindowAggregator     FixedBucketAggregator
//! (per-point trailing window) (non-overlapping buckets)
//!     ↓
//! AbuseDetector (per-host failure history + block state)
//!     ↓
//! ReportWriter → text reports / JSONL audit
//! ```
//!
//! Every consumer relies on the input stream being non-decreasing in
//! timestamp; the aggregators check the invariant and fail loudly rather
//! than produce wrong totals.

pub mod abuse;
pub mod buckets;
pub mod summary;
pub mod window;

pub use abuse::{AbuseDetector, Verdict};
pub use buckets::{Bucket, FixedBucketAggregator};
pub use summary::TrafficSummary;
pub use window::{collapse_timestamps, SlidingWindowAggregator, WindowPoint, WindowTotal};

#[derive(Debug, PartialEq, Eq)]
pub enum AnalyzeError {
    /// Fixed-bucket aggregation has no defined first bucket on empty input.
    EmptyInput,
    /// The input sequence was not non-decreasing in timestamp.
    OrderingViolation {
        index: usize,
        previous: i64,
        current: i64,
    },
}

impl std::fmt::Display for AnalyzeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalyzeError::EmptyInput => {
                write!(f, "cannot aggregate an empty timestamp sequence")
            }
            AnalyzeError::OrderingViolation {
                index,
                previous,
                current,
            } => write!(
                f,
                "timestamp order violated at index {}: {} follows {}",
                index, current, previous
            ),
        }
    }
}

impl std::error::Error for AnalyzeError {}

/// Reject sequences that break the non-decreasing invariant.
pub(crate) fn check_ordering(timestamps: impl Iterator<Item = i64>) -> Result<(), AnalyzeError> {
    let mut previous: Option<i64> = None;
    for (index, current) in timestamps.enumerate() {
        if let Some(prev) = previous {
            if current < prev {
                return Err(AnalyzeError::OrderingViolation {
                    index,
                    previous: prev,
                    current,
                });
            }
        }
        previous = Some(current);
    }
    Ok(())
}
