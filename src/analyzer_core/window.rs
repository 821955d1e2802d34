//! Sliding-window activity totals over non-decreasing timestamps

use super::{check_ordering, AnalyzeError};
use crate::config::ConfigError;

/// One distinct timestamp with the number of records sharing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPoint {
    pub timestamp: i64,
    pub local_count: u64,
}

/// Total event count in `[timestamp, timestamp + threshold)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowTotal {
    pub timestamp: i64,
    pub total_count: u64,
}

/// Collapse a timestamp sequence into distinct points, accumulating the
/// count of consecutive duplicates. Single left-to-right pass.
pub fn collapse_timestamps(timestamps: &[i64]) -> Vec<WindowPoint> {
    let mut points: Vec<WindowPoint> = Vec::new();
    for &timestamp in timestamps {
        match points.last_mut() {
            Some(last) if last.timestamp == timestamp => last.local_count += 1,
            _ => points.push(WindowPoint {
                timestamp,
                local_count: 1,
            }),
        }
    }
    points
}

pub struct SlidingWindowAggregator {
    threshold_secs: i64,
}

impl SlidingWindowAggregator {
    pub fn new(threshold_secs: i64) -> Result<Self, ConfigError> {
        if threshold_secs <= 0 {
            return Err(ConfigError::InvalidValue(format!(
                "window threshold must be positive, got {}s",
                threshold_secs
            )));
        }
        Ok(Self { threshold_secs })
    }

    /// For every point, the total count of events whose timestamp lies in
    /// `[point.timestamp, point.timestamp + threshold)`.
    ///
    /// Two-pointer pass, O(N) amortized: `next` only moves forward, so
    /// each point enters the running total exactly once. Valid only for
    /// non-decreasing input, which is checked up front.
    pub fn totals(&self, points: &[WindowPoint]) -> Result<Vec<WindowTotal>, AnalyzeError> {
        check_ordering(points.iter().map(|p| p.timestamp))?;

        let mut totals = Vec::with_capacity(points.len());
        let mut running = 0u64;
        let mut next = 0usize;

        for begin in 0..points.len() {
            while next < points.len()
                && points[next].timestamp - points[begin].timestamp < self.threshold_secs
            {
                running += points[next].local_count;
                next += 1;
            }
            totals.push(WindowTotal {
                timestamp: points[begin].timestamp,
                total_count: running,
            });
            // The begin point falls out of every later window.
            running -= points[begin].local_count;
        }

        Ok(totals)
    }
}
