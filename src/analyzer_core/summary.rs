//! Single-pass traffic tallies: host hits, resource bandwidth, timestamps

use super::window::{collapse_timestamps, WindowPoint};
use crate::record::Record;
use std::collections::HashMap;

/// Accumulates per-host and per-resource tallies plus the ordered
/// timestamp sequence the aggregators consume. One instance per
/// invocation; all state dies with the pass.
#[derive(Debug, Default)]
pub struct TrafficSummary {
    host_hits: HashMap<String, u64>,
    resource_bytes: HashMap<String, u64>,
    timestamps: Vec<i64>,
}

impl TrafficSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, record: &Record) {
        *self.host_hits.entry(record.host.clone()).or_insert(0) += 1;
        *self
            .resource_bytes
            .entry(record.resource.clone())
            .or_insert(0) += record.bytes;
        self.timestamps.push(record.timestamp);
    }

    /// Access count per host.
    pub fn host_hits(&self) -> &HashMap<String, u64> {
        &self.host_hits
    }

    /// Bytes served per resource (request field).
    pub fn resource_bytes(&self) -> &HashMap<String, u64> {
        &self.resource_bytes
    }

    /// Every record's timestamp in arrival order.
    pub fn timestamps(&self) -> &[i64] {
        &self.timestamps
    }

    /// Distinct timestamps with coincident-record counts.
    pub fn window_points(&self) -> Vec<WindowPoint> {
        collapse_timestamps(&self.timestamps)
    }

    pub fn record_count(&self) -> usize {
        self.timestamps.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_record(host: &str, timestamp: i64, resource: &str, bytes: u64) -> Record {
        Record {
            host: host.to_string(),
            timestamp,
            resource: resource.to_string(),
            status: Some(200),
            bytes,
        }
    }

    #[test]
    fn test_host_and_resource_tallies() {
        let mut summary = TrafficSummary::new();
        summary.add(&create_test_record("a.example", 0, "GET /x HTTP/1.0", 100));
        summary.add(&create_test_record("a.example", 1, "GET /y HTTP/1.0", 50));
        summary.add(&create_test_record("b.example", 1, "GET /x HTTP/1.0", 25));

        assert_eq!(summary.host_hits()["a.example"], 2);
        assert_eq!(summary.host_hits()["b.example"], 1);
        // Resources accumulate bytes, not hit counts.
        assert_eq!(summary.resource_bytes()["GET /x HTTP/1.0"], 125);
        assert_eq!(summary.resource_bytes()["GET /y HTTP/1.0"], 50);
        assert_eq!(summary.record_count(), 3);
    }

    #[test]
    fn test_window_points_collapse_coincident_records() {
        let mut summary = TrafficSummary::new();
        for timestamp in [10, 10, 10, 20] {
            summary.add(&create_test_record("a.example", timestamp, "GET / HTTP/1.0", 1));
        }

        assert_eq!(summary.timestamps(), &[10, 10, 10, 20]);
        assert_eq!(
            summary.window_points(),
            vec![
                WindowPoint { timestamp: 10, local_count: 3 },
                WindowPoint { timestamp: 20, local_count: 1 },
            ]
        );
    }
}
