//! Per-host abuse detection: failure history eviction and block windows

use crate::config::ConfigError;
use crate::record::Record;
use std::collections::{HashMap, VecDeque};

/// Classification of one record against the current block state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Suppressed,
}

/// Stateful classifier over an ordered record stream.
///
/// Per host the detector keeps a queue of recent failure timestamps
/// against the watched resource (oldest first, evicted once they fall
/// out of the failure window) and, once the queue reaches the failure
/// threshold, a block anchored at the triggering timestamp. Every record
/// from a blocked host is suppressed until the block expires, whatever
/// resource it asks for. The detector never drops or rewrites the
/// primary stream; suppression is a classification the caller acts on.
pub struct AbuseDetector {
    watched_resource: String,
    block_secs: i64,
    failure_window_secs: i64,
    failure_threshold: usize,
    /// Recent failure timestamps per host, oldest first.
    failures: HashMap<String, VecDeque<i64>>,
    /// Block anchor timestamp per host.
    blocked: HashMap<String, i64>,
    suppressed_count: u64,
}

impl AbuseDetector {
    pub fn new(
        watched_resource: impl Into<String>,
        block_secs: i64,
        failure_window_secs: i64,
        failure_threshold: usize,
    ) -> Result<Self, ConfigError> {
        let watched_resource = watched_resource.into();
        if watched_resource.is_empty() {
            return Err(ConfigError::InvalidValue(
                "watched resource cannot be empty".to_string(),
            ));
        }
        if block_secs <= 0 || failure_window_secs <= 0 {
            return Err(ConfigError::InvalidValue(format!(
                "block duration and failure window must be positive, got {}s / {}s",
                block_secs, failure_window_secs
            )));
        }
        if failure_threshold == 0 {
            return Err(ConfigError::InvalidValue(
                "failure threshold must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            watched_resource,
            block_secs,
            failure_window_secs,
            failure_threshold,
            failures: HashMap::new(),
            blocked: HashMap::new(),
            suppressed_count: 0,
        })
    }

    /// Classify one record, updating failure and block state.
    pub fn observe(&mut self, record: &Record) -> Verdict {
        if let Some(&anchor) = self.blocked.get(&record.host) {
            if record.timestamp - anchor <= self.block_secs {
                // Still inside the block window. Failure history is not
                // touched while blocked.
                self.suppressed_count += 1;
                return Verdict::Suppressed;
            }
            self.blocked.remove(&record.host);
        }

        if record.resource.contains(&self.watched_resource) {
            if record.is_success() {
                // One success forgives all pending failures.
                self.failures.remove(&record.host);
            } else {
                let history = self.failures.entry(record.host.clone()).or_default();
                while let Some(&oldest) = history.front() {
                    if record.timestamp - oldest > self.failure_window_secs {
                        history.pop_front();
                    } else {
                        break;
                    }
                }
                history.push_back(record.timestamp);
                if history.len() >= self.failure_threshold {
                    self.blocked.insert(record.host.clone(), record.timestamp);
                }
            }
        }

        Verdict::Pass
    }

    /// Total records suppressed so far.
    pub fn suppressed_count(&self) -> u64 {
        self.suppressed_count
    }

    /// Hosts whose block was still active when the stream ended, sorted
    /// for stable output.
    pub fn blocked_hosts(&self) -> Vec<&str> {
        let mut hosts: Vec<&str> = self.blocked.keys().map(String::as_str).collect();
        hosts.sort_unstable();
        hosts
    }

    /// Pending (not yet block-triggering) failure count for a host.
    pub fn pending_failures(&self, host: &str) -> usize {
        self.failures.get(host).map_or(0, VecDeque::len)
    }
}
