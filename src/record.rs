//! Structured access-log record shared by the aggregation and abuse passes

use serde::{Deserialize, Serialize};

/// One parsed log line.
///
/// `resource` keeps the full request field ("GET /login HTTP/1.0"): the
/// abuse detector matches against the whole field, while the resource
/// report extracts the bare path token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub host: String,
    /// Epoch seconds. The input stream is non-decreasing in this field.
    pub timestamp: i64,
    pub resource: String,
    pub status: Option<u16>,
    /// Response size. An unparseable byte field counts as zero.
    pub bytes: u64,
}

impl Record {
    pub fn is_success(&self) -> bool {
        self.status == Some(200)
    }
}

/// Bare path token of a request field, e.g. "/login" from
/// "GET /login HTTP/1.0". Falls back to the whole field when the request
/// is not method-qualified.
pub fn resource_path(resource: &str) -> &str {
    resource.split_whitespace().nth(1).unwrap_or(resource)
}
