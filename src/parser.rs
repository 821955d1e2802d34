//! Access-log line parsing: regex field extraction and fixed-width timestamp decoding

use crate::record::Record;
use chrono::NaiveDateTime;
use regex::Regex;

/// "01/Jul/1995:00:00:01". The zone suffix is a formatting detail and is
/// not part of the decoded instant.
const TIMESTAMP_WIDTH: usize = 20;
const TIMESTAMP_FORMAT: &str = "%d/%b/%Y:%H:%M:%S";

#[derive(Debug)]
pub enum ParseError {
    /// The line did not match the access-log shape.
    Malformed(String),
    /// The bracketed timestamp field did not decode.
    Timestamp(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Malformed(line) => write!(f, "unrecognized log line: {}", line),
            ParseError::Timestamp(raw) => write!(f, "invalid timestamp field: {}", raw),
        }
    }
}

impl std::error::Error for ParseError {}

pub struct LineParser {
    pattern: Regex,
}

impl LineParser {
    pub fn new() -> Self {
        // Host, [timestamp], quoted request (straight or curly quotes),
        // status, byte count ("-" when the server logged no size).
        let pattern = Regex::new(r#"(\S+).*?\[(.*?)\]\s+["“”](.*?)["“”]\s+(\d{3})\s+(\S+)"#)
            .expect("log line pattern is valid");
        Self { pattern }
    }

    pub fn parse_line(&self, line: &str) -> Result<Record, ParseError> {
        let caps = self
            .pattern
            .captures(line)
            .ok_or_else(|| ParseError::Malformed(line.to_string()))?;

        let timestamp = parse_timestamp(&caps[2])?;
        // Unparseable byte fields are zero, never an error.
        let bytes = caps[5].parse::<u64>().unwrap_or(0);

        Ok(Record {
            host: caps[1].to_string(),
            timestamp,
            resource: caps[3].to_string(),
            status: caps[4].parse::<u16>().ok(),
            bytes,
        })
    }
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode the fixed-width prefix of a timestamp field like
/// "01/Jul/1995:00:00:01 -0400" into epoch seconds.
pub fn parse_timestamp(raw: &str) -> Result<i64, ParseError> {
    let stamp = raw
        .get(..TIMESTAMP_WIDTH)
        .ok_or_else(|| ParseError::Timestamp(raw.to_string()))?;
    let parsed = NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT)
        .map_err(|_| ParseError::Timestamp(raw.to_string()))?;
    Ok(parsed.and_utc().timestamp())
}
