//! Report writers: ranked text outputs and the JSONL suppression audit

use crate::record::{resource_path, Record};
use chrono::DateTime;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug)]
pub enum WriterError {
    Io(std::io::Error),
    Serialization(serde_json::Error),
}

impl From<std::io::Error> for WriterError {
    fn from(err: std::io::Error) -> Self {
        WriterError::Io(err)
    }
}

impl From<serde_json::Error> for WriterError {
    fn from(err: serde_json::Error) -> Self {
        WriterError::Serialization(err)
    }
}

impl std::fmt::Display for WriterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WriterError::Io(e) => write!(f, "IO error: {}", e),
            WriterError::Serialization(e) => write!(f, "Serialization error: {}", e),
        }
    }
}

impl std::error::Error for WriterError {}

/// Top `n` entries by count, descending. Ties break on key so output is
/// stable across runs.
pub fn top_n<'a>(counts: &'a HashMap<String, u64>, n: usize) -> Vec<(&'a str, u64)> {
    let mut entries: Vec<(&str, u64)> = counts.iter().map(|(k, &v)| (k.as_str(), v)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    entries.truncate(n);
    entries
}

/// Render an epoch-seconds instant with the configured format string.
pub fn format_timestamp(epoch: i64, format: &str) -> String {
    DateTime::from_timestamp(epoch, 0)
        .map(|dt| dt.naive_utc().format(format).to_string())
        .unwrap_or_else(|| epoch.to_string())
}

fn write_lines<I, S>(path: &Path, lines: I) -> Result<(), WriterError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    for line in lines {
        writeln!(writer, "{}", line.as_ref())?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the ranked text reports. Output shape is one entry per line,
/// highest count first.
pub struct ReportWriter {
    top_n: usize,
    time_format: String,
}

impl ReportWriter {
    pub fn new(top_n: usize, time_format: impl Into<String>) -> Self {
        Self {
            top_n,
            time_format: time_format.into(),
        }
    }

    /// `host,count` for the busiest hosts.
    pub fn write_top_hosts(
        &self,
        path: &Path,
        host_hits: &HashMap<String, u64>,
    ) -> Result<(), WriterError> {
        let lines: Vec<String> = top_n(host_hits, self.top_n)
            .into_iter()
            .map(|(host, count)| format!("{},{}", host, count))
            .collect();
        write_lines(path, &lines)?;
        log::info!("📝 Wrote top-hosts report: {}", path.display());
        Ok(())
    }

    /// Bare path tokens of the resources that served the most bytes.
    pub fn write_top_resources(
        &self,
        path: &Path,
        resource_bytes: &HashMap<String, u64>,
    ) -> Result<(), WriterError> {
        let lines: Vec<&str> = top_n(resource_bytes, self.top_n)
            .into_iter()
            .map(|(resource, _)| resource_path(resource))
            .collect();
        write_lines(path, &lines)?;
        log::info!("📝 Wrote top-resources report: {}", path.display());
        Ok(())
    }

    /// `formatted_timestamp,count` for the busiest periods, from either
    /// sliding-window totals or fixed buckets.
    pub fn write_top_hours(&self, path: &Path, periods: &[(i64, u64)]) -> Result<(), WriterError> {
        let mut ranked: Vec<(i64, u64)> = periods.to_vec();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(self.top_n);

        let lines: Vec<String> = ranked
            .into_iter()
            .map(|(timestamp, count)| {
                format!("{},{}", format_timestamp(timestamp, &self.time_format), count)
            })
            .collect();
        write_lines(path, &lines)?;
        log::info!("📝 Wrote busiest-hours report: {}", path.display());
        Ok(())
    }

    /// Raw suppressed source lines, in suppression order. Not ranked.
    pub fn write_suppressed_lines(&self, path: &Path, lines: &[String]) -> Result<(), WriterError> {
        write_lines(path, lines)?;
        log::info!(
            "📝 Wrote suppressed-request log ({} lines): {}",
            lines.len(),
            path.display()
        );
        Ok(())
    }
}

/// JSONL audit stream of suppressed records.
pub struct JsonlAuditWriter {
    writer: BufWriter<File>,
}

impl JsonlAuditWriter {
    pub fn create(path: &Path) -> Result<Self, WriterError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        log::info!("📝 Writing suppression audit to: {}", path.display());
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    pub fn write(&mut self, record: &Record) -> Result<(), WriterError> {
        let json = serde_json::to_string(record)?;
        writeln!(self.writer, "{}", json)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), WriterError> {
        self.writer.flush()?;
        Ok(())
    }
}

impl Drop for JsonlAuditWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(entries: &[(&str, u64)]) -> HashMap<String, u64> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect()
    }

    #[test]
    fn test_top_n_orders_by_count_then_key() {
        let map = counts(&[("b.example", 5), ("a.example", 5), ("c.example", 9)]);

        let ranked = top_n(&map, 10);
        assert_eq!(
            ranked,
            vec![("c.example", 9), ("a.example", 5), ("b.example", 5)]
        );
    }

    #[test]
    fn test_top_n_truncates() {
        let map = counts(&[("a", 1), ("b", 2), ("c", 3)]);
        assert_eq!(top_n(&map, 2), vec![("c", 3), ("b", 2)]);
    }

    #[test]
    fn test_format_timestamp_round_trips_log_format() {
        let epoch = crate::parser::parse_timestamp("01/Jul/1995:00:00:01 -0400").unwrap();
        assert_eq!(
            format_timestamp(epoch, "%d/%b/%Y:%H:%M:%S -0400"),
            "01/Jul/1995:00:00:01 -0400"
        );
    }

    #[test]
    fn test_host_report_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hosts.txt");
        let writer = ReportWriter::new(10, "%d/%b/%Y:%H:%M:%S -0400");

        let map = counts(&[("a.example", 3), ("b.example", 7)]);
        writer.write_top_hosts(&path, &map).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "b.example,7\na.example,3\n");
    }

    #[test]
    fn test_resource_report_emits_path_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resources.txt");
        let writer = ReportWriter::new(10, "%d/%b/%Y:%H:%M:%S -0400");

        let map = counts(&[("GET /images/patch.gif HTTP/1.0", 4000)]);
        writer.write_top_resources(&path, &map).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "/images/patch.gif\n");
    }

    #[test]
    fn test_jsonl_audit_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");

        let record = Record {
            host: "10.0.0.1".to_string(),
            timestamp: 100,
            resource: "POST /login HTTP/1.0".to_string(),
            status: Some(401),
            bytes: 0,
        };

        let mut audit = JsonlAuditWriter::create(&path).unwrap();
        audit.write(&record).unwrap();
        audit.flush().unwrap();
        drop(audit);

        let written = std::fs::read_to_string(&path).unwrap();
        let parsed: Record = serde_json::from_str(written.trim()).unwrap();
        assert_eq!(parsed.host, "10.0.0.1");
        assert_eq!(parsed.status, Some(401));
    }
}
