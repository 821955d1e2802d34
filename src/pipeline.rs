//! One isolated analysis pass: reader → parser → summary/detector → reports
//!
//! Each invocation owns all of its state (tallies, failure histories,
//! block map). Processing multiple logs means multiple independent runs;
//! nothing is shared or merged across invocations.

use crate::analyzer_core::{
    AbuseDetector, AnalyzeError, FixedBucketAggregator, SlidingWindowAggregator, TrafficSummary,
    Verdict,
};
use crate::config::{Config, ConfigError};
use crate::parser::LineParser;
use crate::reader::LogReader;
use crate::report::{JsonlAuditWriter, ReportWriter, WriterError};
use std::path::PathBuf;

/// How the busiest-hours report is aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoursStrategy {
    /// Per-point trailing window (overlapping).
    Sliding,
    /// Consecutive fixed-duration buckets.
    Bucketed,
}

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub input: PathBuf,
    pub hosts_output: PathBuf,
    pub resources_output: PathBuf,
    pub hours_output: PathBuf,
    pub blocked_output: PathBuf,
    pub hours_strategy: HoursStrategy,
}

#[derive(Debug)]
pub enum PipelineError {
    Io(std::io::Error),
    Config(ConfigError),
    Analyze(AnalyzeError),
    Writer(WriterError),
}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        PipelineError::Io(err)
    }
}

impl From<ConfigError> for PipelineError {
    fn from(err: ConfigError) -> Self {
        PipelineError::Config(err)
    }
}

impl From<AnalyzeError> for PipelineError {
    fn from(err: AnalyzeError) -> Self {
        PipelineError::Analyze(err)
    }
}

impl From<WriterError> for PipelineError {
    fn from(err: WriterError) -> Self {
        PipelineError::Writer(err)
    }
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::Io(e) => write!(f, "IO error: {}", e),
            PipelineError::Config(e) => write!(f, "{}", e),
            PipelineError::Analyze(e) => write!(f, "Analysis error: {}", e),
            PipelineError::Writer(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for PipelineError {}

/// Counters reported after a completed pass.
#[derive(Debug, Default)]
pub struct RunStats {
    pub records: u64,
    pub skipped_lines: u64,
    pub distinct_timestamps: usize,
    pub suppressed: u64,
    pub blocked_hosts: Vec<String>,
}

/// Run one full analysis pass over the input log.
pub fn run(options: &PipelineOptions, config: &Config) -> Result<RunStats, PipelineError> {
    // Construct every stage up front so configuration problems surface
    // before any input is read.
    let window = SlidingWindowAggregator::new(config.window_threshold_secs)?;
    let bucketer = FixedBucketAggregator::new(config.bucket_duration_secs)?;
    let mut detector = AbuseDetector::new(
        &config.watched_resource,
        config.block_duration_secs,
        config.failure_window_secs,
        config.failure_threshold,
    )?;
    let mut audit = match &config.audit_jsonl {
        Some(path) => Some(JsonlAuditWriter::create(path)?),
        None => None,
    };

    let mut reader = LogReader::open(&options.input)?;
    let parser = LineParser::new();
    let mut summary = TrafficSummary::new();
    let mut suppressed_lines: Vec<String> = Vec::new();
    let mut stats = RunStats::default();

    while let Some(line) = reader.read_line()? {
        if line.is_empty() {
            continue;
        }
        let record = match parser.parse_line(&line) {
            Ok(record) => record,
            Err(e) => {
                log::warn!("Skipping line: {}", e);
                stats.skipped_lines += 1;
                continue;
            }
        };

        summary.add(&record);
        if detector.observe(&record) == Verdict::Suppressed {
            if let Some(audit) = audit.as_mut() {
                audit.write(&record)?;
            }
            suppressed_lines.push(line);
        }
        stats.records += 1;
    }

    let points = summary.window_points();
    stats.distinct_timestamps = points.len();

    let periods: Vec<(i64, u64)> = match options.hours_strategy {
        HoursStrategy::Sliding => window
            .totals(&points)?
            .into_iter()
            .map(|t| (t.timestamp, t.total_count))
            .collect(),
        HoursStrategy::Bucketed => bucketer
            .buckets(summary.timestamps())?
            .into_iter()
            .map(|b| (b.start, b.count))
            .collect(),
    };

    let writer = ReportWriter::new(config.top_n, &config.time_format);
    writer.write_top_hosts(&options.hosts_output, summary.host_hits())?;
    writer.write_top_resources(&options.resources_output, summary.resource_bytes())?;
    writer.write_top_hours(&options.hours_output, &periods)?;
    writer.write_suppressed_lines(&options.blocked_output, &suppressed_lines)?;
    if let Some(audit) = audit.as_mut() {
        audit.flush()?;
    }

    stats.suppressed = detector.suppressed_count();
    stats.blocked_hosts = detector
        .blocked_hosts()
        .into_iter()
        .map(String::from)
        .collect();

    log::info!(
        "✅ Processed {} records ({} skipped), {} distinct timestamps",
        stats.records,
        stats.skipped_lines,
        stats.distinct_timestamps
    );
    if !stats.blocked_hosts.is_empty() {
        log::info!(
            "🚫 {} host(s) still blocked at end of input",
            stats.blocked_hosts.len()
        );
    }

    Ok(stats)
}
