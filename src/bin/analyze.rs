//! Access-Log Analysis Binary
//!
//! Single batch pass over an ordered access log, producing the ranked
//! activity reports and the abuse-suppression log.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release -- access.log hosts.txt resources.txt hours.txt blocked.txt
//! ```
//!
//! ## Environment Variables
//!
//! - WINDOW_THRESHOLD_MINS - Trailing activity window (default: 60)
//! - BUCKET_DURATION_MINS - Fixed bucket duration for --hours bucketed (default: 60)
//! - WATCHED_RESOURCE - Path watched for failed attempts (default: /login)
//! - BLOCK_DURATION_MINS - Suppression window after a block triggers (default: 5)
//! - FAILURE_WINDOW_SECS - Window in which failures accumulate (default: 20)
//! - FAILURE_THRESHOLD - Failures that trigger a block (default: 3)
//! - TIME_FORMAT - Timestamp format for the hours report (default: %d/%b/%Y:%H:%M:%S -0400)
//! - TOP_N - Report ranking depth (default: 10)
//! - AUDIT_JSONL - Optional path for a JSONL audit of suppressed records
//! - RUST_LOG - Logging level (optional, default: info)

use clap::Parser;
use logflow::config::Config;
use logflow::pipeline::{self, HoursStrategy, PipelineOptions};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "logflow",
    about = "Batch access-log analyzer: activity aggregates and abuse suppression"
)]
struct Args {
    /// Path to the access-log input file
    input: PathBuf,
    /// Output path for the top-hosts report
    hosts_output: PathBuf,
    /// Output path for the top-resources report
    resources_output: PathBuf,
    /// Output path for the busiest-hours report
    hours_output: PathBuf,
    /// Output path for the suppressed-request log
    blocked_output: PathBuf,
    /// Busiest-hours aggregation strategy
    #[arg(long, default_value = "sliding", value_parser = ["sliding", "bucketed"])]
    hours: String,
}

fn main() -> ExitCode {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let args = Args::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("❌ {}", e);
            return ExitCode::FAILURE;
        }
    };

    let hours_strategy = match args.hours.as_str() {
        "bucketed" => HoursStrategy::Bucketed,
        _ => HoursStrategy::Sliding,
    };

    log::info!("🚀 Starting logflow");
    log::info!("   Input: {}", args.input.display());
    log::info!("   Hours strategy: {:?}", hours_strategy);
    log::info!("   Window threshold: {}s", config.window_threshold_secs);
    log::info!("   Bucket duration: {}s", config.bucket_duration_secs);
    log::info!(
        "   Watched resource: {} (block {}s, {} failures within {}s)",
        config.watched_resource,
        config.block_duration_secs,
        config.failure_threshold,
        config.failure_window_secs
    );

    let options = PipelineOptions {
        input: args.input,
        hosts_output: args.hosts_output,
        resources_output: args.resources_output,
        hours_output: args.hours_output,
        blocked_output: args.blocked_output,
        hours_strategy,
    };

    match pipeline::run(&options, &config) {
        Ok(stats) => {
            log::info!(
                "✅ Analysis complete: {} records, {} suppressed, {} host(s) blocked",
                stats.records,
                stats.suppressed,
                stats.blocked_hosts.len()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("❌ Analysis failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
