// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! fluxion InfluxDB output CLI
//!
//! Reads event records as JSON lines from stdin and writes them to InfluxDB.
//!
//! # Usage
//!
//! ```bash
//! # Stream records into InfluxDB
//! tail -F events.jsonl | fluxion-influxdb --config out-influxdb.yaml
//!
//! # Smaller batches, flushed at least every 500ms
//! fluxion-influxdb --config out-influxdb.yaml --max-batch-bytes 65536 --flush-interval-ms 500
//!
//! # Check a configuration file
//! fluxion-influxdb validate --config out-influxdb.yaml
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fluxion_influxdb::{EventRecord, InfluxOutput, OutputConfig, OutputPlugin, SizedBuffer, Sizer};
use std::io::BufRead;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// fluxion InfluxDB output
#[derive(Parser, Debug)]
#[command(name = "fluxion-influxdb")]
#[command(about = "Write JSON-line event records to InfluxDB series")]
#[command(version)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Flush once buffered units reach this many bytes
    #[arg(long, default_value_t = 1024 * 1024)]
    max_batch_bytes: usize,

    /// Flush buffered units at least this often (milliseconds)
    #[arg(long, default_value_t = 1000)]
    flush_interval_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate example configuration file
    GenConfig {
        /// Output file path
        #[arg(short, long, default_value = "out-influxdb.yaml")]
        output: PathBuf,
    },

    /// Validate a configuration file
    Validate {
        /// Configuration file path
        #[arg(short, long)]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Some(cmd) = args.command {
        return match cmd {
            Commands::GenConfig { output } => cmd_gen_config(output),
            Commands::Validate { config } => cmd_validate(config),
        };
    }

    let path = args
        .config
        .context("missing --config (or use the gen-config subcommand)")?;
    let config = OutputConfig::from_file(&path)
        .with_context(|| format!("loading {}", path.display()))?;

    let mut output: InfluxOutput = InfluxOutput::new(config)?;
    output.start()?;

    let mut buffer = SizedBuffer::new(
        args.max_batch_bytes,
        Duration::from_millis(args.flush_interval_ms),
    );
    let mut stats = Stats::default();

    for line in std::io::stdin().lock().lines() {
        let line = line.context("reading stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let record = match EventRecord::from_json_line(&line) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Skipping malformed record: {}", e);
                stats.malformed += 1;
                continue;
            }
        };

        let unit = output.encode(&record)?;
        if let Some(batch) = buffer.add(unit) {
            flush(&mut output, batch, &mut stats);
        } else if buffer.should_flush() {
            let batch = buffer.flush();
            flush(&mut output, batch, &mut stats);
        }
    }

    let batch = buffer.flush();
    flush(&mut output, batch, &mut stats);
    output.close();

    tracing::info!(
        written = stats.written,
        dropped = stats.dropped,
        malformed = stats.malformed,
        "input exhausted"
    );
    Ok(())
}

#[derive(Debug, Default)]
struct Stats {
    written: usize,
    dropped: usize,
    malformed: usize,
}

/// Write one batch. Failed batches are dropped; the output stays usable.
fn flush(output: &mut InfluxOutput, batch: Vec<Box<dyn Sizer>>, stats: &mut Stats) {
    if batch.is_empty() {
        return;
    }
    match output.write(&batch) {
        Ok(n) => stats.written += n,
        Err(e) => {
            tracing::error!("Dropping batch of {} units: {}", batch.len(), e);
            stats.dropped += batch.len();
        }
    }
}

fn cmd_gen_config(output: PathBuf) -> Result<()> {
    let config = OutputConfig {
        user: Some("root".into()),
        password: Some("root".into()),
        strip_tag: 1,
        ..OutputConfig::new("localhost:8086", "fluxion")
    };
    std::fs::write(&output, config.to_yaml()?)
        .with_context(|| format!("writing {}", output.display()))?;
    println!("Generated configuration: {}", output.display());
    Ok(())
}

fn cmd_validate(config: PathBuf) -> Result<()> {
    let cfg = OutputConfig::from_file(&config)
        .with_context(|| format!("validating {}", config.display()))?;
    println!("Configuration is valid");
    println!("  Server: {}", cfg.server);
    println!("  Database: {}", cfg.database);
    println!("  Transport: {}", if cfg.use_udp { "udp" } else { "http" });
    println!("  Strip tag: {}", cfg.strip_tag);
    Ok(())
}
