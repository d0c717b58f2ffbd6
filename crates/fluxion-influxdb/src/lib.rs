// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! fluxion InfluxDB output
//!
//! Converts schema-less event records into InfluxDB 0.8 series points and
//! writes them in batches over HTTP or UDP.
//!
//! This crate provides:
//! - Series naming from hierarchical tags with configurable tag stripping
//! - Record to series encoding with size estimates for host-side buffering
//! - All-or-nothing batch writes over a transport fixed at configuration time
//! - YAML configuration with strict key validation
//!
//! # Overview
//!
//! ```text
//! EventRecord --> Encoder --> Series (Sizer) --> host buffer --> BatchWriter --> InfluxClient
//! ```
//!
//! The host owns buffering and retry policy. A failed write reports zero
//! units written and hands the client error back unchanged.
//!
//! # Example
//!
//! ```ignore
//! use fluxion_influxdb::{InfluxOutput, OutputConfig, OutputPlugin};
//!
//! let config = OutputConfig::from_file("out-influxdb.yaml")?;
//! let mut output: InfluxOutput = InfluxOutput::new(config)?;
//! output.start()?;
//!
//! let unit = output.encode(&record)?;
//! let written = output.write(&[unit])?;
//! output.close();
//! ```

pub mod buffer;
pub mod client;
pub mod config;
pub mod encoder;
pub mod error;
pub mod output;
pub mod record;
pub mod series;
pub mod writer;

pub use buffer::SizedBuffer;
pub use client::{InfluxClient, SeriesClient};
pub use config::OutputConfig;
pub use encoder::{Encoder, TimeConversion};
pub use error::{ClientError, ConfigError, OutputError};
pub use output::{InfluxOutput, OutputPlugin};
pub use record::EventRecord;
pub use series::{FieldValue, Series, Sizer};
pub use writer::{BatchWriter, Transport};
