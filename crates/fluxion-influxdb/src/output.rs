// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Output adapter lifecycle.
//!
//! ```text
//! new(config) --> Configured --start()--> Connected --close()--> Closed
//!                    |                       |
//!                 encode()            encode() / write()
//! ```
//!
//! Hosts drive the adapter through [`OutputPlugin`]; there is no
//! registration step.

use crate::client::{InfluxClient, SeriesClient};
use crate::config::OutputConfig;
use crate::encoder::Encoder;
use crate::error::OutputError;
use crate::record::EventRecord;
use crate::series::Sizer;
use crate::writer::{BatchWriter, Transport};

/// Contract between a pipeline host and an output.
pub trait OutputPlugin {
    /// Output name as shown in host logs.
    fn name(&self) -> &'static str;

    /// Establish the client handle. Must succeed before `write`.
    fn start(&mut self) -> Result<(), OutputError>;

    /// Encode one record into a sizable unit for the host buffer.
    fn encode(&self, record: &EventRecord) -> Result<Box<dyn Sizer>, OutputError>;

    /// Write a batch of previously encoded units, returning the number written.
    fn write(&mut self, units: &[Box<dyn Sizer>]) -> Result<usize, OutputError>;

    /// Release the client handle. Terminal.
    fn close(&mut self);
}

enum State<C> {
    Configured,
    Connected(C),
    Closed,
}

/// InfluxDB output: encoder and batch writer bound to one client handle.
pub struct InfluxOutput<C: SeriesClient = InfluxClient> {
    config: OutputConfig,
    encoder: Encoder,
    writer: BatchWriter,
    state: State<C>,
}

impl<C: SeriesClient> InfluxOutput<C> {
    /// Validate `config` and build an unconnected output.
    pub fn new(config: OutputConfig) -> Result<Self, OutputError> {
        config.validate()?;
        Ok(Self {
            encoder: Encoder::from_config(&config),
            writer: BatchWriter::new(Transport::from_config(&config)),
            config,
            state: State::Configured,
        })
    }

    pub fn transport(&self) -> Transport {
        self.writer.transport()
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.state, State::Connected(_))
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.state, State::Closed)
    }

    /// The connected client, if any.
    pub fn client(&self) -> Option<&C> {
        match &self.state {
            State::Connected(client) => Some(client),
            _ => None,
        }
    }
}

impl<C: SeriesClient> OutputPlugin for InfluxOutput<C> {
    fn name(&self) -> &'static str {
        "out-influxdb"
    }

    fn start(&mut self) -> Result<(), OutputError> {
        match self.state {
            State::Configured => {}
            State::Connected(_) => return Err(OutputError::AlreadyStarted),
            State::Closed => return Err(OutputError::Closed),
        }

        let client = C::connect(&self.config).map_err(OutputError::Connect)?;
        tracing::info!(
            server = %self.config.server,
            database = %self.config.database,
            transport = ?self.writer.transport(),
            "InfluxDB output started"
        );
        self.state = State::Connected(client);
        Ok(())
    }

    fn encode(&self, record: &EventRecord) -> Result<Box<dyn Sizer>, OutputError> {
        if self.is_closed() {
            return Err(OutputError::Closed);
        }
        Ok(Box::new(self.encoder.encode(record)))
    }

    fn write(&mut self, units: &[Box<dyn Sizer>]) -> Result<usize, OutputError> {
        match &self.state {
            State::Connected(client) => self.writer.write(client, units),
            State::Configured => Err(OutputError::NotConnected),
            State::Closed => Err(OutputError::Closed),
        }
    }

    fn close(&mut self) {
        if let State::Connected(_) = self.state {
            tracing::info!(server = %self.config.server, "InfluxDB output closed");
        }
        self.state = State::Closed;
    }
}
