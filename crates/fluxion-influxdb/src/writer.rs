// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Batch submission of encoded series.

use crate::client::SeriesClient;
use crate::config::OutputConfig;
use crate::error::OutputError;
use crate::series::{Series, Sizer};

/// Transport used for every batch of an output's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// Connection-oriented, reliable (HTTP).
    Stream,
    /// Connectionless, unreliable (UDP).
    Datagram,
}

impl Transport {
    /// Transport selected by `use_udp`.
    pub fn from_config(config: &OutputConfig) -> Self {
        if config.use_udp {
            Transport::Datagram
        } else {
            Transport::Stream
        }
    }
}

/// Submits accumulated units to the store as one batch.
///
/// All-or-nothing: either every unit is reported written, or none is and
/// the client error is returned unchanged. No retries, no splitting, no
/// merging of units sharing a series name.
#[derive(Debug, Clone, Copy)]
pub struct BatchWriter {
    transport: Transport,
}

impl BatchWriter {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> Transport {
        self.transport
    }

    /// Write `units` through `client`, returning how many were written.
    ///
    /// Every unit must be a [`Series`] produced by this crate's encoder;
    /// anything else fails the whole call before the client is touched.
    pub fn write<C: SeriesClient + ?Sized>(
        &self,
        client: &C,
        units: &[Box<dyn Sizer>],
    ) -> Result<usize, OutputError> {
        if units.is_empty() {
            return Ok(0);
        }

        let series = units
            .iter()
            .enumerate()
            .map(|(index, unit)| {
                unit.as_any()
                    .downcast_ref::<Series>()
                    .ok_or(OutputError::UnexpectedUnit { index })
            })
            .collect::<Result<Vec<&Series>, _>>()?;

        let result = match self.transport {
            Transport::Stream => client.write_series(&series),
            Transport::Datagram => client.write_series_over_udp(&series),
        };

        match result {
            Ok(()) => {
                tracing::debug!(units = series.len(), transport = ?self.transport, "batch written");
                Ok(series.len())
            }
            Err(e) => {
                tracing::debug!(units = series.len(), error = %e, "batch rejected");
                Err(OutputError::Transport(e))
            }
        }
    }
}
