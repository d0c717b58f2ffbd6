// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Size-accounted batching of encoded units.
//!
//! A minimal host-side buffer: units accumulate until their summed
//! [`Sizer::size`] reaches a byte threshold or the flush interval elapses.

use crate::series::Sizer;
use std::time::{Duration, Instant};

/// A batching buffer for sizable units.
///
/// Units are accumulated until either:
/// - their total size reaches `max_bytes` (size-based flush)
/// - `flush_interval` has elapsed since the last flush (time-based flush)
pub struct SizedBuffer {
    units: Vec<Box<dyn Sizer>>,
    bytes: usize,
    max_bytes: usize,
    flush_interval: Duration,
    last_flush: Instant,
}

impl SizedBuffer {
    pub fn new(max_bytes: usize, flush_interval: Duration) -> Self {
        Self {
            units: Vec::new(),
            bytes: 0,
            max_bytes,
            flush_interval,
            last_flush: Instant::now(),
        }
    }

    /// Add a unit.
    ///
    /// Returns `Some(batch)` once the buffered size reaches `max_bytes`.
    pub fn add(&mut self, unit: Box<dyn Sizer>) -> Option<Vec<Box<dyn Sizer>>> {
        self.bytes += unit.size();
        self.units.push(unit);
        if self.bytes >= self.max_bytes {
            Some(self.flush())
        } else {
            None
        }
    }

    /// Check if a time-based flush is due.
    pub fn should_flush(&self) -> bool {
        !self.units.is_empty() && self.last_flush.elapsed() >= self.flush_interval
    }

    /// Take all buffered units and reset the timer.
    pub fn flush(&mut self) -> Vec<Box<dyn Sizer>> {
        self.last_flush = Instant::now();
        self.bytes = 0;
        std::mem::take(&mut self.units)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Summed size of the buffered units.
    pub fn bytes(&self) -> usize {
        self.bytes
    }
}
