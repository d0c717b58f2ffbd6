// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Event records handed to the output by the host pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A schema-less event: timestamp, hierarchical tag and dynamic fields.
///
/// JSON form, one record per line:
///
/// ```text
/// {"tag": "host1.app.cpu", "time": "2026-01-02T03:04:05.123456789Z", "fields": {"user": 12.5}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Dot-separated origin tag, e.g. `app.service.metric`.
    pub tag: String,
    /// Event time with nanosecond precision.
    pub time: DateTime<Utc>,
    /// Field name to value.
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl EventRecord {
    /// Create a record without fields.
    pub fn new(tag: impl Into<String>, time: DateTime<Utc>) -> Self {
        Self {
            tag: tag.into(),
            time,
            fields: Map::new(),
        }
    }

    /// Add a field.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Parse a record from one JSON line.
    pub fn from_json_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}
