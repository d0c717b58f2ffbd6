// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Event record to series encoding.
//!
//! ```text
//! EventRecord { tag: "host1.app.cpu", time, fields: {idle: 80, user: 12.5} }
//!     --strip_tag=2-->  Series { name: "cpu", columns: [time, idle, user], points: [[ms, 80, 12.5]] }
//! ```

use crate::config::OutputConfig;
use crate::record::EventRecord;
use crate::series::{FieldValue, Series};
use chrono::{DateTime, Utc};

const MILLIS_PER_NANO: f64 = 1e-6;

/// How record timestamps are reduced to milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeConversion {
    /// Exact floor of the nanosecond timestamp.
    #[default]
    Integer,
    /// `trunc(ns as f64 * 1e-6)`. Loses precision for large timestamps but
    /// matches the values written by older deployments bit for bit.
    Float,
}

impl TimeConversion {
    /// Milliseconds since the epoch for `time`.
    pub fn to_millis(self, time: &DateTime<Utc>) -> i64 {
        match self {
            TimeConversion::Integer => time.timestamp_millis(),
            TimeConversion::Float => match time.timestamp_nanos_opt() {
                Some(ns) => (ns as f64 * MILLIS_PER_NANO) as i64,
                // Beyond the i64 nanosecond range there is nothing to be compatible with.
                None => time.timestamp_millis(),
            },
        }
    }
}

/// Turns event records into series-point units.
///
/// Holds only static configuration; `encode` can be called any number of
/// times, from any thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct Encoder {
    strip_tag: usize,
    time: TimeConversion,
}

impl Encoder {
    /// Create an encoder stripping `strip_tag` leading tag segments.
    pub fn new(strip_tag: usize, time: TimeConversion) -> Self {
        Self { strip_tag, time }
    }

    /// Build the encoder described by `config`.
    pub fn from_config(config: &OutputConfig) -> Self {
        let time = if config.float_time {
            TimeConversion::Float
        } else {
            TimeConversion::Integer
        };
        Self::new(config.strip_tag, time)
    }

    /// Derive the series name from a record tag.
    ///
    /// The tag is cut at most `strip_tag` times on `.` and the last piece
    /// wins, so dots in the remaining tail are kept. Tags with fewer
    /// segments fall back to their last segment.
    pub fn series_name<'a>(&self, tag: &'a str) -> &'a str {
        if self.strip_tag == 0 {
            return tag;
        }
        tag.splitn(self.strip_tag.saturating_add(1), '.')
            .last()
            .unwrap_or(tag)
    }

    /// Encode one record into one series.
    pub fn encode(&self, record: &EventRecord) -> Series {
        tracing::debug!(time = %record.time, tag = %record.tag, "encoding record");

        let mut series = Series::new(
            self.series_name(&record.tag),
            self.time.to_millis(&record.time),
        );
        for (name, value) in &record.fields {
            match FieldValue::from_json(value) {
                Some(v) => series.push(name.as_str(), v),
                None => tracing::warn!(
                    tag = %record.tag,
                    field = %name,
                    "skipping field without a scalar value"
                ),
            }
        }
        series
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::TIME_COLUMN;
    use chrono::TimeZone;
    use serde_json::json;

    fn at_nanos(ns: i64) -> DateTime<Utc> {
        Utc.timestamp_nanos(ns)
    }

    fn encoder(strip: usize) -> Encoder {
        Encoder::new(strip, TimeConversion::Integer)
    }

    #[test]
    fn test_strip_zero_keeps_full_tag() {
        for tag in ["a", "a.b", "host1.app.metric.sub", "", ".leading", "trailing."] {
            assert_eq!(encoder(0).series_name(tag), tag);
        }
    }

    #[test]
    fn test_strip_removes_leading_segments() {
        assert_eq!(encoder(2).series_name("a.b.c.d"), "c.d");
        assert_eq!(encoder(2).series_name("host1.app.metric.sub"), "metric.sub");
        assert_eq!(encoder(1).series_name("a.b.c.d"), "b.c.d");
        assert_eq!(encoder(3).series_name("a.b.c.d"), "d");
    }

    #[test]
    fn test_strip_deeper_than_tag_uses_last_segment() {
        assert_eq!(encoder(4).series_name("a.b.c.d"), "d");
        assert_eq!(encoder(10).series_name("a.b"), "b");
        assert_eq!(encoder(5).series_name("single"), "single");
        assert_eq!(encoder(usize::MAX).series_name("x.y"), "y");
    }

    #[test]
    fn test_strip_degenerate_tags() {
        assert_eq!(encoder(1).series_name(""), "");
        assert_eq!(encoder(1).series_name("a."), "");
        assert_eq!(encoder(1).series_name(".b"), "b");
        assert_eq!(encoder(1).series_name("a..b"), ".b");
    }

    #[test]
    fn test_encode_columns_and_row() {
        let record = EventRecord::new("app.metric", at_nanos(1_700_000_000_123_456_789))
            .with_field("a", 1)
            .with_field("b", "x");

        let series = encoder(0).encode(&record);

        assert_eq!(series.name(), "app.metric");
        assert_eq!(series.columns(), ["time", "a", "b"]);
        assert_eq!(
            series.points(),
            [vec![
                FieldValue::Integer(1_700_000_000_123),
                FieldValue::Integer(1),
                FieldValue::String("x".into()),
            ]]
        );
    }

    #[test]
    fn test_encode_empty_fields() {
        let series = encoder(1).encode(&EventRecord::new("a.b", at_nanos(5_000_000)));

        assert_eq!(series.name(), "b");
        assert_eq!(series.columns(), [TIME_COLUMN]);
        assert_eq!(series.row(), [FieldValue::Integer(5)]);
    }

    #[test]
    fn test_encode_all_value_kinds() {
        let record = EventRecord::new("m", at_nanos(0))
            .with_field("b", true)
            .with_field("f", 1.5)
            .with_field("i", -3)
            .with_field("s", "text");

        let series = encoder(0).encode(&record);

        assert_eq!(series.columns(), ["time", "b", "f", "i", "s"]);
        assert_eq!(
            &series.row()[1..],
            [
                FieldValue::Boolean(true),
                FieldValue::Float(1.5),
                FieldValue::Integer(-3),
                FieldValue::String("text".into()),
            ]
        );
    }

    #[test]
    fn test_encode_skips_non_scalar_fields() {
        let record = EventRecord::new("m", at_nanos(0))
            .with_field("nested", json!({"x": 1}))
            .with_field("list", json!([1, 2]))
            .with_field("missing", json!(null))
            .with_field("value", 7);

        let series = encoder(0).encode(&record);

        assert_eq!(series.columns(), ["time", "value"]);
        assert_eq!(series.row().len(), series.columns().len());
    }

    /// Log sink capturing formatted events.
    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_skipped_field_logged_at_warn() {
        let sink = Captured::default();
        let writer = sink.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let record = EventRecord::new("m", at_nanos(0)).with_field("nested", json!({"x": 1}));
        tracing::subscriber::with_default(subscriber, || encoder(0).encode(&record));

        let logs = String::from_utf8(sink.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("WARN"), "logs: {}", logs);
        assert!(logs.contains("skipping field without a scalar value"), "logs: {}", logs);
        assert!(logs.contains("nested"), "logs: {}", logs);
    }

    #[test]
    fn test_encode_is_repeatable() {
        let record = EventRecord::new("a.b.c", at_nanos(42_000_000)).with_field("v", 1);
        let enc = encoder(1);
        assert_eq!(enc.encode(&record), enc.encode(&record));
    }

    #[test]
    fn test_integer_time_floors() {
        assert_eq!(TimeConversion::Integer.to_millis(&at_nanos(1_999_999)), 1);
        assert_eq!(TimeConversion::Integer.to_millis(&at_nanos(-1)), -1);
        assert_eq!(TimeConversion::Integer.to_millis(&at_nanos(0)), 0);
    }

    #[test]
    fn test_float_time_matches_legacy_rounding() {
        let ns = 1_700_000_000_123_456_789_i64;
        let expected = (ns as f64 * 1e-6) as i64;
        assert_eq!(TimeConversion::Float.to_millis(&at_nanos(ns)), expected);
        assert_eq!(TimeConversion::Float.to_millis(&at_nanos(-1_500_000)), -1);
    }

    #[test]
    fn test_encoder_from_config() {
        let config = OutputConfig {
            strip_tag: 2,
            float_time: true,
            ..OutputConfig::new("localhost:8086", "m")
        };
        let enc = Encoder::from_config(&config);
        assert_eq!(enc.series_name("a.b.c"), "c");
        assert_eq!(enc.time, TimeConversion::Float);
    }
}
