//! Live segment timing.
//!
//! Live streams can only be resumed mid-segment once the segment duration,
//! stream start time and first segment number are known. Those come from an
//! out-of-band probe of the DASH endpoint and are merged into the descriptor
//! once.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Timing reported by the live probe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveTiming {
    pub segment_duration_us: u32,
    pub start_time_ms: i64,
    pub start_segment_num: u32,
    pub seekable: bool,
}

/// Timing fields held by a descriptor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SegmentTiming {
    pub segment_duration_us: u32,
    pub start_time_ms: i64,
    pub start_segment_num: u32,
    pub seekable: bool,
}

impl SegmentTiming {
    /// Overwrite with probe values. `None` leaves the fields untouched.
    pub fn sync(&mut self, timing: Option<&LiveTiming>) {
        let Some(timing) = timing else {
            return;
        };

        self.segment_duration_us = timing.segment_duration_us;
        self.start_time_ms = timing.start_time_ms;
        self.start_segment_num = timing.start_segment_num;
        self.seekable = timing.seekable;

        tracing::debug!(
            start_segment = timing.start_segment_num,
            segment_us = timing.segment_duration_us,
            seekable = timing.seekable,
            "Synced live timing"
        );
    }
}

/// Parse an upstream date: RFC 3339, or a bare `YYYY-MM-DD` taken as UTC
/// midnight.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
