//! Description of the session sample a dataset was computed from.
//!
//! Datasets carry a `sessions` block:
//!
//! ```json
//! { "sessions": {
//!     "count": 123456,
//!     "timestamp": 1465430400,
//!     "share": { "47": 0.6, "46": 0.4 },
//!     "metadata": [ { "info": { "channel": "*", "day_range": 14 } } ]
//! } }
//! ```

use crate::models::{Counts, SeriesEntry};
use crate::series::map_to_series_with;
use crate::viz::util::format_count;
use chrono::DateTime;
use num_format::Locale;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SourceInfo {
    pub channel: String,
    #[serde(default)]
    pub day_range: Option<u32>,
    #[serde(default)]
    pub build_range: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SourceMetadata {
    pub info: SourceInfo,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SampleInfo {
    pub count: f64,
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
    /// Share of sessions per product version.
    #[serde(default)]
    pub share: Counts,
    #[serde(default)]
    pub metadata: Vec<SourceMetadata>,
}

impl SourceInfo {
    /// `"beta (14 days of sessions)"` or `"all (builds from the last 30 days)"`.
    pub fn describe(&self) -> String {
        let channel = if self.channel == "*" {
            "all"
        } else {
            self.channel.as_str()
        };
        match (self.day_range, self.build_range) {
            (Some(days), _) if days > 0 => format!("{channel} ({days} days of sessions)"),
            (_, Some(days)) => format!("{channel} (builds from the last {days} days)"),
            _ => channel.to_string(),
        }
    }
}

impl SampleInfo {
    /// Read the `sessions` block of a dataset.
    pub fn from_dataset(value: &Value) -> Result<Self, serde_json::Error> {
        let sessions = value.get("sessions").cloned().unwrap_or(Value::Null);
        serde_json::from_value(sessions)
    }

    /// Share per version, labelled `"{product} {version}"`.
    pub fn share_series(&self, product: &str) -> Vec<SeriesEntry> {
        map_to_series_with(&self.share, |k| format!("{product} {k}"))
    }

    /// `"123,456 sessions"`.
    pub fn size_text(&self, locale: &Locale) -> String {
        format!("{} sessions", format_count(self.count, locale))
    }

    /// `"2016-06-09, channels: all (14 days of sessions), beta (...)"`.
    pub fn source_text(&self) -> String {
        let date = DateTime::from_timestamp(self.timestamp, 0)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| self.timestamp.to_string());
        let channels: Vec<String> = self.metadata.iter().map(|m| m.info.describe()).collect();
        format!("{date}, channels: {}", channels.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dataset() -> Value {
        json!({
            "sessions": {
                "count": 1234567,
                "timestamp": 1465430400,
                "share": {"47": 0.6, "46": 0.4},
                "metadata": [
                    {"info": {"channel": "*", "day_range": 14}},
                    {"info": {"channel": "beta", "build_range": 30}}
                ]
            }
        })
    }

    #[test]
    fn parses_and_describes_sources() {
        let info = SampleInfo::from_dataset(&dataset()).unwrap();
        assert_eq!(
            info.source_text(),
            "2016-06-09, channels: all (14 days of sessions), beta (builds from the last 30 days)"
        );
        assert_eq!(info.size_text(&Locale::en), "1,234,567 sessions");
    }

    #[test]
    fn share_series_keeps_order() {
        let info = SampleInfo::from_dataset(&dataset()).unwrap();
        let s = info.share_series("Firefox");
        assert_eq!(s[0].label, "Firefox 47");
        assert_eq!(s[1].data, 0.4);
    }

    #[test]
    fn missing_sessions_block_is_an_error() {
        assert!(SampleInfo::from_dataset(&json!({"other": 1})).is_err());
    }
}
