//! Output Views (spec.md §4.L): read-only projections over a parsed
//! [`FitFile`] for callers that don't want to walk `messages_by_name` and
//! `day_stats` by hand.
//!
//! Grounded in `examples/original_source/Fit/MonitoringOutputData.py`'s
//! `get_stats`/`get_messages`-style accessors, reshaped as plain methods on
//! the owned [`FitFile`] rather than a separate writer object (presentation
//! and spreadsheet output are out of scope per spec.md §1).

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::field_value::Value;
use crate::message::DataMessage;
use crate::parser::FitFile;
use crate::stats::{DayStats, StatsSummary};

static EMPTY_MESSAGES: &[DataMessage] = &[];

impl FitFile {
    /// All decoded messages under `name`, in the order they were parsed.
    pub fn messages(&self, name: &str) -> &[DataMessage] {
        self.messages_by_name.get(name).map(Vec::as_slice).unwrap_or(EMPTY_MESSAGES)
    }

    /// Every day bucket, with devices merged per spec.md §4.K's
    /// "per-day totals across devices" rule.
    pub fn day_stats(&self) -> HashMap<NaiveDate, HashMap<String, StatsSummary>> {
        self.day_stats
            .iter()
            .map(|(day, by_device)| (*day, merge_devices(by_device).summaries()))
            .collect()
    }

    /// The concatenation of every day bucket's stats, restricted to
    /// `fields` (spec.md §4.L: "for a configured set of fields").
    pub fn overall_stats(&self, fields: &[&str]) -> HashMap<String, StatsSummary> {
        let merged = self
            .day_stats
            .values()
            .map(merge_devices)
            .fold(DayStats::default(), |acc, day| acc.merge(&day));
        let summaries = merged.summaries();
        fields
            .iter()
            .filter_map(|name| summaries.get(*name).map(|s| (name.to_string(), *s)))
            .collect()
    }

    /// The `file_id.type` field, if a `file_id` message was decoded.
    pub fn file_type(&self) -> Option<String> {
        let file_id = self.messages("file_id").first()?;
        match &file_id.field("type")?.value {
            Value::Text(name) => Some(name.clone()),
            _ => None,
        }
    }

    /// The `file_id.time_created` timestamp, as a calendar timestamp.
    pub fn time_created(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        let file_id = self.messages("file_id").first()?;
        let seconds = file_id.field("time_created")?.raw.as_number()?;
        crate::field_value::fit_seconds_to_datetime(seconds)
    }

    /// The earliest and latest calendar day seen across every resolved
    /// message timestamp, or `None` if no message ever resolved one.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.day_stats.keys().fold(None, |span, &day| match span {
            None => Some((day, day)),
            Some((min, max)) => Some((min.min(day), max.max(day))),
        })
    }

    /// The FIT profile version declared in the file header (spec.md §4.C).
    pub fn profile_version(&self) -> u16 {
        self.header.profile_version
    }
}

fn merge_devices(by_device: &HashMap<Option<u32>, DayStats>) -> DayStats {
    by_device.values().fold(DayStats::default(), |acc, stats| acc.merge(stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::UnitPolicy;

    fn wrap_payload(payload: &[u8]) -> Vec<u8> {
        let mut data = vec![12u8, 0x10, 0x00, 0x00];
        data.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        data.extend_from_slice(b".FIT");
        data.extend_from_slice(payload);
        data
    }

    #[test]
    fn file_type_and_time_created_read_from_file_id() {
        let mut payload: Vec<u8> = vec![
            0x40, // definition, local slot 0
            0x00, 0x00, // reserved, architecture little
            0x00, 0x00, // global message number 0 (file_id)
            0x02, // two fields
            0x00, 0x01, 0x00, // field 0 (type), size 1, base enum
            4, 4, 0x86, // field 4 (time_created), size 4, base uint32
            0x00, // data header, local slot 0
            0x04, // type = activity
        ];
        payload.extend_from_slice(&1000u32.to_le_bytes());

        let data = wrap_payload(&payload);
        let file = crate::parser::parse(&data, UnitPolicy::METRIC).unwrap();
        assert_eq!(file.file_type().as_deref(), Some("activity"));
        let expected = crate::field_value::fit_seconds_to_datetime(1000.0).unwrap();
        assert_eq!(file.time_created(), Some(expected));
    }

    #[test]
    fn profile_version_reads_from_header() {
        let mut data = vec![12u8, 0x10, 0x42, 0x06]; // profile_version = 0x0642
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(b".FIT");
        let file = crate::parser::parse(&data, UnitPolicy::METRIC).unwrap();
        assert_eq!(file.profile_version(), 0x0642);
    }

    #[test]
    fn messages_of_unknown_name_returns_empty_slice() {
        let data = wrap_payload(&[]);
        let file = crate::parser::parse(&data, UnitPolicy::METRIC).unwrap();
        assert!(file.messages("record").is_empty());
    }

    #[test]
    fn day_stats_merges_across_devices() {
        let mut a = HashMap::new();
        a.insert(Some(1u32), {
            let mut s = DayStats::default();
            s.accumulate("heart_rate", crate::stats_mode::STATS_ALL, 60.0);
            s
        });
        a.insert(Some(2u32), {
            let mut s = DayStats::default();
            s.accumulate("heart_rate", crate::stats_mode::STATS_ALL, 80.0);
            s
        });
        let merged = merge_devices(&a);
        let summary = merged.get("heart_rate").unwrap();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.max, 80.0);
    }
}
