//! The Statistics Aggregator (spec.md §4.K): per-field streaming stats,
//! partitioned by day and device, with derived cross-field totals.
//!
//! Grounded in `examples/original_source/Fit/FieldStats.py`'s
//! `{count, min, max, total}` accumulator — including its quirk that `min`
//! only updates on a truthy (non-zero) value, carried over here rather than
//! switched to `Option<f64>` semantics (SPEC_FULL.md §3) — and
//! `MonitoringOutputData.py`'s `add_derived_stats` for `total_steps`/
//! `total_floors`.

use std::collections::HashMap;

use crate::stats_mode::StatsMode;

/// What `StatsAggregator::report` exposes for one field: counts and
/// min/max/avg/total gated by which mode bits the field's catalog entry
/// declared (spec.md §4.K: "report ... only when their mode bit is set;
/// others are reported as 0").
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct FieldStats {
    stats_mode: StatsMode,
    count: u64,
    sum: f64,
    min: f64,
    max: f64,
}

impl FieldStats {
    fn new(stats_mode: StatsMode) -> Self {
        FieldStats {
            stats_mode,
            count: 0,
            sum: 0.0,
            min: f64::MAX,
            max: f64::MIN,
        }
    }

    fn accumulate(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        if value != 0.0 && value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    fn report(&self) -> StatsSummary {
        let avg = if self.count > 0 { self.sum / self.count as f64 } else { 0.0 };
        let total = if self.stats_mode.is_cumulative() {
            self.max
        } else if self.stats_mode.contains(StatsMode::TOTAL) {
            self.sum
        } else {
            0.0
        };
        StatsSummary {
            count: self.count,
            min: if self.stats_mode.contains(StatsMode::MIN) { self.min } else { 0.0 },
            max: if self.stats_mode.contains(StatsMode::MAX) { self.max } else { 0.0 },
            avg: if self.stats_mode.contains(StatsMode::AVG) { avg } else { 0.0 },
            total,
        }
    }

    /// Pointwise concatenation of two accumulators — associative and
    /// commutative (spec.md §5, §8 property 6), so files can be merged in
    /// any order or fold over an iterator.
    fn merge(&self, other: &FieldStats) -> FieldStats {
        FieldStats {
            stats_mode: self.stats_mode,
            count: self.count + other.count,
            sum: self.sum + other.sum,
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

/// Derived stat names and the component fields summed into them, taken
/// from the bucket's own cumulative max (spec.md §4.K).
const DERIVED_STATS: &[(&str, &[&str])] = &[
    ("total_steps", &["walking_steps", "running_steps"]),
    ("total_floors", &["cum_ascent_floors"]),
];

/// All per-field accumulators for one (day, device) bucket.
#[derive(Debug, Clone, Default)]
pub struct DayStats {
    fields: HashMap<String, FieldStats>,
}

impl DayStats {
    pub fn accumulate(&mut self, name: &str, stats_mode: StatsMode, value: f64) {
        self.fields
            .entry(name.to_string())
            .or_insert_with(|| FieldStats::new(stats_mode))
            .accumulate(value);
    }

    pub fn get(&self, name: &str) -> Option<StatsSummary> {
        self.fields.get(name).map(FieldStats::report)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// All per-field summaries plus the derived cross-field totals
    /// (spec.md §4.L `day_stats()`).
    pub fn summaries(&self) -> HashMap<String, StatsSummary> {
        let mut out: HashMap<String, StatsSummary> =
            self.fields.iter().map(|(name, stats)| (name.clone(), stats.report())).collect();

        for (derived_name, components) in DERIVED_STATS {
            let mut summary = StatsSummary::default();
            for component in *components {
                if let Some(stats) = self.fields.get(*component) {
                    let component_summary = stats.report();
                    summary.count += component_summary.count;
                    summary.total += component_summary.max;
                }
            }
            out.insert(derived_name.to_string(), summary);
        }
        out
    }

    pub fn merge(&self, other: &DayStats) -> DayStats {
        let mut merged = self.fields.clone();
        for (name, stats) in &other.fields {
            merged
                .entry(name.clone())
                .and_modify(|existing| *existing = existing.merge(stats))
                .or_insert(*stats);
        }
        DayStats { fields: merged }
    }
}
