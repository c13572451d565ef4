//! Stats-mode flags (spec.md §3, §4.K).
//!
//! Grounded in `examples/original_source/Fit/FieldStats.py`'s
//! `stats_none`/`stats_max`/`stats_min`/`stats_avg`/`stats_tot`/`stats_cum`
//! bitmask constants, translated into a small `bitflags`-shaped type by
//! hand (the pack does not pull in the `bitflags` crate anywhere, so this
//! stays a plain newtype over `u8` rather than adding a dependency for
//! five bits).

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsMode(u8);

impl StatsMode {
    pub const NONE: StatsMode = StatsMode(0);
    pub const MIN: StatsMode = StatsMode(0x01);
    pub const MAX: StatsMode = StatsMode(0x02);
    pub const AVG: StatsMode = StatsMode(0x04);
    pub const TOTAL: StatsMode = StatsMode(0x08);
    pub const CUMULATIVE: StatsMode = StatsMode(0x10);

    pub const fn union(self, other: StatsMode) -> StatsMode {
        StatsMode(self.0 | other.0)
    }

    pub fn contains(self, other: StatsMode) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    pub fn is_cumulative(self) -> bool {
        self.contains(StatsMode::CUMULATIVE)
    }
}

/// `MIN | MAX | AVG | TOTAL`, the common case for simple numeric fields
/// (spec.md §3: "optional 'stats mode' flags").
pub const STATS_ALL: StatsMode = StatsMode::MIN
    .union(StatsMode::MAX)
    .union(StatsMode::AVG)
    .union(StatsMode::TOTAL);

/// `MAX | CUMULATIVE`: the bucket's representative total is its
/// within-bucket maximum (spec.md §4.K).
pub const STATS_CUMULATIVE: StatsMode = StatsMode::MAX.union(StatsMode::CUMULATIVE);
