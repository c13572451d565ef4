//! Decoder for Garmin FIT activity/monitoring files, plus a daily
//! per-field statistics aggregator over the `monitoring` message stream.
//!
//! `fit_monitor::decode` takes a whole FIT byte buffer and returns a
//! [`FitFile`]; everything else in this crate is the machinery that builds
//! one. See `crate::output` for the read-only views a caller is expected to
//! drive (`messages`, `day_stats`, `overall_stats`, ...).

pub mod base_type;
pub mod byte_reader;
pub mod catalog;
pub mod definition;
pub mod error;
pub mod field_def;
pub mod field_value;
pub mod header;
pub mod message;
pub mod output;
pub mod parser;
pub mod record_header;
pub mod stats;
pub mod stats_mode;
pub mod units;

pub use error::{FitError, Result};
pub use parser::FitFile;
pub use units::UnitPolicy;

/// Decodes a complete FIT byte buffer (spec.md §4.J) under the given unit
/// policy. This is the crate's single entry point; everything downstream
/// is read off the returned [`FitFile`] through `crate::output`'s views.
pub fn decode(data: &[u8], unit_policy: UnitPolicy) -> Result<FitFile> {
    parser::parse(data, unit_policy)
}
