//! The Data Field Decoder (spec.md §4.H): decodes one field per its bound
//! definition and the Field Catalog, producing a [`FieldValue`].
//!
//! Grounded in `examples/original_source/Fit/Field.py`'s `Field.convert`
//! and `FieldValue` (the `{name, type, value, orig, invalid, units}`
//! tuple), reshaped into an owned Rust struct that holds no reference back
//! into the wire buffer (spec.md §3 "Ownership").

use crate::base_type::BaseType;
use crate::byte_reader::{ByteReader, Endianness};
use crate::catalog::{self, FieldDescriptor, FieldKind};
use crate::error::FitError;
use crate::field_def::FieldDefinition;
use crate::stats_mode::StatsMode;
use crate::units::UnitPolicy;

pub const FIT_EPOCH_OFFSET_SECS: i64 = 631_065_600; // 1989-12-31T00:00:00Z, Unix epoch seconds

/// The decoded value of a field, in either its raw or converted form.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Numbers(Vec<f64>),
    Strings(Vec<String>),
}

impl Value {
    /// A single representative number for stats accumulation, when this
    /// value is numeric (spec.md §4.K accumulates numeric field values).
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue {
    pub name: String,
    pub value: Value,
    pub raw: Value,
    pub invalid: bool,
    pub units: String,
    pub stats_mode: StatsMode,
}

impl FieldValue {
    pub fn is_invalid(&self) -> bool {
        self.invalid
    }
}

/// Reads one element of `base_type` and returns `(bit pattern for invalid
/// comparison, numeric value)`. Strings are handled separately by the
/// caller since they don't fit the scalar-element model.
fn read_element(
    reader: &mut ByteReader,
    base_type: BaseType,
    endian: Endianness,
) -> Result<(u64, f64), FitError> {
    use BaseType::*;
    Ok(match base_type {
        Enum | Uint8 | Uint8z | Byte => {
            let v = reader.read_u8()? as u64;
            (v, v as f64)
        }
        Sint8 => {
            let v = reader.read_i8()?;
            (v as u8 as u64, v as f64)
        }
        Uint16 | Uint16z => {
            let v = reader.read_u16(endian)? as u64;
            (v, v as f64)
        }
        Sint16 => {
            let v = reader.read_i16(endian)?;
            (v as u16 as u64, v as f64)
        }
        Uint32 | Uint32z => {
            let v = reader.read_u32(endian)? as u64;
            (v, v as f64)
        }
        Sint32 => {
            let v = reader.read_i32(endian)?;
            (v as u32 as u64, v as f64)
        }
        Uint64 | Uint64z => {
            let v = reader.read_u64(endian)?;
            (v, v as f64)
        }
        Sint64 => {
            let v = reader.read_i64(endian)?;
            (v as u64, v as f64)
        }
        Float32 => {
            let v = reader.read_f32(endian)?;
            (v.to_bits() as u64, v as f64)
        }
        Float64 => {
            let v = reader.read_f64(endian)?;
            (v.to_bits(), v)
        }
        String => unreachable!("string fields are read as a whole, not element-wise"),
    })
}

/// Converts FIT-epoch seconds (seconds since 1989-12-31T00:00:00Z) to a
/// calendar timestamp (spec.md §3, §4.J). Shared by the Data Field
/// Decoder's display conversion and the File Parser's absolute-timestamp
/// resolution.
pub fn fit_seconds_to_datetime(seconds: f64) -> Option<chrono::DateTime<chrono::Utc>> {
    use chrono::{DateTime, Utc};
    let unix_secs = seconds as i64 + FIT_EPOCH_OFFSET_SECS;
    DateTime::<Utc>::from_timestamp(unix_secs, 0)
}

fn fit_seconds_to_rfc3339(seconds: f64) -> String {
    match fit_seconds_to_datetime(seconds) {
        Some(dt) => dt.to_rfc3339(),
        None => format!("invalid-fit-timestamp({seconds})"),
    }
}

/// Decodes one field per spec.md §4.H. `manufacturer_hint` supplies the
/// previously-decoded `manufacturer` value within the same message, for
/// the `Product` field kind's two-phase lookup (spec.md §4.G).
pub fn decode_field(
    reader: &mut ByteReader,
    endian: Endianness,
    field_def: &FieldDefinition,
    descriptor: Option<FieldDescriptor>,
    manufacturer_hint: Option<u32>,
    unit_policy: UnitPolicy,
) -> Result<FieldValue, FitError> {
    let name = descriptor
        .map(|d| d.name.to_string())
        .unwrap_or_else(|| format!("unknown_{}", field_def.field_definition_number));
    let stats_mode = descriptor.map(|d| d.stats_mode).unwrap_or(StatsMode::NONE);
    let kind = descriptor.map(|d| d.kind).unwrap_or(FieldKind::Raw);

    if field_def.base_type == BaseType::String {
        let text = reader.read_string(field_def.byte_length as usize)?;
        let invalid = text.is_empty();
        return Ok(FieldValue {
            name,
            value: Value::Text(text.clone()),
            raw: Value::Text(text),
            invalid,
            units: String::new(),
            stats_mode,
        });
    }

    let count = field_def.count();
    let sentinel = field_def.base_type.invalid_raw();
    let mut bits = Vec::with_capacity(count);
    let mut nums = Vec::with_capacity(count);
    for _ in 0..count {
        let (b, n) = read_element(reader, field_def.base_type, endian)?;
        bits.push(b);
        nums.push(n);
    }
    let invalid = bits.iter().all(|&b| b == sentinel);

    let (value, units) = convert(kind, &nums, manufacturer_hint, unit_policy);
    let raw = if count == 1 {
        Value::Number(nums[0])
    } else {
        Value::Numbers(nums)
    };

    Ok(FieldValue {
        name,
        value,
        raw,
        invalid,
        units,
        stats_mode,
    })
}

fn convert(
    kind: FieldKind,
    nums: &[f64],
    manufacturer_hint: Option<u32>,
    unit_policy: UnitPolicy,
) -> (Value, String) {
    match kind {
        FieldKind::Raw => single_or_array(nums, |n| Value::Number(n), Value::Numbers),
        FieldKind::Enum(table) => {
            let translate = |n: f64| match catalog::enum_lookup(table, n as u32) {
                Some(name) => name.to_string(),
                None => format!("{}", n as i64),
            };
            if nums.len() == 1 {
                (Value::Text(translate(nums[0])), String::new())
            } else {
                (
                    Value::Strings(nums.iter().copied().map(translate).collect()),
                    String::new(),
                )
            }
        }
        FieldKind::Product => {
            let n = nums.first().copied().unwrap_or(0.0);
            let text = match manufacturer_hint.and_then(|m| catalog::product_name(m, n as u32)) {
                Some(name) => name.to_string(),
                None => format!("{}", n as i64),
            };
            (Value::Text(text), String::new())
        }
        FieldKind::Scaled { scale, offset, units, is_altitude } => {
            let convert_one = |n: f64| {
                let converted = n / scale + offset;
                unit_policy.convert(converted, units, is_altitude)
            };
            if nums.len() == 1 {
                let (v, u) = convert_one(nums[0]);
                (Value::Number(v), u.to_string())
            } else {
                let mut out_units = units;
                let values = nums
                    .iter()
                    .map(|&n| {
                        let (v, u) = convert_one(n);
                        out_units = u;
                        v
                    })
                    .collect();
                (Value::Numbers(values), out_units.to_string())
            }
        }
        FieldKind::Timestamp { .. } => {
            let n = nums.first().copied().unwrap_or(0.0);
            (Value::Text(fit_seconds_to_rfc3339(n)), String::new())
        }
        FieldKind::Position => single_or_array(
            nums,
            |n| Value::Number(n),
            Value::Numbers,
        ),
        FieldKind::ActivityTypeIntensity => {
            let n = nums.first().copied().unwrap_or(0.0) as u32;
            // Packed byte: low 5 bits activity type, high 3 bits intensity
            // (spec.md §4.G). The unpacked sub-fields are produced by the
            // Data Message Decoder (spec.md §4.I); here we still surface a
            // numeric value for the packed field itself.
            let _ = n;
            single_or_array(nums, Value::Number, Value::Numbers)
        }
    }
}

fn single_or_array(
    nums: &[f64],
    one: impl Fn(f64) -> Value,
    many: impl Fn(Vec<f64>) -> Value,
) -> (Value, String) {
    if nums.len() == 1 {
        (one(nums[0]), String::new())
    } else {
        (many(nums.to_vec()), String::new())
    }
}

/// Unpacks an `activity_type_intensity` packed byte into `(activity_type,
/// intensity)` sub-values (spec.md §4.G, §4.I).
pub fn unpack_activity_type_intensity(raw: f64) -> (u32, u32) {
    let byte = raw as u32;
    (byte & 0x1F, (byte >> 5) & 0x07)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::field_descriptor;
    use crate::field_def::FieldDefinition;

    #[test]
    fn s3_enum_field_decodes_to_name() {
        let data = [0x04u8];
        let mut reader = ByteReader::new(&data);
        let fd = FieldDefinition::parse(0, 1, BaseType::Enum as u8).unwrap();
        let descriptor = field_descriptor(0, 0); // file_id.type
        let fv = decode_field(
            &mut reader,
            Endianness::Little,
            &fd,
            descriptor,
            None,
            UnitPolicy::METRIC,
        )
        .unwrap();
        assert_eq!(fv.name, "type");
        assert_eq!(fv.value, Value::Text("activity".to_string()));
        assert_eq!(fv.raw, Value::Number(4.0));
        assert!(!fv.invalid);
    }

    #[test]
    fn s6_invalid_uint16_detected() {
        let data = [0xFF, 0xFF];
        let mut reader = ByteReader::new(&data);
        let fd = FieldDefinition::parse(3, 2, BaseType::Uint16 as u8).unwrap();
        let fv = decode_field(
            &mut reader,
            Endianness::Little,
            &fd,
            None,
            None,
            UnitPolicy::METRIC,
        )
        .unwrap();
        assert!(fv.invalid);
    }

    #[test]
    fn unknown_enum_value_keeps_raw_as_text_number() {
        let data = [200u8];
        let mut reader = ByteReader::new(&data);
        let fd = FieldDefinition::parse(0, 1, BaseType::Enum as u8).unwrap();
        let descriptor = field_descriptor(0, 0);
        let fv = decode_field(
            &mut reader,
            Endianness::Little,
            &fd,
            descriptor,
            None,
            UnitPolicy::METRIC,
        )
        .unwrap();
        assert_eq!(fv.value, Value::Text("200".to_string()));
    }

    #[test]
    fn scaled_distance_field_applies_scale() {
        let data = 500u16.to_le_bytes();
        let mut reader = ByteReader::new(&data);
        let fd = FieldDefinition::parse(5, 2, BaseType::Uint16 as u8).unwrap();
        let descriptor = field_descriptor(20, 5); // record.distance, scale 100
        let fv = decode_field(
            &mut reader,
            Endianness::Little,
            &fd,
            descriptor,
            None,
            UnitPolicy::METRIC,
        )
        .unwrap();
        assert_eq!(fv.value, Value::Number(5.0));
        assert_eq!(fv.units, "m");
    }

    #[test]
    fn english_units_policy_converts_distance_to_miles() {
        let data = 160934u32.to_le_bytes(); // 1609.34 m * 100
        let mut reader = ByteReader::new(&data);
        let fd = FieldDefinition::parse(9, 4, BaseType::Uint32 as u8).unwrap();
        let descriptor = field_descriptor(18, 9); // session.total_distance
        let fv = decode_field(
            &mut reader,
            Endianness::Little,
            &fd,
            descriptor,
            None,
            UnitPolicy::ENGLISH,
        )
        .unwrap();
        assert_eq!(fv.units, "mi");
        if let Value::Number(n) = fv.value {
            assert!((n - 1.0).abs() < 1e-3);
        } else {
            panic!("expected numeric value");
        }
    }

    #[test]
    fn english_units_distinguishes_altitude_feet_from_distance_miles_at_same_scale() {
        // record.altitude (20,2) and monitoring.distance (55,28) both scale
        // by 5 and carry "m" units, but only the former is an altitude.
        let data = 5000u16.to_le_bytes(); // (5000/5) - 500 = 500 m of altitude
        let mut reader = ByteReader::new(&data);
        let fd = FieldDefinition::parse(2, 2, BaseType::Uint16 as u8).unwrap();
        let altitude = decode_field(
            &mut reader,
            Endianness::Little,
            &fd,
            field_descriptor(20, 2),
            None,
            UnitPolicy::ENGLISH,
        )
        .unwrap();
        assert_eq!(altitude.units, "ft");

        let data = 8047u32.to_le_bytes(); // 8047 / 5 = 1609.4 m
        let mut reader = ByteReader::new(&data);
        let fd = FieldDefinition::parse(28, 4, BaseType::Uint32 as u8).unwrap();
        let distance = decode_field(
            &mut reader,
            Endianness::Little,
            &fd,
            field_descriptor(55, 28),
            None,
            UnitPolicy::ENGLISH,
        )
        .unwrap();
        assert_eq!(distance.units, "mi");
    }

    #[test]
    fn product_field_resolves_via_manufacturer_hint() {
        let data = 2337u16.to_le_bytes();
        let mut reader = ByteReader::new(&data);
        let fd = FieldDefinition::parse(2, 2, BaseType::Uint16 as u8).unwrap();
        let descriptor = field_descriptor(0, 2); // file_id.product
        let fv = decode_field(
            &mut reader,
            Endianness::Little,
            &fd,
            descriptor,
            Some(1), // garmin
            UnitPolicy::METRIC,
        )
        .unwrap();
        assert_eq!(fv.value, Value::Text("vivoactive_hr".to_string()));
    }

    #[test]
    fn unpacks_activity_type_intensity_byte() {
        // low 5 bits = 1 (running), high 3 bits = 2
        let packed = 1 | (2 << 5);
        let (activity_type, intensity) = unpack_activity_type_intensity(packed as f64);
        assert_eq!(activity_type, 1);
        assert_eq!(intensity, 2);
    }
}
