//! The Data Message Decoder (spec.md §4.I): decodes every field of one
//! data record against its bound Definition Message, then applies
//! sub-field expansion and the monitoring-message rewrite.
//!
//! Grounded in `examples/original_source/Fit/MonitoringBData.py`'s
//! `parse_message` (the `current_activity_type_intensity` expansion and the
//! `cycles` → `<units>` rekeying) and `MonitoringOutputData.py` (the
//! `total_steps`/`total_floors` component field names, which fix the
//! per-activity units table below).

use chrono::{DateTime, Utc};

use crate::byte_reader::ByteReader;
use crate::catalog::{self, FieldKind};
use crate::definition::DefinitionMessage;
use crate::error::FitError;
use crate::field_value::{self, FieldValue, Value};
use crate::units::UnitPolicy;

/// An insertion-ordered `name -> FieldValue` map (spec.md §3: a message's
/// fields are an ordered mapping, not a set). A linear scan is fine at the
/// handful of fields a FIT message declares; the point is to preserve wire
/// order for anything downstream that cares (e.g. presenting a message back
/// in its original field order), not lookup speed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    entries: Vec<(String, FieldValue)>,
}

impl FieldMap {
    fn with_capacity(capacity: usize) -> Self {
        FieldMap {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Inserts `value` under `name`, overwriting in place if the name is
    /// already present so wire order is preserved across a rewrite.
    fn insert(&mut self, name: String, value: FieldValue) {
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    fn remove(&mut self, name: &str) -> Option<FieldValue> {
        let index = self.entries.iter().position(|(k, _)| k == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn values(&self) -> impl Iterator<Item = &FieldValue> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataMessage {
    pub global_message_number: u16,
    pub message_name: &'static str,
    pub fields: FieldMap,
    pub timestamp: Option<DateTime<Utc>>,
}

impl DataMessage {
    pub fn new(global_message_number: u16, fields: FieldMap, timestamp: Option<DateTime<Utc>>) -> Self {
        DataMessage {
            global_message_number,
            message_name: catalog::message_name(global_message_number),
            fields,
            timestamp,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }
}

/// Per-activity-type `(cycles unit name, cycles scaling factor)`, keyed by
/// the enum name produced from the `activity_type` field. Unknown activity
/// types fall back to `("cycles", 1.0)` — the field keeps its generic name
/// rather than being dropped (spec.md §4.I still requires every field to
/// surface somewhere).
const ACTIVITY_CYCLE_UNITS: &[(&str, &str, f64)] = &[
    ("running", "steps", 2.0),
    ("walking", "steps", 1.0),
    ("cycling", "revolutions", 1.0),
    ("swimming", "strokes", 1.0),
];

fn activity_cycle_factor(activity_type_name: &str) -> (&'static str, f64) {
    ACTIVITY_CYCLE_UNITS
        .iter()
        .find(|(name, _, _)| *name == activity_type_name)
        .map(|(_, units, factor)| (*units, *factor))
        .unwrap_or(("cycles", 1.0))
}

/// Fields re-keyed by appending `"_" + activity_type_name"` (spec.md §4.I,
/// §9 Open Question 2). Disjoint from `cycles`'s own base-rename rule by
/// construction; see `rewrite_rules_are_disjoint` below.
const REKEY_BY_ACTIVITY_SUFFIX: &[&str] = &["cum_active_time", "active_calories", "distance", "duration_min"];

/// Decodes every field of a data record against `definition`, applies
/// sub-field expansion, and (for `monitoring` messages) the activity-keyed
/// rewrite. Returns the field map; the caller (the File Parser) resolves
/// the absolute timestamp and constructs the final [`DataMessage`].
pub fn decode_fields(
    reader: &mut ByteReader,
    definition: &DefinitionMessage,
    unit_policy: UnitPolicy,
) -> Result<FieldMap, FitError> {
    let mut fields = FieldMap::with_capacity(definition.field_definitions.len());
    let mut manufacturer_hint: Option<u32> = None;

    for field_def in &definition.field_definitions {
        let descriptor = catalog::field_descriptor(definition.global_message_number, field_def.field_definition_number);
        if descriptor.is_none() {
            log::warn!(
                "unknown field {} in global message {}",
                field_def.field_definition_number,
                definition.global_message_number
            );
        }

        let fv = field_value::decode_field(
            reader,
            definition.architecture,
            field_def,
            descriptor,
            manufacturer_hint,
            unit_policy,
        )?;

        if fv.name == "manufacturer" {
            manufacturer_hint = fv.raw.as_number().map(|n| n as u32);
        }

        if matches!(descriptor.map(|d| d.kind), Some(FieldKind::ActivityTypeIntensity)) {
            expand_activity_type_intensity(&mut fields, &fv);
            continue;
        }

        // Distinct wire fields never share a name now that uncatalogued
        // fields are keyed by field-definition number, so a plain insert
        // is correct here; `insert_or_sum` is reserved for genuine
        // sub-field expansion below, where the two expanded sub-fields
        // are deliberately merged under one name.
        fields.insert(fv.name.clone(), fv);
    }

    let message_name = catalog::message_name(definition.global_message_number);
    if message_name == "monitoring" {
        apply_monitoring_rewrite(&mut fields);
    }

    Ok(fields)
}

fn expand_activity_type_intensity(fields: &mut FieldMap, packed: &FieldValue) {
    let raw = packed.raw.as_number().unwrap_or(0.0);
    let (activity_type_raw, intensity_raw) = field_value::unpack_activity_type_intensity(raw);
    let activity_type_name = catalog::enum_lookup(catalog::ACTIVITY_TYPE, activity_type_raw)
        .map(|name| name.to_string())
        .unwrap_or_else(|| activity_type_raw.to_string());

    insert_or_sum(
        fields,
        "activity_type".to_string(),
        FieldValue {
            name: "activity_type".to_string(),
            value: Value::Text(activity_type_name),
            raw: Value::Number(activity_type_raw as f64),
            invalid: packed.invalid,
            units: String::new(),
            stats_mode: packed.stats_mode,
        },
    );
    insert_or_sum(
        fields,
        "intensity".to_string(),
        FieldValue {
            name: "intensity".to_string(),
            value: Value::Number(intensity_raw as f64),
            raw: Value::Number(intensity_raw as f64),
            invalid: packed.invalid,
            units: String::new(),
            stats_mode: packed.stats_mode,
        },
    );
}

/// Inserts `value` under `name`; if a field of that name already exists
/// (only possible via sub-field expansion), their numeric values are
/// summed per spec.md §4.I.1.
fn insert_or_sum(fields: &mut FieldMap, name: String, value: FieldValue) {
    match fields.entries.iter_mut().find(|(k, _)| *k == name) {
        Some((_, existing)) => {
            if let (Some(a), Some(b)) = (existing.value.as_number(), value.value.as_number()) {
                existing.value = Value::Number(a + b);
            } else {
                *existing = value;
            }
        }
        None => fields.entries.push((name, value)),
    }
}

fn apply_monitoring_rewrite(fields: &mut FieldMap) {
    let activity_type_name = match fields.get("activity_type") {
        Some(fv) => match &fv.value {
            Value::Text(name) => name.clone(),
            _ => return,
        },
        None => return,
    };

    debug_assert!(
        !REKEY_BY_ACTIVITY_SUFFIX.contains(&"cycles"),
        "cycles and the suffix-rekeyed fields must stay disjoint"
    );

    let (units, factor) = activity_cycle_factor(&activity_type_name);
    let base_name = format!("{activity_type_name}_{units}");
    if let Some(mut cycles) = fields.remove("cycles") {
        if let Some(n) = cycles.value.as_number() {
            cycles.value = Value::Number(n * factor);
        }
        cycles.name = base_name.clone();
        cycles.units = units.to_string();
        fields.insert(base_name, cycles);
    }

    for field_name in REKEY_BY_ACTIVITY_SUFFIX {
        if let Some(mut fv) = fields.remove(*field_name) {
            let new_name = format!("{field_name}_{activity_type_name}");
            fv.name = new_name.clone();
            fields.insert(new_name, fv);
        }
    }
}
