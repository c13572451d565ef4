//! The File Parser (spec.md §4.J): drives the record loop, maintains the
//! local-slot table, and reconstructs absolute timestamps.
//!
//! Grounded in `examples/vililahtevanoja-fit-parser`'s `main` (read the
//! whole file into memory, then walk it with a byte offset) generalized
//! into a proper loop over [`RecordHeader`]s, and in
//! `examples/original_source/Fit/DefinitionMessage.py`'s `TimeSField`
//! (`timestamp_16` rollover against `matched_timestamp_16`).

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};

use crate::byte_reader::ByteReader;
use crate::catalog;
use crate::definition::DefinitionMessage;
use crate::error::FitError;
use crate::field_value;
use crate::header::FileHeader;
use crate::message::{self, DataMessage, FieldMap};
use crate::record_header::RecordHeader;
use crate::stats::DayStats;
use crate::units::UnitPolicy;

/// A fully decoded FIT file: every data message, indexed by name, plus the
/// per-day/per-device statistics accumulated while parsing (spec.md §4.J,
/// §4.K). Exposed to callers through the views in `crate::output`.
#[derive(Debug)]
pub struct FitFile {
    pub(crate) header: FileHeader,
    pub(crate) messages_by_name: HashMap<&'static str, Vec<DataMessage>>,
    pub(crate) day_stats: HashMap<NaiveDate, HashMap<Option<u32>, DayStats>>,
}

struct ParseState {
    slots: [Option<DefinitionMessage>; 16],
    last_full_timestamp: Option<f64>,
    last_ts16: u16,
    matched_ts16: u16,
    current_device_serial: Option<u32>,
}

impl Default for ParseState {
    fn default() -> Self {
        ParseState {
            slots: Default::default(),
            last_full_timestamp: None,
            last_ts16: 0,
            matched_ts16: 0,
            current_device_serial: None,
        }
    }
}

fn wrap(index: u32, message: &str, source: FitError) -> FitError {
    FitError::Decode {
        index,
        message: message.to_string(),
        source: Box::new(source),
    }
}

/// Resolves the absolute timestamp of a just-decoded data message
/// (spec.md §4.J step 4). `compressed_offset` is `Some` only when the
/// record header carried a compressed-timestamp time offset.
fn resolve_timestamp(
    fields: &FieldMap,
    compressed_offset: Option<u8>,
    state: &mut ParseState,
) -> Option<DateTime<Utc>> {
    let mut resolved_seconds = state.last_full_timestamp;

    if let Some(fv) = fields.get("timestamp") {
        if let Some(seconds) = fv.raw.as_number() {
            state.last_full_timestamp = Some(seconds);
            state.matched_ts16 = state.last_ts16;
            resolved_seconds = Some(seconds);
        }
    } else if let Some(fv) = fields.get("timestamp_16") {
        if let (Some(full), Some(ts16_raw)) = (state.last_full_timestamp, fv.raw.as_number()) {
            let ts16 = ts16_raw as u16;
            let delta = ts16.wrapping_sub(state.matched_ts16);
            resolved_seconds = Some(full + delta as f64);
            state.last_ts16 = ts16;
        }
    }

    if let Some(time_offset) = compressed_offset {
        if let Some(full) = state.last_full_timestamp {
            let low5 = (full as i64 & 0x1F) as u8;
            let delta = time_offset.wrapping_sub(low5) & 0x1F;
            resolved_seconds = Some(full + delta as f64);
        }
    }

    resolved_seconds.and_then(field_value::fit_seconds_to_datetime)
}

fn finalize_message(
    file: &mut FitFile,
    state: &mut ParseState,
    global_message_number: u16,
    fields: FieldMap,
    compressed_offset: Option<u8>,
) {
    let message_name = catalog::message_name(global_message_number);
    let timestamp = resolve_timestamp(&fields, compressed_offset, state);

    if message_name == "device_info" {
        if let Some(serial) = fields.get("serial_number").and_then(|fv| fv.raw.as_number()) {
            state.current_device_serial = Some(serial as u32);
        }
    }

    if let Some(ts) = timestamp {
        let day = ts.date_naive();
        let bucket = file
            .day_stats
            .entry(day)
            .or_default()
            .entry(state.current_device_serial)
            .or_default();
        for fv in fields.values() {
            if fv.stats_mode.is_none() || fv.invalid {
                continue;
            }
            if let Some(n) = fv.value.as_number() {
                bucket.accumulate(&fv.name, fv.stats_mode, n);
            }
        }
    }

    let data_message = DataMessage::new(global_message_number, fields, timestamp);
    file.messages_by_name.entry(message_name).or_default().push(data_message);
}

/// Parses a complete FIT byte stream (spec.md §4.J). `unit_policy`
/// controls the `english_units` conversion the Data Field Decoder applies.
pub fn parse(data: &[u8], unit_policy: UnitPolicy) -> Result<FitFile, FitError> {
    let (header, payload_offset) = FileHeader::parse(data)?;
    let mut reader = ByteReader::new(&data[payload_offset..]);

    let mut file = FitFile {
        header: header.clone(),
        messages_by_name: HashMap::new(),
        day_stats: HashMap::new(),
    };
    let mut state = ParseState::default();

    let mut record_index: u32 = 0;
    let mut consumed_total: i64 = 0;
    let declared = header.data_size as i64;

    while consumed_total < declared {
        let record_start = reader.position();
        let header_byte = reader.read_u8()?;
        let record_header = RecordHeader::parse(header_byte);
        log::trace!("record #{record_index}: local_slot={} kind={:?}", record_header.local_slot(), record_header);

        match record_header {
            RecordHeader::Definition { local_slot, has_developer_fields } => {
                let definition = DefinitionMessage::parse(&mut reader, has_developer_fields)
                    .map_err(|e| wrap(record_index, "definition", e))?;
                state.slots[local_slot as usize] = Some(definition);
            }
            RecordHeader::Data { local_slot } => {
                let definition = state.slots[local_slot as usize]
                    .as_ref()
                    .ok_or(FitError::UnknownLocalSlot(local_slot))?;
                let global_message_number = definition.global_message_number;
                let message_name = catalog::message_name(global_message_number);
                let fields = message::decode_fields(&mut reader, definition, unit_policy)
                    .map_err(|e| wrap(record_index, message_name, e))?;
                finalize_message(&mut file, &mut state, global_message_number, fields, None);
            }
            RecordHeader::CompressedTimestampData { local_slot, time_offset } => {
                let definition = state.slots[local_slot as usize]
                    .as_ref()
                    .ok_or(FitError::UnknownLocalSlot(local_slot))?;
                let global_message_number = definition.global_message_number;
                let message_name = catalog::message_name(global_message_number);
                let fields = message::decode_fields(&mut reader, definition, unit_policy)
                    .map_err(|e| wrap(record_index, message_name, e))?;
                finalize_message(&mut file, &mut state, global_message_number, fields, Some(time_offset));
            }
        }

        let consumed = (reader.position() - record_start) as i64;
        consumed_total += consumed;
        record_index += 1;

        if consumed_total > declared {
            return Err(FitError::Desynchronized {
                consumed: consumed_total as u32,
                declared: header.data_size,
            });
        }
    }

    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap_payload(payload: &[u8]) -> Vec<u8> {
        let mut data = vec![12u8, 0x10, 0x00, 0x00];
        data.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        data.extend_from_slice(b".FIT");
        data.extend_from_slice(payload);
        data
    }

    #[test]
    fn s3_single_definition_and_data_record_decodes_file_id() {
        let payload: Vec<u8> = vec![
            0x40, // definition header, local slot 0
            0x00, 0x00, // reserved, architecture little
            0x00, 0x00, // global message number 0 (file_id)
            0x01, // one field
            0x00, 0x01, 0x00, // field 0 (type), size 1, base enum
            0x00, // data header, local slot 0
            0x04, // type = activity
        ];
        let data = wrap_payload(&payload);
        let file = parse(&data, UnitPolicy::METRIC).unwrap();
        let messages = file.messages_by_name.get("file_id").unwrap();
        assert_eq!(messages.len(), 1);
        let type_field = messages[0].field("type").unwrap();
        assert_eq!(type_field.value, crate::field_value::Value::Text("activity".to_string()));
    }

    #[test]
    fn unbound_local_slot_is_an_error() {
        let payload: Vec<u8> = vec![0x00, 0x04];
        let data = wrap_payload(&payload);
        let err = parse(&data, UnitPolicy::METRIC).unwrap_err();
        assert!(matches!(err, FitError::UnknownLocalSlot(0)));
    }

    #[test]
    fn s4_timestamp_16_rollover_adds_delta_seconds() {
        // slot 0: file_id-shaped message with a reserved timestamp field,
        // to plant a full timestamp.
        let mut payload: Vec<u8> = vec![
            0x40, // definition, local slot 0
            0x00, 0x00, // reserved, architecture little
            0x00, 0x00, // global message number 0 (file_id)
            0x01, // one field
            253, 4, 0x86, // field 253 (timestamp), size 4, base uint32
            0x00, // data header, local slot 0
        ];
        payload.extend_from_slice(&1000u32.to_le_bytes());

        // slot 1: monitoring-shaped message carrying only timestamp_16.
        payload.extend_from_slice(&[
            0x41, // definition, local slot 1
            0x00, 0x00, // reserved, architecture little
            55, 0, // global message number 55 (monitoring)
            0x01, // one field
            26, 2, 0x84, // field 26 (timestamp_16), size 2, base uint16
            0x01, // data header, local slot 1
        ]);
        payload.extend_from_slice(&1003u16.to_le_bytes());

        let data = wrap_payload(&payload);
        let file = parse(&data, UnitPolicy::METRIC).unwrap();
        let monitoring = &file.messages_by_name.get("monitoring").unwrap()[0];
        // matched_ts16 was latched to last_ts16 (0) when the full timestamp
        // (1000) was recorded, so delta = (1003 - 0) mod 2^16 = 1003.
        let expected = field_value::fit_seconds_to_datetime(2003.0).unwrap();
        assert_eq!(monitoring.timestamp, Some(expected));
    }

    #[test]
    fn desynchronized_when_declared_size_is_too_small() {
        let payload: Vec<u8> = vec![0x40, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x04];
        let mut data = vec![12u8, 0x10, 0x00, 0x00];
        data.extend_from_slice(&2u32.to_le_bytes()); // declared way too short
        data.extend_from_slice(b".FIT");
        data.extend_from_slice(&payload);
        let err = parse(&data, UnitPolicy::METRIC).unwrap_err();
        assert!(matches!(err, FitError::Desynchronized { .. }));
    }
}
