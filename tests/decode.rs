//! Whole-file integration tests, exercising the crate only through its
//! public API (`fit_monitor::decode` and the `FitFile` views).

use fit_monitor::{FitError, UnitPolicy};

fn wrap_payload(payload: &[u8]) -> Vec<u8> {
    let mut data = vec![12u8, 0x10, 0x00, 0x00];
    data.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    data.extend_from_slice(b".FIT");
    data.extend_from_slice(payload);
    data
}

fn file_id_and_monitoring_payload() -> Vec<u8> {
    let mut payload: Vec<u8> = vec![
        // file_id: local slot 0, fields (0=type, enum) and (253=timestamp, uint32).
        0x40, 0x00, 0x00, 0x00, 0x00, 0x02, 0x00, 0x01, 0x00, 253, 4, 0x86, 0x00,
    ];
    payload.push(4u8); // type = activity
    payload.extend_from_slice(&1_000_000u32.to_le_bytes()); // timestamp

    // monitoring: local slot 1, activity_type=running, cycles=150, cum_active_time=42000ms
    payload.extend_from_slice(&[
        0x41, 0x00, 0x00, 55, 0x00, 0x03, 5, 1, 0x00, 3, 2, 0x84, 4, 4, 0x86, 0x01,
    ]);
    payload.push(1u8); // activity_type = running
    payload.extend_from_slice(&150u16.to_le_bytes()); // cycles
    payload.extend_from_slice(&42_000u32.to_le_bytes()); // cum_active_time (ms, scale 1000)

    payload
}

#[test]
fn s1_and_s2_header_validation() {
    let good = wrap_payload(&[]);
    assert!(fit_monitor::decode(&good, UnitPolicy::METRIC).is_ok());

    let mut bad = good.clone();
    bad[8..12].copy_from_slice(b"XXXX");
    assert!(matches!(fit_monitor::decode(&bad, UnitPolicy::METRIC), Err(FitError::BadHeader(_))));
}

#[test]
fn s3_file_id_decodes_through_public_api() {
    let payload: Vec<u8> = vec![
        0x40, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x04,
    ];
    let data = wrap_payload(&payload);
    let file = fit_monitor::decode(&data, UnitPolicy::METRIC).unwrap();
    assert_eq!(file.file_type().as_deref(), Some("activity"));
}

#[test]
fn s5_and_s7_monitoring_rewrite_and_derived_stats_end_to_end() {
    let data = wrap_payload(&file_id_and_monitoring_payload());
    let file = fit_monitor::decode(&data, UnitPolicy::METRIC).unwrap();

    let monitoring = &file.messages("monitoring")[0];
    assert!(monitoring.field("cycles").is_none());
    let steps = monitoring.field("running_steps").unwrap();
    assert_eq!(steps.value, fit_monitor::field_value::Value::Number(300.0));
    assert!(monitoring.field("cum_active_time_running").is_some());

    let day_stats = file.day_stats();
    assert_eq!(day_stats.len(), 1);
    let fields = day_stats.values().next().unwrap();
    let total_steps = fields.get("total_steps").unwrap();
    assert_eq!(total_steps.total, 300.0);
}

#[test]
fn s6_invalid_field_is_excluded_from_day_stats() {
    // monitoring.heart_rate carries STATS_ALL; an all-0xFF byte is its
    // invalid sentinel and must never reach the aggregator.
    let mut payload: Vec<u8> = vec![
        0x40, 0x00, 0x00, 0x00, 0x00, 0x01, 253, 4, 0x86, 0x00,
    ];
    payload.extend_from_slice(&1_000_000u32.to_le_bytes());
    payload.extend_from_slice(&[
        0x41, 0x00, 0x00, 55, 0x00, 0x01, 27, 1, 0x02, 0x01,
    ]);
    payload.push(0xFF); // invalid heart_rate

    let data = wrap_payload(&payload);
    let file = fit_monitor::decode(&data, UnitPolicy::METRIC).unwrap();
    let day_stats = file.day_stats();
    let fields = day_stats.values().next().unwrap();
    assert!(fields.get("heart_rate").is_none());
}

#[test]
fn s7_two_uncatalogued_fields_in_one_message_stay_distinct() {
    // file_id with two fields the catalog has no entry for (90, 91): each
    // must decode under its own unknown_<fdn> name rather than collapsing
    // into a shared "unknown" key and getting summed together.
    let payload: Vec<u8> = vec![
        0x40, 0x00, 0x00, 0x00, 0x00, 0x02, // definition, local slot 0, two fields
        90, 1, 0x02, // field 90, size 1, base uint8
        91, 1, 0x02, // field 91, size 1, base uint8
        0x00, // data header, local slot 0
        10, 20,
    ];
    let data = wrap_payload(&payload);
    let file = fit_monitor::decode(&data, UnitPolicy::METRIC).unwrap();
    let file_id = &file.messages("file_id")[0];
    assert_eq!(file_id.field("unknown_90").unwrap().raw.as_number(), Some(10.0));
    assert_eq!(file_id.field("unknown_91").unwrap().raw.as_number(), Some(20.0));
}

#[test]
fn property1_declared_size_mismatch_is_desynchronized() {
    let payload: Vec<u8> = vec![0x40, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x04];
    let mut data = vec![12u8, 0x10, 0x00, 0x00];
    data.extend_from_slice(&3u32.to_le_bytes());
    data.extend_from_slice(b".FIT");
    data.extend_from_slice(&payload);
    assert!(matches!(
        fit_monitor::decode(&data, UnitPolicy::METRIC),
        Err(FitError::Desynchronized { .. })
    ));
}

#[test]
fn property2_every_base_type_arity_is_byte_length_over_size() {
    // A uint16 array field (byte_length=4 => arity 2) round-trips through
    // the public decode path without error.
    let payload: Vec<u8> = vec![
        0x40, 0x00, 0x00, 0x00, 0x00, 0x01, 0x09, 0x04, 0x84, 0x00, 0x01, 0x00, 0x02, 0x00,
    ];
    let data = wrap_payload(&payload);
    assert!(fit_monitor::decode(&data, UnitPolicy::METRIC).is_ok());
}

#[test]
fn property8_big_endian_architecture_is_honored() {
    let payload: Vec<u8> = vec![
        0x40, 0x00, 0x01, 0x00, 0x00, 0x01, 0x00, 0x02, 0x84, 0x00, 0x00, 0x01,
    ];
    let data = wrap_payload(&payload);
    let file = fit_monitor::decode(&data, UnitPolicy::METRIC).unwrap();
    let file_id = &file.messages("file_id")[0];
    // Big-endian bytes 0x00 0x01 must read back as 1, not 256 (which a
    // little-endian read of the same bytes would produce).
    let type_field = file_id.field("type").unwrap();
    assert_eq!(type_field.raw.as_number(), Some(1.0));
    assert_eq!(type_field.value, fit_monitor::field_value::Value::Text("device".to_string()));
}
