//! Definition Message parsing (spec.md §4.F).
//!
//! Grounded in `examples/vililahtevanoja-fit-parser`'s
//! `parse_definition_record`: reserved byte, architecture byte, global
//! message number, field count, then that many field definitions.
//! Developer field definitions are parsed and kept (spec.md §4.F: "MAY be
//! present... must be skipped safely") but this crate does not interpret
//! them semantically — they carry no catalog entry.

use crate::byte_reader::{ByteReader, Endianness};
use crate::error::FitError;
use crate::field_def::FieldDefinition;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeveloperFieldDefinition {
    pub field_number: u8,
    pub byte_length: u8,
    pub developer_data_index: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionMessage {
    pub architecture: Endianness,
    pub global_message_number: u16,
    pub field_definitions: Vec<FieldDefinition>,
    pub developer_field_definitions: Vec<DeveloperFieldDefinition>,
}

impl DefinitionMessage {
    /// Parses a definition record's body (the record header has already
    /// been consumed). Returns the message and the number of bytes read.
    pub fn parse(reader: &mut ByteReader, has_developer_fields: bool) -> Result<DefinitionMessage, FitError> {
        let start = reader.position();
        let _reserved = reader.read_u8()?;
        let architecture = Endianness::from_architecture_byte(reader.read_u8()?);
        let global_message_number = reader.read_u16(architecture)?;
        if global_message_number as u32 > 0xFFFE {
            return Err(FitError::BadGlobalMessage(global_message_number as u32));
        }
        let field_count = reader.read_u8()?;

        let mut field_definitions = Vec::with_capacity(field_count as usize);
        for _ in 0..field_count {
            let field_definition_number = reader.read_u8()?;
            let byte_length = reader.read_u8()?;
            let base_type_byte = reader.read_u8()?;
            field_definitions.push(FieldDefinition::parse(
                field_definition_number,
                byte_length,
                base_type_byte,
            )?);
        }

        let mut developer_field_definitions = Vec::new();
        if has_developer_fields {
            let developer_field_count = reader.read_u8()?;
            for _ in 0..developer_field_count {
                developer_field_definitions.push(DeveloperFieldDefinition {
                    field_number: reader.read_u8()?,
                    byte_length: reader.read_u8()?,
                    developer_data_index: reader.read_u8()?,
                });
            }
        }

        log::debug!(
            "definition bound: global_message_number={} fields={} architecture={:?} consumed={}",
            global_message_number,
            field_definitions.len(),
            architecture,
            reader.position() - start
        );

        Ok(DefinitionMessage {
            architecture,
            global_message_number,
            field_definitions,
            developer_field_definitions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base_type::BaseType;

    #[test]
    fn parses_definition_with_two_fields() {
        let data: Vec<u8> = vec![
            0x00, 0x01, // reserved, architecture (big endian)
            0x0A, 0x0B, // global message number
            0x02, // num fields
            0x01, 0x01, BaseType::Uint8 as u8,
            0x02, 0x04, BaseType::Uint16 as u8,
        ];
        let mut reader = ByteReader::new(&data);
        let def = DefinitionMessage::parse(&mut reader, false).unwrap();
        assert_eq!(def.architecture, Endianness::Big);
        assert_eq!(def.global_message_number, 0x0A0B);
        assert_eq!(def.field_definitions.len(), 2);
        assert_eq!(reader.position(), data.len());
    }

    #[test]
    fn parses_definition_with_developer_fields() {
        let data: Vec<u8> = vec![
            0x00, 0x00, // reserved, architecture (little endian)
            0x0B, 0x0A, // global message number (LE => 0x0A0B)
            0x01, // num fields
            0x01, 0x01, BaseType::Uint8 as u8,
            0x01, // num dev fields
            0x05, 0x02, 0x00,
        ];
        let mut reader = ByteReader::new(&data);
        let def = DefinitionMessage::parse(&mut reader, true).unwrap();
        assert_eq!(def.global_message_number, 0x0A0B);
        assert_eq!(def.developer_field_definitions.len(), 1);
        assert_eq!(reader.position(), data.len());
    }

    #[test]
    fn global_message_number_out_of_range_errors() {
        let data: Vec<u8> = vec![0x00, 0x00, 0xFF, 0xFF, 0x00];
        let mut reader = ByteReader::new(&data);
        assert!(matches!(
            DefinitionMessage::parse(&mut reader, false),
            Err(FitError::BadGlobalMessage(_))
        ));
    }
}
