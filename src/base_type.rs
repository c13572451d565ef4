//! The FIT base type table (spec.md §3, §6).
//!
//! Grounded in `examples/vililahtevanoja-fit-parser/parser/src/fit_records.rs`'s
//! `BaseType` enum and `get_base_type_info`, generalized to carry the
//! invalid sentinel as the correct bit width per type (the teacher's
//! `u64`-everywhere sentinel loses the float32 bit pattern; this table
//! keeps sentinels as raw `u64` but documents, per base type, how they are
//! reinterpreted — see [`BaseType::invalid_raw`]).

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::error::FitError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum BaseType {
    Enum = 0x00,
    Sint8 = 0x01,
    Uint8 = 0x02,
    String = 0x07,
    Uint8z = 0x0A,
    Byte = 0x0D,
    Sint16 = 0x83,
    Uint16 = 0x84,
    Sint32 = 0x85,
    Uint32 = 0x86,
    Float32 = 0x88,
    Float64 = 0x89,
    Uint16z = 0x8B,
    Uint32z = 0x8C,
    Sint64 = 0x8E,
    Uint64 = 0x8F,
    Uint64z = 0x90,
}

impl BaseType {
    pub fn from_byte(byte: u8) -> Result<Self, FitError> {
        BaseType::try_from_primitive(byte).map_err(|_| FitError::UnknownBaseType(byte))
    }

    /// Wire size in bytes of a single element of this base type.
    pub fn size(self) -> u8 {
        match self {
            BaseType::Enum
            | BaseType::Sint8
            | BaseType::Uint8
            | BaseType::String
            | BaseType::Uint8z
            | BaseType::Byte => 1,
            BaseType::Sint16 | BaseType::Uint16 | BaseType::Uint16z => 2,
            BaseType::Sint32 | BaseType::Uint32 | BaseType::Uint32z | BaseType::Float32 => 4,
            BaseType::Sint64 | BaseType::Uint64 | BaseType::Uint64z | BaseType::Float64 => 8,
        }
    }

    /// Whether multi-byte reads of this type respect the definition
    /// message's declared architecture (spec.md §3).
    pub fn endian_sensitive(self) -> bool {
        self.size() > 1
    }

    pub fn is_signed(self) -> bool {
        matches!(self, BaseType::Sint8 | BaseType::Sint16 | BaseType::Sint32 | BaseType::Sint64)
    }

    /// The invalid sentinel for this base type, as a raw bit pattern
    /// occupying the type's low `size()` bytes. z-variants use zero; all
    /// others use all-ones (spec.md §3, §9 — later float32 table: invalid
    /// is the all-ones bit pattern, not a particular NaN encoding).
    pub fn invalid_raw(self) -> u64 {
        match self {
            BaseType::Uint8z | BaseType::Uint16z | BaseType::Uint32z | BaseType::Uint64z => 0,
            BaseType::String => 0,
            BaseType::Sint8 => 0x7F,
            BaseType::Uint8 | BaseType::Enum | BaseType::Byte => 0xFF,
            BaseType::Sint16 => 0x7FFF,
            BaseType::Uint16 => 0xFFFF,
            BaseType::Sint32 => 0x7FFF_FFFF,
            BaseType::Uint32 => 0xFFFF_FFFF,
            BaseType::Float32 => 0xFFFF_FFFF,
            BaseType::Sint64 => 0x7FFF_FFFF_FFFF_FFFF,
            BaseType::Uint64 | BaseType::Float64 => 0xFFFF_FFFF_FFFF_FFFF,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BaseType::Enum => "enum",
            BaseType::Sint8 => "sint8",
            BaseType::Uint8 => "uint8",
            BaseType::String => "string",
            BaseType::Uint8z => "uint8z",
            BaseType::Byte => "byte",
            BaseType::Sint16 => "sint16",
            BaseType::Uint16 => "uint16",
            BaseType::Sint32 => "sint32",
            BaseType::Uint32 => "uint32",
            BaseType::Float32 => "float32",
            BaseType::Float64 => "float64",
            BaseType::Uint16z => "uint16z",
            BaseType::Uint32z => "uint32z",
            BaseType::Sint64 => "sint64",
            BaseType::Uint64 => "uint64",
            BaseType::Uint64z => "uint64z",
        }
    }
}
