use thiserror::Error;

/// Errors surfaced while decoding a FIT byte stream.
///
/// Enum-lookup misses are deliberately absent from this type: spec.md §7
/// treats an unknown enum value as non-fatal, so it never becomes an `Err`
/// — the raw value is retained on the [`crate::field_value::FieldValue`]
/// instead.
#[derive(Error, Debug)]
pub enum FitError {
    #[error("bad file header: {0}")]
    BadHeader(String),

    #[error("truncated: needed {needed} bytes, had {available}")]
    Truncated { needed: usize, available: usize },

    #[error("desynchronized: consumed {consumed} bytes against declared data_size {declared}")]
    Desynchronized { consumed: u32, declared: u32 },

    #[error("data record referenced unbound local message slot {0}")]
    UnknownLocalSlot(u8),

    #[error("bad field definition: size {size} not a multiple of base type size {base_size}")]
    BadFieldDef { size: u8, base_size: u8 },

    #[error("unknown base type byte 0x{0:02X}")]
    UnknownBaseType(u8),

    #[error("global message number {0} out of bounds (must be <= 0xFFFE)")]
    BadGlobalMessage(u32),

    #[error("{message} (record #{index}): {source}")]
    Decode {
        index: u32,
        message: String,
        #[source]
        source: Box<FitError>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FitError>;
