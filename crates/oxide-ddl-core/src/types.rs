//! Type declaration synthesis.
//!
//! The catalog stores column and parameter types as low-level numeric codes
//! (`RDB$FIELD_TYPE`) plus a handful of modifiers. This module turns such a
//! descriptor back into the SQL text that would have declared it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Base type codes known to the resolver.
///
/// Anything else decodes to [`FieldType::Unknown`] and still renders, so an
/// unexpected catalog type never aborts an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// 16-bit integer, or `NUMERIC(4, n)` when scaled.
    Short,
    /// 32-bit integer, or `NUMERIC(9, n)` when scaled.
    Long,
    /// 64-bit integer, or `NUMERIC(18, n)` when scaled.
    Int64,
    /// Single precision float.
    Float,
    /// Double precision float.
    Double,
    /// Date only.
    Date,
    /// Time only.
    Time,
    /// Date and time.
    Timestamp,
    /// Fixed-width character string.
    Char,
    /// Variable-width character string.
    Varchar,
    /// Large object; the subtype tells text from binary.
    Blob,
    /// A code this resolver does not know.
    Unknown(i32),
}

impl FieldType {
    /// Decodes a raw `RDB$FIELD_TYPE` value.
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        match code {
            7 => Self::Short,
            8 => Self::Long,
            16 => Self::Int64,
            10 => Self::Float,
            27 => Self::Double,
            12 => Self::Date,
            13 => Self::Time,
            35 => Self::Timestamp,
            14 => Self::Char,
            37 => Self::Varchar,
            261 => Self::Blob,
            other => Self::Unknown(other),
        }
    }

    /// Returns the raw catalog code.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Short => 7,
            Self::Long => 8,
            Self::Int64 => 16,
            Self::Float => 10,
            Self::Double => 27,
            Self::Date => 12,
            Self::Time => 13,
            Self::Timestamp => 35,
            Self::Char => 14,
            Self::Varchar => 37,
            Self::Blob => 261,
            Self::Unknown(code) => code,
        }
    }

    /// Total digits used when an integer code carries a negative scale.
    const fn fixed_point_precision(self) -> Option<u8> {
        match self {
            Self::Short => Some(4),
            Self::Long => Some(9),
            Self::Int64 => Some(18),
            _ => None,
        }
    }
}

/// Blob subtype holding text.
pub const BLOB_SUB_TYPE_TEXT: i32 = 1;

/// The tuple of catalog values a type declaration is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeDescriptor {
    /// Raw `RDB$FIELD_TYPE`.
    pub type_code: i32,
    /// Raw `RDB$FIELD_SUB_TYPE`.
    pub sub_type: i32,
    /// Raw `RDB$FIELD_LENGTH` in bytes.
    pub length: i32,
    /// Raw `RDB$FIELD_SCALE`; negative for fixed-point decimals.
    pub scale: i32,
    /// Raw `RDB$CHARACTER_LENGTH` for character types.
    pub char_length: i32,
}

impl TypeDescriptor {
    /// Creates a descriptor from the raw catalog values.
    #[must_use]
    pub const fn new(type_code: i32, sub_type: i32, length: i32, scale: i32, char_length: i32) -> Self {
        Self {
            type_code,
            sub_type,
            length,
            scale,
            char_length,
        }
    }

    /// Returns the decoded base type.
    #[must_use]
    pub const fn field_type(&self) -> FieldType {
        FieldType::from_code(self.type_code)
    }

    /// Renders the SQL type declaration, e.g. `VARCHAR(40)` or `NUMERIC(18,2)`.
    #[must_use]
    pub fn declaration(&self) -> String {
        declare(
            self.type_code,
            self.sub_type,
            self.length,
            self.scale,
            self.char_length,
        )
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.declaration())
    }
}

/// Maps a catalog type descriptor to its SQL declaration.
///
/// Total over all inputs: unrecognised codes come back as
/// `UNKNOWN_TYPE_<code>`. The byte length is accepted for completeness but
/// none of the known types need it.
#[must_use]
pub fn declare(type_code: i32, sub_type: i32, _length: i32, scale: i32, char_length: i32) -> String {
    let field_type = FieldType::from_code(type_code);
    match field_type {
        FieldType::Short | FieldType::Long | FieldType::Int64 if scale < 0 => {
            let precision = field_type.fixed_point_precision().unwrap_or_default();
            format!("NUMERIC({},{})", precision, scale.unsigned_abs())
        }
        FieldType::Short => "SMALLINT".to_string(),
        FieldType::Long => "INTEGER".to_string(),
        FieldType::Int64 => "BIGINT".to_string(),
        FieldType::Float => "FLOAT".to_string(),
        FieldType::Double => "DOUBLE PRECISION".to_string(),
        FieldType::Date => "DATE".to_string(),
        FieldType::Time => "TIME".to_string(),
        FieldType::Timestamp => "TIMESTAMP".to_string(),
        FieldType::Char => format!("CHAR({char_length})"),
        FieldType::Varchar => format!("VARCHAR({char_length})"),
        FieldType::Blob if sub_type == BLOB_SUB_TYPE_TEXT => "BLOB SUB_TYPE TEXT".to_string(),
        FieldType::Blob => "BLOB".to_string(),
        FieldType::Unknown(code) => format!("UNKNOWN_TYPE_{code}"),
    }
}
