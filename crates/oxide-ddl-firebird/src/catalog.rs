//! Catalog queries against the `RDB$` system tables.
//!
//! Each query has a raw row type mirroring its select list, decoded from the
//! driver row and then turned into the core descriptors. Identifiers come
//! back blank-padded (`CHAR(63)`), so names are trimmed on the way out.

use oxide_ddl_core::catalog::{
    ColumnDescriptor, DomainDescriptor, ParameterDescriptor, ParameterDirection, RoutineDescriptor,
};
use oxide_ddl_core::TypeDescriptor;
use rsfbclient::{FbError, Row};

/// User-defined domains.
pub const DOMAINS_SQL: &str = r"
SELECT
    f.RDB$FIELD_NAME,
    f.RDB$FIELD_TYPE,
    f.RDB$FIELD_SUB_TYPE,
    f.RDB$FIELD_LENGTH,
    f.RDB$FIELD_SCALE,
    f.RDB$CHARACTER_LENGTH,
    f.RDB$DEFAULT_SOURCE,
    f.RDB$NULL_FLAG,
    f.RDB$VALIDATION_SOURCE
FROM RDB$FIELDS f
WHERE f.RDB$SYSTEM_FLAG = 0 AND f.RDB$FIELD_NAME NOT LIKE 'RDB$%'
ORDER BY f.RDB$FIELD_NAME";

/// Columns of user tables (views excluded).
pub const TABLE_COLUMNS_SQL: &str = r"
SELECT
    r.RDB$RELATION_NAME,
    s.RDB$FIELD_NAME,
    s.RDB$FIELD_POSITION,
    s.RDB$NULL_FLAG,
    s.RDB$DEFAULT_SOURCE,
    f.RDB$FIELD_LENGTH,
    f.RDB$FIELD_SCALE,
    f.RDB$FIELD_TYPE,
    f.RDB$FIELD_SUB_TYPE,
    f.RDB$CHARACTER_LENGTH,
    f.RDB$FIELD_NAME
FROM RDB$RELATIONS r
JOIN RDB$RELATION_FIELDS s ON r.RDB$RELATION_NAME = s.RDB$RELATION_NAME
JOIN RDB$FIELDS f ON s.RDB$FIELD_SOURCE = f.RDB$FIELD_NAME
WHERE r.RDB$SYSTEM_FLAG = 0 AND r.RDB$VIEW_BLR IS NULL
ORDER BY r.RDB$RELATION_NAME, s.RDB$FIELD_POSITION";

/// Stored procedures.
pub const ROUTINES_SQL: &str = r"
SELECT
    p.RDB$PROCEDURE_NAME,
    p.RDB$PROCEDURE_SOURCE
FROM RDB$PROCEDURES p
WHERE p.RDB$SYSTEM_FLAG = 0
ORDER BY p.RDB$PROCEDURE_NAME";

/// Parameters of one procedure; binds the procedure name.
pub const ROUTINE_PARAMETERS_SQL: &str = r"
SELECT
    p.RDB$PARAMETER_NAME,
    p.RDB$PARAMETER_TYPE,
    p.RDB$PARAMETER_NUMBER,
    f.RDB$FIELD_NAME,
    f.RDB$FIELD_TYPE,
    f.RDB$FIELD_SUB_TYPE,
    f.RDB$FIELD_LENGTH,
    f.RDB$CHARACTER_LENGTH,
    f.RDB$FIELD_SCALE
FROM RDB$PROCEDURE_PARAMETERS p
JOIN RDB$FIELDS f ON p.RDB$FIELD_SOURCE = f.RDB$FIELD_NAME
WHERE p.RDB$PROCEDURE_NAME = ?
ORDER BY p.RDB$PARAMETER_TYPE, p.RDB$PARAMETER_NUMBER";

/// Narrows a nullable catalog integer; NULL reads as 0.
fn int(value: Option<i64>) -> i32 {
    value.and_then(|v| i32::try_from(v).ok()).unwrap_or_default()
}

fn name(value: &str) -> String {
    value.trim().to_string()
}

fn source(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// `RDB$NULL_FLAG` is 1 for `NOT NULL`, NULL or 0 otherwise.
fn not_null(flag: Option<i64>) -> bool {
    flag == Some(1)
}

/// One row of [`DOMAINS_SQL`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainRow {
    /// `RDB$FIELD_NAME`, blank-padded.
    pub name: String,
    /// `RDB$FIELD_TYPE`.
    pub field_type: Option<i64>,
    /// `RDB$FIELD_SUB_TYPE`.
    pub sub_type: Option<i64>,
    /// `RDB$FIELD_LENGTH` in bytes.
    pub length: Option<i64>,
    /// `RDB$FIELD_SCALE`, negative for fixed point.
    pub scale: Option<i64>,
    /// `RDB$CHARACTER_LENGTH`.
    pub char_length: Option<i64>,
    /// `RDB$DEFAULT_SOURCE`.
    pub default_source: Option<String>,
    /// `RDB$NULL_FLAG`.
    pub null_flag: Option<i64>,
    /// `RDB$VALIDATION_SOURCE`.
    pub validation_source: Option<String>,
}

impl DomainRow {
    /// Decodes a driver row.
    ///
    /// # Errors
    ///
    /// Fails when a column has an unexpected type.
    pub fn from_row(row: &Row) -> Result<Self, FbError> {
        Ok(Self {
            name: row.get(0)?,
            field_type: row.get(1)?,
            sub_type: row.get(2)?,
            length: row.get(3)?,
            scale: row.get(4)?,
            char_length: row.get(5)?,
            default_source: row.get(6)?,
            null_flag: row.get(7)?,
            validation_source: row.get(8)?,
        })
    }

    /// Converts to the core descriptor.
    #[must_use]
    pub fn into_descriptor(self) -> DomainDescriptor {
        DomainDescriptor {
            name: name(&self.name),
            field_type: TypeDescriptor::new(
                int(self.field_type),
                int(self.sub_type),
                int(self.length),
                int(self.scale),
                int(self.char_length),
            ),
            default_source: source(self.default_source),
            not_null: not_null(self.null_flag),
            validation_source: source(self.validation_source),
        }
    }
}

/// One row of [`TABLE_COLUMNS_SQL`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnRow {
    /// `RDB$RELATION_NAME`.
    pub table_name: String,
    /// `RDB$FIELD_NAME` of the relation field.
    pub column_name: String,
    /// `RDB$FIELD_POSITION`.
    pub position: Option<i64>,
    /// `RDB$NULL_FLAG` of the relation field.
    pub null_flag: Option<i64>,
    /// `RDB$DEFAULT_SOURCE` of the relation field.
    pub default_source: Option<String>,
    /// `RDB$FIELD_LENGTH` of the backing domain.
    pub length: Option<i64>,
    /// `RDB$FIELD_SCALE` of the backing domain.
    pub scale: Option<i64>,
    /// `RDB$FIELD_TYPE` of the backing domain.
    pub field_type: Option<i64>,
    /// `RDB$FIELD_SUB_TYPE` of the backing domain.
    pub sub_type: Option<i64>,
    /// `RDB$CHARACTER_LENGTH` of the backing domain.
    pub char_length: Option<i64>,
    /// Backing domain name.
    pub domain_name: Option<String>,
}

impl ColumnRow {
    /// Decodes a driver row.
    ///
    /// # Errors
    ///
    /// Fails when a column has an unexpected type.
    pub fn from_row(row: &Row) -> Result<Self, FbError> {
        Ok(Self {
            table_name: row.get(0)?,
            column_name: row.get(1)?,
            position: row.get(2)?,
            null_flag: row.get(3)?,
            default_source: row.get(4)?,
            length: row.get(5)?,
            scale: row.get(6)?,
            field_type: row.get(7)?,
            sub_type: row.get(8)?,
            char_length: row.get(9)?,
            domain_name: row.get(10)?,
        })
    }

    /// Converts to the core descriptor.
    #[must_use]
    pub fn into_descriptor(self) -> ColumnDescriptor {
        ColumnDescriptor {
            table_name: name(&self.table_name),
            column_name: name(&self.column_name),
            position: int(self.position),
            not_null: not_null(self.null_flag),
            default_source: source(self.default_source),
            field_type: TypeDescriptor::new(
                int(self.field_type),
                int(self.sub_type),
                int(self.length),
                int(self.scale),
                int(self.char_length),
            ),
            domain_name: self.domain_name.map(|d| name(&d)).filter(|d| !d.is_empty()),
        }
    }
}

/// One row of [`ROUTINES_SQL`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutineRow {
    /// `RDB$PROCEDURE_NAME`.
    pub name: String,
    /// `RDB$PROCEDURE_SOURCE`, the body.
    pub source: Option<String>,
}

impl RoutineRow {
    /// Decodes a driver row.
    ///
    /// # Errors
    ///
    /// Fails when a column has an unexpected type.
    pub fn from_row(row: &Row) -> Result<Self, FbError> {
        Ok(Self {
            name: row.get(0)?,
            source: row.get(1)?,
        })
    }

    /// Converts to the core descriptor. The body is kept verbatim.
    #[must_use]
    pub fn into_descriptor(self) -> RoutineDescriptor {
        RoutineDescriptor::new(name(&self.name), self.source)
    }
}

/// One row of [`ROUTINE_PARAMETERS_SQL`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterRow {
    /// `RDB$PARAMETER_NAME`.
    pub name: String,
    /// `RDB$PARAMETER_TYPE`: 0 input, 1 output.
    pub direction: Option<i64>,
    /// `RDB$PARAMETER_NUMBER`.
    pub number: Option<i64>,
    /// Backing domain name.
    pub domain_name: String,
    /// `RDB$FIELD_TYPE`.
    pub field_type: Option<i64>,
    /// `RDB$FIELD_SUB_TYPE`.
    pub sub_type: Option<i64>,
    /// `RDB$FIELD_LENGTH`.
    pub length: Option<i64>,
    /// `RDB$CHARACTER_LENGTH`.
    pub char_length: Option<i64>,
    /// `RDB$FIELD_SCALE`.
    pub scale: Option<i64>,
}

impl ParameterRow {
    /// Decodes a driver row.
    ///
    /// # Errors
    ///
    /// Fails when a column has an unexpected type.
    pub fn from_row(row: &Row) -> Result<Self, FbError> {
        Ok(Self {
            name: row.get(0)?,
            direction: row.get(1)?,
            number: row.get(2)?,
            domain_name: row.get(3)?,
            field_type: row.get(4)?,
            sub_type: row.get(5)?,
            length: row.get(6)?,
            char_length: row.get(7)?,
            scale: row.get(8)?,
        })
    }

    /// Converts to the core descriptor.
    #[must_use]
    pub fn into_descriptor(self) -> ParameterDescriptor {
        ParameterDescriptor {
            name: name(&self.name),
            direction: ParameterDirection::from_code(int(self.direction)),
            number: int(self.number),
            domain_name: name(&self.domain_name),
            field_type: TypeDescriptor::new(
                int(self.field_type),
                int(self.sub_type),
                int(self.length),
                int(self.scale),
                int(self.char_length),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_row_trims_and_decodes() {
        let row = DomainRow {
            name: "D_PRICE                    ".into(),
            field_type: Some(16),
            sub_type: Some(1),
            length: Some(8),
            scale: Some(-2),
            char_length: None,
            default_source: Some("DEFAULT 0 ".into()),
            null_flag: Some(1),
            validation_source: Some("  ".into()),
        };
        let domain = row.into_descriptor();
        assert_eq!(domain.name, "D_PRICE");
        assert_eq!(domain.field_type.declaration(), "NUMERIC(18,2)");
        assert_eq!(domain.default_source.as_deref(), Some("DEFAULT 0"));
        assert!(domain.not_null);
        assert_eq!(domain.validation_source, None);
    }

    #[test]
    fn test_null_flag_values() {
        assert!(not_null(Some(1)));
        assert!(!not_null(Some(0)));
        assert!(!not_null(None));
    }

    #[test]
    fn test_column_row_keeps_system_domain() {
        let row = ColumnRow {
            table_name: "ORDERS  ".into(),
            column_name: "NOTE  ".into(),
            position: Some(3),
            field_type: Some(37),
            char_length: Some(80),
            domain_name: Some("RDB$55   ".into()),
            ..ColumnRow::default()
        };
        let column = row.into_descriptor();
        assert_eq!(column.table_name, "ORDERS");
        assert_eq!(column.position, 3);
        assert_eq!(column.domain_name.as_deref(), Some("RDB$55"));
        assert_eq!(column.type_text(), "VARCHAR(80)");
        assert!(!column.not_null);
    }

    #[test]
    fn test_parameter_row_direction() {
        let row = ParameterRow {
            name: "RESULT ".into(),
            direction: Some(1),
            number: Some(0),
            domain_name: "D_COUNT ".into(),
            field_type: Some(8),
            ..ParameterRow::default()
        };
        let parameter = row.into_descriptor();
        assert_eq!(parameter.direction, ParameterDirection::Output);
        assert_eq!(parameter.declaration(), "RESULT D_COUNT");
    }

    #[test]
    fn test_routine_row_keeps_body_verbatim() {
        let row = RoutineRow {
            name: "P   ".into(),
            source: Some("\nBEGIN\n  EXIT;\nEND\n".into()),
        };
        let routine = row.into_descriptor();
        assert_eq!(routine.name, "P");
        assert_eq!(routine.source.as_deref(), Some("\nBEGIN\n  EXIT;\nEND\n"));
        assert_eq!(routine.body(), Some("BEGIN\n  EXIT;\nEND"));
    }

    #[test]
    fn test_oversized_integers_read_as_zero() {
        assert_eq!(int(Some(i64::MAX)), 0);
        assert_eq!(int(None), 0);
        assert_eq!(int(Some(-4)), -4);
    }
}
