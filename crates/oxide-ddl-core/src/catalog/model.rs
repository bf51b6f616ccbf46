//! Catalog row projections.
//!
//! One struct per introspection query row. They are built transiently from
//! query results (or a snapshot) and handed to the generators.

use serde::{Deserialize, Serialize};

use crate::types::TypeDescriptor;

/// Prefix of system-generated domain names.
pub const SYSTEM_DOMAIN_PREFIX: &str = "RDB$";

/// Returns true for the anonymous domains the engine creates to back
/// columns and parameters declared with an inline type.
#[must_use]
pub fn is_system_domain(name: &str) -> bool {
    name.starts_with(SYSTEM_DOMAIN_PREFIX)
}

/// A user-defined domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainDescriptor {
    /// Domain name.
    pub name: String,
    /// Base type.
    #[serde(flatten)]
    pub field_type: TypeDescriptor,
    /// `DEFAULT ...` clause source, verbatim.
    #[serde(default)]
    pub default_source: Option<String>,
    /// Whether the domain is declared `NOT NULL`.
    #[serde(default)]
    pub not_null: bool,
    /// `CHECK (...)` clause source, verbatim.
    #[serde(default)]
    pub validation_source: Option<String>,
}

impl DomainDescriptor {
    /// Creates a nullable domain with no default and no check.
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            field_type,
            default_source: None,
            not_null: false,
            validation_source: None,
        }
    }

    /// Sets the default clause.
    #[must_use]
    pub fn default_source(mut self, source: impl Into<String>) -> Self {
        self.default_source = Some(source.into());
        self
    }

    /// Marks the domain `NOT NULL`.
    #[must_use]
    pub const fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// Sets the check clause.
    #[must_use]
    pub fn validation_source(mut self, source: impl Into<String>) -> Self {
        self.validation_source = Some(source.into());
        self
    }
}

/// One table column.
///
/// `(table_name, position)` is unique; generators always order a table's
/// columns by ascending position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Owning table.
    pub table_name: String,
    /// Column name.
    pub column_name: String,
    /// Ordinal position within the table.
    pub position: i32,
    /// Whether the column is declared `NOT NULL`.
    #[serde(default)]
    pub not_null: bool,
    /// `DEFAULT ...` clause source, verbatim.
    #[serde(default)]
    pub default_source: Option<String>,
    /// Type of the backing domain.
    #[serde(flatten)]
    pub field_type: TypeDescriptor,
    /// Backing domain, possibly a system-anonymous one.
    #[serde(default)]
    pub domain_name: Option<String>,
}

impl ColumnDescriptor {
    /// Creates a nullable column with no default, typed inline.
    #[must_use]
    pub fn new(
        table_name: impl Into<String>,
        column_name: impl Into<String>,
        position: i32,
        field_type: TypeDescriptor,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            column_name: column_name.into(),
            position,
            not_null: false,
            default_source: None,
            field_type,
            domain_name: None,
        }
    }

    /// Marks the column `NOT NULL`.
    #[must_use]
    pub const fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// Sets the default clause.
    #[must_use]
    pub fn default_source(mut self, source: impl Into<String>) -> Self {
        self.default_source = Some(source.into());
        self
    }

    /// Sets the backing domain.
    #[must_use]
    pub fn domain(mut self, name: impl Into<String>) -> Self {
        self.domain_name = Some(name.into());
        self
    }

    /// Returns the user domain name, or `None` for inline types.
    #[must_use]
    pub fn user_domain(&self) -> Option<&str> {
        self.domain_name
            .as_deref()
            .filter(|name| !name.is_empty() && !is_system_domain(name))
    }

    /// Returns the column's type as written in DDL: the user domain when
    /// there is one, a synthesized declaration otherwise.
    #[must_use]
    pub fn type_text(&self) -> String {
        self.user_domain()
            .map_or_else(|| self.field_type.declaration(), str::to_string)
    }
}

/// A stored procedure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineDescriptor {
    /// Procedure name.
    pub name: String,
    /// Body source following `AS`; `None` when the catalog holds none.
    #[serde(default)]
    pub source: Option<String>,
}

impl RoutineDescriptor {
    /// Creates a routine descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, source: Option<String>) -> Self {
        Self {
            name: name.into(),
            source,
        }
    }

    /// Returns the trimmed body, or `None` when there is nothing to generate.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.source
            .as_deref()
            .map(str::trim)
            .filter(|body| !body.is_empty())
    }
}

/// Direction of a procedure parameter (`RDB$PARAMETER_TYPE`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum ParameterDirection {
    /// Input parameter (code 0).
    #[default]
    Input,
    /// Output parameter (code 1).
    Output,
}

impl ParameterDirection {
    /// Decodes `RDB$PARAMETER_TYPE`; anything but 0 is an output.
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        if code == 0 {
            Self::Input
        } else {
            Self::Output
        }
    }
}

/// One procedure parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    /// Parameter name.
    pub name: String,
    /// Input or output.
    pub direction: ParameterDirection,
    /// `RDB$PARAMETER_NUMBER` within its direction.
    #[serde(default)]
    pub number: i32,
    /// Backing domain, possibly a system-anonymous one.
    pub domain_name: String,
    /// Type of the backing domain.
    #[serde(flatten)]
    pub field_type: TypeDescriptor,
}

impl ParameterDescriptor {
    /// Creates a parameter descriptor.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        direction: ParameterDirection,
        number: i32,
        domain_name: impl Into<String>,
        field_type: TypeDescriptor,
    ) -> Self {
        Self {
            name: name.into(),
            direction,
            number,
            domain_name: domain_name.into(),
            field_type,
        }
    }

    /// Renders `name type`, using the user domain when there is one.
    #[must_use]
    pub fn declaration(&self) -> String {
        if is_system_domain(&self.domain_name) || self.domain_name.is_empty() {
            format!("{} {}", self.name, self.field_type.declaration())
        } else {
            format!("{} {}", self.name, self.domain_name)
        }
    }
}
