//! `CREATE DOMAIN` generation.

use crate::catalog::DomainDescriptor;

/// Renders one domain.
///
/// Clauses follow the type in a fixed order: default, `NOT NULL`, check.
/// Each is emitted only when the catalog has it.
#[must_use]
pub fn render_domain(domain: &DomainDescriptor) -> String {
    let mut sql = format!(
        "CREATE DOMAIN {} AS {}",
        domain.name,
        domain.field_type.declaration()
    );

    if let Some(default) = non_empty(domain.default_source.as_deref()) {
        sql.push(' ');
        sql.push_str(default);
    }
    if domain.not_null {
        sql.push_str(" NOT NULL");
    }
    if let Some(check) = non_empty(domain.validation_source.as_deref()) {
        sql.push(' ');
        sql.push_str(check);
    }

    sql.push(';');
    sql
}

pub(super) fn non_empty(source: Option<&str>) -> Option<&str> {
    source.map(str::trim).filter(|s| !s.is_empty())
}
