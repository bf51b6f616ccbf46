//! `CREATE TABLE` generation.

use indexmap::IndexMap;

use super::domains::non_empty;
use crate::catalog::ColumnDescriptor;

/// Groups column rows by table.
///
/// Tables keep the order in which the catalog first returned them; columns
/// within a table are sorted by position whatever order they arrived in.
#[must_use]
pub fn group_tables(columns: Vec<ColumnDescriptor>) -> IndexMap<String, Vec<ColumnDescriptor>> {
    let mut tables: IndexMap<String, Vec<ColumnDescriptor>> = IndexMap::new();
    for column in columns {
        tables
            .entry(column.table_name.clone())
            .or_default()
            .push(column);
    }
    for columns in tables.values_mut() {
        columns.sort_by_key(|c| c.position);
    }
    tables
}

/// Renders every table found in `columns`.
#[must_use]
pub fn render_tables(columns: Vec<ColumnDescriptor>) -> Vec<String> {
    group_tables(columns)
        .iter()
        .map(|(name, columns)| render_table(name, columns))
        .collect()
}

/// Renders one table from its columns, which must already be in position
/// order.
#[must_use]
pub fn render_table(name: &str, columns: &[ColumnDescriptor]) -> String {
    let lines: Vec<String> = columns.iter().map(column_line).collect();
    format!("CREATE TABLE {name} (\n{}\n);", lines.join(",\n"))
}

fn column_line(column: &ColumnDescriptor) -> String {
    let mut line = format!("    {} {}", column.column_name, column.type_text());
    if column.not_null {
        line.push_str(" NOT NULL");
    }
    if let Some(default) = non_empty(column.default_source.as_deref()) {
        line.push(' ');
        line.push_str(default);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeDescriptor;

    const INTEGER: TypeDescriptor = TypeDescriptor::new(8, 0, 4, 0, 0);
    const VARCHAR_30: TypeDescriptor = TypeDescriptor::new(37, 0, 120, 0, 30);

    #[test]
    fn test_single_table() {
        let columns = vec![
            ColumnDescriptor::new("CUSTOMERS", "ID", 0, INTEGER)
                .domain("D_ID")
                .not_null(),
            ColumnDescriptor::new("CUSTOMERS", "NAME", 1, VARCHAR_30)
                .domain("RDB$11")
                .default_source("DEFAULT 'n/a'"),
        ];
        assert_eq!(
            render_tables(columns),
            vec![
                "CREATE TABLE CUSTOMERS (\n    ID D_ID NOT NULL,\n    NAME VARCHAR(30) DEFAULT 'n/a'\n);"
            ]
        );
    }

    #[test]
    fn test_columns_ordered_by_position() {
        let columns = vec![
            ColumnDescriptor::new("T", "C", 2, INTEGER),
            ColumnDescriptor::new("T", "A", 0, INTEGER),
            ColumnDescriptor::new("T", "B", 1, INTEGER),
        ];
        assert_eq!(
            render_tables(columns),
            vec!["CREATE TABLE T (\n    A INTEGER,\n    B INTEGER,\n    C INTEGER\n);"]
        );
    }

    #[test]
    fn test_tables_keep_catalog_order() {
        let columns = vec![
            ColumnDescriptor::new("ZETA", "X", 0, INTEGER),
            ColumnDescriptor::new("ALPHA", "Y", 0, INTEGER),
            ColumnDescriptor::new("ZETA", "W", 1, INTEGER),
        ];
        let tables = group_tables(columns);
        let names: Vec<_> = tables.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["ZETA", "ALPHA"]);
        assert_eq!(tables["ZETA"].len(), 2);
    }

    #[test]
    fn test_no_columns_no_tables() {
        assert!(render_tables(Vec::new()).is_empty());
    }
}
