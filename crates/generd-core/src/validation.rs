use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::schema::TableDescriptor;

/// Validate internal consistency of synthesized metadata.
///
/// This checks:
/// - duplicate table names
/// - columns attributed to a different table
/// - primary key columns missing from a table that has columns
///
/// Foreign-key targets are not checked; they may point outside the selection.
pub fn validate_metadata(tables: &[TableDescriptor]) -> Result<()> {
    let mut seen = BTreeSet::new();

    for table in tables {
        if !seen.insert(table.table_name.as_str()) {
            return Err(Error::InvalidMetadata(format!(
                "duplicate table name: {}",
                table.table_name
            )));
        }

        let mut columns = BTreeSet::new();
        for column in &table.columns {
            if column.table_name != table.table_name {
                return Err(Error::InvalidMetadata(format!(
                    "column {}.{} listed under table {}",
                    column.table_name, column.column_name, table.table_name
                )));
            }
            columns.insert(column.column_name.as_str());
        }

        if columns.is_empty() {
            continue;
        }

        for key_column in &table.primary_key {
            if !columns.contains(key_column.as_str()) {
                return Err(Error::InvalidMetadata(format!(
                    "primary key column not found: {}.{}",
                    table.table_name, key_column
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnDescriptor;

    fn table(name: &str, columns: &[&str], primary_key: &[&str]) -> TableDescriptor {
        TableDescriptor {
            columns: columns
                .iter()
                .map(|column| ColumnDescriptor::from_raw(name.into(), column.to_string(), "text"))
                .collect(),
            primary_key: primary_key.iter().map(|c| c.to_string()).collect(),
            ..TableDescriptor::empty(name)
        }
    }

    #[test]
    fn accepts_consistent_metadata() {
        let tables = vec![
            table("users", &["id", "email"], &["id"]),
            TableDescriptor::empty("ghost"),
        ];
        assert!(validate_metadata(&tables).is_ok());
    }

    #[test]
    fn rejects_duplicate_tables() {
        let tables = vec![table("users", &["id"], &[]), table("users", &["id"], &[])];
        let err = validate_metadata(&tables).unwrap_err();
        assert!(err.to_string().contains("duplicate table name: users"));
    }

    #[test]
    fn rejects_leaked_columns() {
        let mut users = table("users", &["id"], &[]);
        users.columns.push(ColumnDescriptor::from_raw(
            "orders".into(),
            "user_id".into(),
            "integer",
        ));
        assert!(matches!(
            validate_metadata(&[users]),
            Err(Error::InvalidMetadata(_))
        ));
    }

    #[test]
    fn rejects_unknown_primary_key_column() {
        let tables = vec![table("users", &["id"], &["uuid"])];
        assert!(validate_metadata(&tables).is_err());
    }
}
