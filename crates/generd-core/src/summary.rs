use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::schema::TableDescriptor;

/// Counts and notable shapes found in synthesized metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataSummary {
    pub tables: usize,
    pub columns: usize,
    pub foreign_keys: usize,
    /// Tables flagged as many-to-many junction tables, in output order.
    pub join_tables: Vec<String>,
    /// `source.column -> target` edges whose target is outside the selection.
    pub dangling_references: Vec<String>,
}

/// Summarize metadata for logging and the CLI report.
pub fn summarize(tables: &[TableDescriptor]) -> MetadataSummary {
    let selected: BTreeSet<&str> = tables.iter().map(|t| t.table_name.as_str()).collect();
    let mut summary = MetadataSummary {
        tables: tables.len(),
        ..MetadataSummary::default()
    };

    for table in tables {
        summary.columns += table.columns.len();
        summary.foreign_keys += table.foreign_keys.len();

        if table.is_join_table() {
            summary.join_tables.push(table.table_name.clone());
        }

        for fk in &table.foreign_keys {
            if !selected.contains(fk.target_table.as_str()) {
                summary.dangling_references.push(format!(
                    "{}.{} -> {}",
                    table.table_name, fk.source_column, fk.target_table
                ));
            }
        }
    }

    summary
}
