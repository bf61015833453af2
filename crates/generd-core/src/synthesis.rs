use std::collections::HashMap;

use crate::constraints::{ConstraintMap, ForeignKeyEdge, RelationshipType};
use crate::schema::{ColumnDescriptor, ForeignKeyDescriptor, TableDescriptor};

/// Raw catalog data fetched for one schema and one table selection.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    /// Normalized columns in catalog order.
    pub columns: Vec<ColumnDescriptor>,
    pub primary_keys: ConstraintMap,
    pub unique_keys: ConstraintMap,
    /// Foreign-key edges in catalog order.
    pub foreign_keys: Vec<ForeignKeyEdge>,
}

/// Combine catalog data into one descriptor per requested table.
///
/// Output order follows `tables`. Tables missing from the catalog still get
/// a descriptor, with every list empty.
pub fn synthesize(tables: &[String], snapshot: &CatalogSnapshot) -> Vec<TableDescriptor> {
    let columns = group_by(&snapshot.columns, |column| column.table_name.as_str());
    let edges = group_by(&snapshot.foreign_keys, |edge| edge.source_table.as_str());

    tables
        .iter()
        .map(|table| {
            let primary_key = snapshot.primary_keys.columns(table);
            let table_edges = edges.get(table.as_str()).map(Vec::as_slice).unwrap_or(&[]);

            let foreign_keys = table_edges
                .iter()
                .map(|edge| ForeignKeyDescriptor {
                    source_column: edge.source_column.clone(),
                    target_table: edge.target_table.clone(),
                    target_column: edge.target_column.clone(),
                    relationship_type: classify_edge(table, &edge.source_column, snapshot),
                })
                .collect();

            let relationship_type = is_join_table(primary_key, table_edges)
                .then_some(RelationshipType::ManyToMany);

            TableDescriptor {
                table_name: table.clone(),
                columns: columns
                    .get(table.as_str())
                    .map(|items| items.iter().map(|column| (*column).clone()).collect())
                    .unwrap_or_default(),
                primary_key: primary_key.to_vec(),
                foreign_keys,
                relationship_type,
            }
        })
        .collect()
}

/// A uniquely constrained FK column can match at most one source row per target.
fn classify_edge(table: &str, column: &str, snapshot: &CatalogSnapshot) -> RelationshipType {
    if snapshot.primary_keys.contains(table, column) || snapshot.unique_keys.contains(table, column)
    {
        RelationshipType::OneToOne
    } else {
        RelationshipType::OneToMany
    }
}

/// Two-column primary key plus exactly two outgoing edges.
fn is_join_table(primary_key: &[String], edges: &[&ForeignKeyEdge]) -> bool {
    primary_key.len() == 2 && edges.len() == 2
}

fn group_by<'a, T, F>(items: &'a [T], key: F) -> HashMap<&'a str, Vec<&'a T>>
where
    F: Fn(&'a T) -> &'a str,
{
    let mut grouped: HashMap<&str, Vec<&T>> = HashMap::new();
    for item in items {
        grouped.entry(key(item)).or_default().push(item);
    }
    grouped
}
