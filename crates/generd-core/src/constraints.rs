use std::collections::BTreeMap;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Constraint kinds read from the catalog through the constraints query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    PrimaryKey,
    Unique,
}

impl ConstraintKind {
    /// Spelling used by `information_schema.table_constraints.constraint_type`.
    pub fn as_sql(self) -> &'static str {
        match self {
            ConstraintKind::PrimaryKey => "PRIMARY KEY",
            ConstraintKind::Unique => "UNIQUE",
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Columns participating in one kind of constraint, grouped by table.
///
/// Column order within a table follows the order rows were added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintMap {
    by_table: BTreeMap<String, Vec<String>>,
}

impl ConstraintMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from `(table_name, column_name)` rows in one pass.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut map = Self::new();
        for (table, column) in rows {
            map.insert(table, column);
        }
        map
    }

    pub fn insert(&mut self, table: String, column: String) {
        self.by_table.entry(table).or_default().push(column);
    }

    /// Columns for `table`, empty when the table has no constraint of this kind.
    pub fn columns(&self, table: &str) -> &[String] {
        self.by_table.get(table).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, table: &str, column: &str) -> bool {
        self.columns(table).iter().any(|item| item == column)
    }

    pub fn is_empty(&self) -> bool {
        self.by_table.is_empty()
    }

    /// Number of tables with at least one constrained column.
    pub fn len(&self) -> usize {
        self.by_table.len()
    }
}

/// One foreign-key column pair as reported by the catalog.
///
/// Composite keys produce one edge per column pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyEdge {
    pub source_table: String,
    pub source_column: String,
    pub target_table: String,
    pub target_column: String,
}

/// Cardinality of a relationship between two tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum RelationshipType {
    OneToOne,
    OneToMany,
    ManyToMany,
}
