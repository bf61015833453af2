use schemars::JsonSchema;
use schemars::schema::RootSchema;
use serde::{Deserialize, Serialize};

use crate::constraints::RelationshipType;
use crate::types::normalize_type;

/// A column with its canonical type name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ColumnDescriptor {
    pub table_name: String,
    pub column_name: String,
    /// Canonical type name (see [`crate::types::normalize_type`]).
    pub data_type: String,
}

impl ColumnDescriptor {
    /// Build a descriptor from a raw catalog row, normalizing the type name.
    pub fn from_raw(table_name: String, column_name: String, raw_type: &str) -> Self {
        Self {
            table_name,
            column_name,
            data_type: normalize_type(raw_type),
        }
    }
}

/// An outgoing foreign-key column pair with its computed cardinality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ForeignKeyDescriptor {
    pub source_column: String,
    /// Referenced table; may lie outside the selected table set.
    pub target_table: String,
    pub target_column: String,
    pub relationship_type: RelationshipType,
}

/// One table of the persisted ER metadata artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TableDescriptor {
    pub table_name: String,
    pub columns: Vec<ColumnDescriptor>,
    pub primary_key: Vec<String>,
    pub foreign_keys: Vec<ForeignKeyDescriptor>,
    /// Set to `ManyToMany` when the table is a pure junction table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_type: Option<RelationshipType>,
}

impl TableDescriptor {
    /// Descriptor for a table with no catalog data at all.
    pub fn empty(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            columns: Vec::new(),
            primary_key: Vec::new(),
            foreign_keys: Vec::new(),
            relationship_type: None,
        }
    }

    pub fn is_join_table(&self) -> bool {
        self.relationship_type == Some(RelationshipType::ManyToMany)
    }
}

/// JSON Schema describing the artifact consumed by the renderer.
pub fn metadata_json_schema() -> RootSchema {
    schemars::schema_for!(Vec<TableDescriptor>)
}
