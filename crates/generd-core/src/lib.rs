//! Core contracts for generd.
//!
//! This crate defines the ER metadata model, the type normalizer, and the
//! synthesizer that turns raw catalog rows into relationship-annotated
//! table descriptors.

pub mod connection;
pub mod constraints;
pub mod engine;
pub mod error;
pub mod redaction;
pub mod schema;
pub mod summary;
pub mod synthesis;
pub mod types;
pub mod validation;

pub use connection::{ConnectionFields, ConnectionParts, ConnectionTarget};
pub use constraints::{ConstraintKind, ConstraintMap, ForeignKeyEdge, RelationshipType};
pub use engine::Engine;
pub use error::{Error, ErrorKind, Result};
pub use redaction::{RedactedConnection, redact_connection};
pub use schema::{ColumnDescriptor, ForeignKeyDescriptor, TableDescriptor, metadata_json_schema};
pub use summary::{MetadataSummary, summarize};
pub use synthesis::{CatalogSnapshot, synthesize};
pub use types::{TYPE_ALIASES, normalize_type};
pub use validation::validate_metadata;
