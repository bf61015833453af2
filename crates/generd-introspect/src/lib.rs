//! Catalog introspection for generd.
//!
//! Dialects render the catalog queries, providers execute them, and the
//! reader turns rows into the inputs of the metadata synthesizer.

pub mod dialect;
pub mod provider;
pub mod query;
pub mod reader;
pub mod session;

pub use dialect::{CatalogDialect, dialect_for};
pub use provider::{CatalogProvider, provider_for};
pub use query::{CatalogQuery, CatalogRow, QueryParam};
pub use reader::CatalogReader;
pub use session::{CatalogSession, introspect, introspect_target};

pub use generd_core::TableDescriptor;
