//! Catalog query text for each supported engine.

use generd_core::{ConstraintKind, Engine};

use crate::query::CatalogQuery;

mod mssql;
mod mysql;
mod oracle;
mod postgres;
mod sqlite;

pub use mssql::MssqlDialect;
pub use mysql::MysqlDialect;
pub use oracle::OracleDialect;
pub use postgres::PostgresDialect;
pub use sqlite::SqliteDialect;

/// The five catalog queries in one engine's SQL dialect.
///
/// Implementations only build text and parameters; they never execute.
pub trait CatalogDialect: Send + Sync {
    fn engine(&self) -> Engine;

    /// Rows carry `schema_name`.
    fn schemas_query(&self) -> CatalogQuery;

    /// Rows carry `table_name`.
    fn tables_query(&self, schema: &str) -> CatalogQuery;

    /// Rows carry `table_name`, `column_name`, `data_type`.
    fn columns_query(&self, schema: &str, tables: &[String]) -> CatalogQuery;

    /// Rows carry `table_name`, `column_name`.
    fn constraints_query(
        &self,
        schema: &str,
        tables: &[String],
        kind: ConstraintKind,
    ) -> CatalogQuery;

    /// Rows carry `source_table`, `source_column`, `target_table`, `target_column`.
    fn foreign_keys_query(&self, schema: &str, tables: &[String]) -> CatalogQuery;
}

/// Dialect for `engine`.
pub fn dialect_for(engine: Engine) -> &'static dyn CatalogDialect {
    match engine {
        Engine::Postgres => &PostgresDialect,
        Engine::Mysql => &MysqlDialect,
        Engine::Mssql => &MssqlDialect,
        Engine::Sqlite => &SqliteDialect,
        Engine::Oracle => &OracleDialect,
    }
}

/// Render `count` placeholders starting at position `first` (1-based).
///
/// An empty list renders as `NULL` so `IN (...)` stays valid and matches nothing.
pub(crate) fn placeholder_list(
    count: usize,
    first: usize,
    placeholder: impl Fn(usize) -> String,
) -> String {
    if count == 0 {
        return "NULL".to_string();
    }
    (first..first + count)
        .map(placeholder)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryParam;

    fn tables() -> Vec<String> {
        vec!["users".to_string(), "orders".to_string()]
    }

    #[test]
    fn renders_placeholder_lists() {
        assert_eq!(placeholder_list(3, 2, |n| format!(":{n}")), ":2, :3, :4");
        assert_eq!(placeholder_list(0, 1, |_| "?".to_string()), "NULL");
    }

    #[test]
    fn every_engine_has_a_matching_dialect() {
        for engine in Engine::ALL {
            assert_eq!(dialect_for(engine).engine(), engine);
        }
    }

    #[test]
    fn scalar_param_count_matches_placeholders() {
        for engine in [Engine::Mysql, Engine::Sqlite] {
            let dialect = dialect_for(engine);
            for query in [
                dialect.columns_query("shop", &tables()),
                dialect.constraints_query("shop", &tables(), ConstraintKind::Unique),
                dialect.foreign_keys_query("shop", &tables()),
            ] {
                assert_eq!(
                    query.sql.matches('?').count(),
                    query.params.len(),
                    "{engine}: {}",
                    query.sql
                );
                assert!(
                    query
                        .params
                        .iter()
                        .all(|param| matches!(param, QueryParam::Text(_)))
                );
            }
        }
    }

    #[test]
    fn empty_selection_keeps_sql_valid() {
        for engine in [Engine::Mysql, Engine::Mssql, Engine::Sqlite, Engine::Oracle] {
            let query = dialect_for(engine).columns_query("shop", &[]);
            assert!(query.sql.contains("NULL"), "{engine}: {}", query.sql);
        }
    }
}
