use generd_core::{ConstraintKind, Engine};

use super::{CatalogDialect, placeholder_list};
use crate::query::CatalogQuery;

/// MySQL / MariaDB catalog queries.
///
/// `information_schema` columns are cast to `CHAR` so they decode as text
/// regardless of server version.
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlDialect;

fn table_list(tables: &[String]) -> String {
    placeholder_list(tables.len(), 1, |_| "?".to_string())
}

impl CatalogDialect for MysqlDialect {
    fn engine(&self) -> Engine {
        Engine::Mysql
    }

    fn schemas_query(&self) -> CatalogQuery {
        CatalogQuery::new(
            r#"
            SELECT CAST(SCHEMA_NAME AS CHAR) AS schema_name
            FROM INFORMATION_SCHEMA.SCHEMATA
            WHERE SCHEMA_NAME NOT IN ('information_schema', 'mysql', 'performance_schema', 'sys')
            ORDER BY SCHEMA_NAME
            "#,
        )
    }

    fn tables_query(&self, schema: &str) -> CatalogQuery {
        CatalogQuery::new(
            r#"
            SELECT CAST(TABLE_NAME AS CHAR) AS table_name
            FROM INFORMATION_SCHEMA.TABLES
            WHERE TABLE_SCHEMA = ?
              AND TABLE_TYPE = 'BASE TABLE'
            ORDER BY TABLE_NAME
            "#,
        )
        .bind(schema)
    }

    fn columns_query(&self, schema: &str, tables: &[String]) -> CatalogQuery {
        CatalogQuery::new(format!(
            r#"
            SELECT
              CAST(TABLE_NAME AS CHAR) AS table_name,
              CAST(COLUMN_NAME AS CHAR) AS column_name,
              CAST(DATA_TYPE AS CHAR) AS data_type
            FROM INFORMATION_SCHEMA.COLUMNS
            WHERE TABLE_SCHEMA = ?
              AND TABLE_NAME IN ({})
            ORDER BY TABLE_NAME, ORDINAL_POSITION
            "#,
            table_list(tables)
        ))
        .bind(schema)
        .bind_all(tables)
    }

    fn constraints_query(
        &self,
        schema: &str,
        tables: &[String],
        kind: ConstraintKind,
    ) -> CatalogQuery {
        CatalogQuery::new(format!(
            r#"
            SELECT
              CAST(tc.TABLE_NAME AS CHAR) AS table_name,
              CAST(kcu.COLUMN_NAME AS CHAR) AS column_name
            FROM INFORMATION_SCHEMA.TABLE_CONSTRAINTS AS tc
            JOIN INFORMATION_SCHEMA.KEY_COLUMN_USAGE AS kcu
              ON kcu.CONSTRAINT_SCHEMA = tc.CONSTRAINT_SCHEMA
             AND kcu.CONSTRAINT_NAME = tc.CONSTRAINT_NAME
             AND kcu.TABLE_NAME = tc.TABLE_NAME
            WHERE tc.CONSTRAINT_TYPE = ?
              AND tc.TABLE_SCHEMA = ?
              AND tc.TABLE_NAME IN ({})
            ORDER BY tc.TABLE_NAME, tc.CONSTRAINT_NAME, kcu.ORDINAL_POSITION
            "#,
            table_list(tables)
        ))
        .bind(kind.as_sql())
        .bind(schema)
        .bind_all(tables)
    }

    fn foreign_keys_query(&self, schema: &str, tables: &[String]) -> CatalogQuery {
        CatalogQuery::new(format!(
            r#"
            SELECT
              CAST(kcu.TABLE_NAME AS CHAR) AS source_table,
              CAST(kcu.COLUMN_NAME AS CHAR) AS source_column,
              CAST(kcu.REFERENCED_TABLE_NAME AS CHAR) AS target_table,
              CAST(kcu.REFERENCED_COLUMN_NAME AS CHAR) AS target_column
            FROM INFORMATION_SCHEMA.KEY_COLUMN_USAGE AS kcu
            WHERE kcu.CONSTRAINT_SCHEMA = ?
              AND kcu.TABLE_NAME IN ({})
              AND kcu.REFERENCED_TABLE_NAME IS NOT NULL
            ORDER BY kcu.TABLE_NAME, kcu.CONSTRAINT_NAME, kcu.ORDINAL_POSITION
            "#,
            table_list(tables)
        ))
        .bind(schema)
        .bind_all(tables)
    }
}
