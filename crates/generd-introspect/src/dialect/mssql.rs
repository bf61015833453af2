use generd_core::{ConstraintKind, Engine};

use super::{CatalogDialect, placeholder_list};
use crate::query::CatalogQuery;

/// SQL Server catalog queries using `@P1`-style positional parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct MssqlDialect;

fn table_list(tables: &[String], first: usize) -> String {
    placeholder_list(tables.len(), first, |n| format!("@P{n}"))
}

impl CatalogDialect for MssqlDialect {
    fn engine(&self) -> Engine {
        Engine::Mssql
    }

    fn schemas_query(&self) -> CatalogQuery {
        CatalogQuery::new(
            r#"
            SELECT SCHEMA_NAME AS schema_name
            FROM INFORMATION_SCHEMA.SCHEMATA
            WHERE SCHEMA_NAME NOT IN ('INFORMATION_SCHEMA', 'sys', 'guest',
                                      'db_accessadmin', 'db_backupoperator', 'db_datareader',
                                      'db_datawriter', 'db_ddladmin', 'db_denydatareader',
                                      'db_denydatawriter', 'db_owner', 'db_securityadmin')
            ORDER BY SCHEMA_NAME
            "#,
        )
    }

    fn tables_query(&self, schema: &str) -> CatalogQuery {
        CatalogQuery::new(
            r#"
            SELECT TABLE_NAME AS table_name
            FROM INFORMATION_SCHEMA.TABLES
            WHERE TABLE_SCHEMA = @P1
              AND TABLE_TYPE = 'BASE TABLE'
            ORDER BY TABLE_NAME
            "#,
        )
        .bind(schema)
    }

    fn columns_query(&self, schema: &str, tables: &[String]) -> CatalogQuery {
        CatalogQuery::new(format!(
            r#"
            SELECT TABLE_NAME AS table_name, COLUMN_NAME AS column_name, DATA_TYPE AS data_type
            FROM INFORMATION_SCHEMA.COLUMNS
            WHERE TABLE_SCHEMA = @P1
              AND TABLE_NAME IN ({})
            ORDER BY TABLE_NAME, ORDINAL_POSITION
            "#,
            table_list(tables, 2)
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
            SELECT tc.TABLE_NAME AS table_name, kcu.COLUMN_NAME AS column_name
            FROM INFORMATION_SCHEMA.TABLE_CONSTRAINTS AS tc
            JOIN INFORMATION_SCHEMA.KEY_COLUMN_USAGE AS kcu
              ON kcu.CONSTRAINT_SCHEMA = tc.CONSTRAINT_SCHEMA
             AND kcu.CONSTRAINT_NAME = tc.CONSTRAINT_NAME
             AND kcu.TABLE_NAME = tc.TABLE_NAME
            WHERE tc.CONSTRAINT_TYPE = @P1
              AND tc.TABLE_SCHEMA = @P2
              AND tc.TABLE_NAME IN ({})
            ORDER BY tc.TABLE_NAME, tc.CONSTRAINT_NAME, kcu.ORDINAL_POSITION
            "#,
            table_list(tables, 3)
        ))
        .bind(kind.as_sql())
        .bind(schema)
        .bind_all(tables)
    }

    fn foreign_keys_query(&self, schema: &str, tables: &[String]) -> CatalogQuery {
        CatalogQuery::new(format!(
            r#"
            SELECT
              OBJECT_NAME(fk.parent_object_id) AS source_table,
              COL_NAME(fkc.parent_object_id, fkc.parent_column_id) AS source_column,
              OBJECT_NAME(fk.referenced_object_id) AS target_table,
              COL_NAME(fkc.referenced_object_id, fkc.referenced_column_id) AS target_column
            FROM sys.foreign_keys AS fk
            JOIN sys.foreign_key_columns AS fkc
              ON fkc.constraint_object_id = fk.object_id
            WHERE OBJECT_SCHEMA_NAME(fk.parent_object_id) = @P1
              AND OBJECT_NAME(fk.parent_object_id) IN ({})
            ORDER BY OBJECT_NAME(fk.parent_object_id), fk.name, fkc.constraint_column_id
            "#,
            table_list(tables, 2)
        ))
        .bind(schema)
        .bind_all(tables)
    }
}
