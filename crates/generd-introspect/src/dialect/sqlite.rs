use generd_core::{ConstraintKind, Engine};

use super::{CatalogDialect, placeholder_list};
use crate::query::CatalogQuery;

/// SQLite catalog queries over the table-valued pragma functions.
///
/// SQLite exposes a single `main` schema here, so the schema argument is not
/// bound. Declared types are lower-cased to line up with the type aliases.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

fn table_list(tables: &[String]) -> String {
    placeholder_list(tables.len(), 1, |_| "?".to_string())
}

impl CatalogDialect for SqliteDialect {
    fn engine(&self) -> Engine {
        Engine::Sqlite
    }

    fn schemas_query(&self) -> CatalogQuery {
        CatalogQuery::new("SELECT 'main' AS schema_name")
    }

    fn tables_query(&self, _schema: &str) -> CatalogQuery {
        CatalogQuery::new(
            r#"
            SELECT name AS table_name
            FROM sqlite_master
            WHERE type = 'table'
              AND name NOT LIKE 'sqlite_%'
            ORDER BY name
            "#,
        )
    }

    fn columns_query(&self, _schema: &str, tables: &[String]) -> CatalogQuery {
        CatalogQuery::new(format!(
            r#"
            SELECT m.name AS table_name, p.name AS column_name, lower(p.type) AS data_type
            FROM sqlite_master AS m
            JOIN pragma_table_info(m.name) AS p
            WHERE m.type = 'table'
              AND m.name IN ({})
            ORDER BY m.name, p.cid
            "#,
            table_list(tables)
        ))
        .bind_all(tables)
    }

    fn constraints_query(
        &self,
        _schema: &str,
        tables: &[String],
        kind: ConstraintKind,
    ) -> CatalogQuery {
        let sql = match kind {
            ConstraintKind::PrimaryKey => format!(
                r#"
                SELECT m.name AS table_name, p.name AS column_name
                FROM sqlite_master AS m
                JOIN pragma_table_info(m.name) AS p
                WHERE m.type = 'table'
                  AND p.pk > 0
                  AND m.name IN ({})
                ORDER BY m.name, p.pk
                "#,
                table_list(tables)
            ),
            ConstraintKind::Unique => format!(
                r#"
                SELECT m.name AS table_name, ii.name AS column_name
                FROM sqlite_master AS m
                JOIN pragma_index_list(m.name) AS il
                JOIN pragma_index_info(il.name) AS ii
                WHERE m.type = 'table'
                  AND il.origin = 'u'
                  AND m.name IN ({})
                ORDER BY m.name, il.name, ii.seqno
                "#,
                table_list(tables)
            ),
        };
        CatalogQuery::new(sql).bind_all(tables)
    }

    fn foreign_keys_query(&self, _schema: &str, tables: &[String]) -> CatalogQuery {
        // A NULL "to" column references the target's primary key.
        CatalogQuery::new(format!(
            r#"
            SELECT
              m.name AS source_table,
              f."from" AS source_column,
              f."table" AS target_table,
              COALESCE(
                f."to",
                (SELECT tp.name FROM pragma_table_info(f."table") AS tp WHERE tp.pk = f.seq + 1)
              ) AS target_column
            FROM sqlite_master AS m
            JOIN pragma_foreign_key_list(m.name) AS f
            WHERE m.type = 'table'
              AND m.name IN ({})
            ORDER BY m.name, f.id, f.seq
            "#,
            table_list(tables)
        ))
        .bind_all(tables)
    }
}
