use generd_core::{ConstraintKind, Engine};

use super::CatalogDialect;
use crate::query::CatalogQuery;

/// PostgreSQL catalog queries. Table lists bind as one `text[]` parameter.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl CatalogDialect for PostgresDialect {
    fn engine(&self) -> Engine {
        Engine::Postgres
    }

    fn schemas_query(&self) -> CatalogQuery {
        CatalogQuery::new(
            r#"
            select schema_name::text as schema_name
            from information_schema.schemata
            where schema_name not in ('information_schema', 'pg_catalog')
              and schema_name not like 'pg_toast%'
              and schema_name not like 'pg_temp%'
            order by schema_name
            "#,
        )
    }

    fn tables_query(&self, schema: &str) -> CatalogQuery {
        CatalogQuery::new(
            r#"
            select table_name::text as table_name
            from information_schema.tables
            where table_schema = $1
              and table_type = 'BASE TABLE'
            order by table_name
            "#,
        )
        .bind(schema)
    }

    fn columns_query(&self, schema: &str, tables: &[String]) -> CatalogQuery {
        CatalogQuery::new(
            r#"
            select
              table_name::text as table_name,
              column_name::text as column_name,
              data_type::text as data_type
            from information_schema.columns
            where table_schema = $1
              and table_name = any($2::text[])
            order by table_name, ordinal_position
            "#,
        )
        .bind(schema)
        .bind_array(tables)
    }

    fn constraints_query(
        &self,
        schema: &str,
        tables: &[String],
        kind: ConstraintKind,
    ) -> CatalogQuery {
        CatalogQuery::new(
            r#"
            select
              tc.table_name::text as table_name,
              kcu.column_name::text as column_name
            from information_schema.table_constraints tc
            join information_schema.key_column_usage kcu
              on kcu.constraint_schema = tc.constraint_schema
             and kcu.constraint_name = tc.constraint_name
             and kcu.table_name = tc.table_name
            where tc.constraint_type = $1
              and tc.table_schema = $2
              and tc.table_name = any($3::text[])
            order by tc.table_name, tc.constraint_name, kcu.ordinal_position
            "#,
        )
        .bind(kind.as_sql())
        .bind(schema)
        .bind_array(tables)
    }

    fn foreign_keys_query(&self, schema: &str, tables: &[String]) -> CatalogQuery {
        // conkey/confkey are parallel arrays; unnesting them together pairs
        // each source column with its referenced column.
        CatalogQuery::new(
            r#"
            select
              src.relname::text as source_table,
              src_att.attname::text as source_column,
              tgt.relname::text as target_table,
              tgt_att.attname::text as target_column
            from pg_constraint con
            join pg_class src on src.oid = con.conrelid
            join pg_namespace nsp on nsp.oid = src.relnamespace
            join pg_class tgt on tgt.oid = con.confrelid
            join unnest(con.conkey, con.confkey) with ordinality as cols(src_attnum, tgt_attnum, ord)
              on true
            join pg_attribute src_att
              on src_att.attrelid = con.conrelid and src_att.attnum = cols.src_attnum
            join pg_attribute tgt_att
              on tgt_att.attrelid = con.confrelid and tgt_att.attnum = cols.tgt_attnum
            where con.contype = 'f'
              and nsp.nspname = $1
              and src.relname = any($2::text[])
            order by src.relname, con.conname, cols.ord
            "#,
        )
        .bind(schema)
        .bind_array(tables)
    }
}
