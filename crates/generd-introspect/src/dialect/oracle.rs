use generd_core::{ConstraintKind, Engine};

use super::{CatalogDialect, placeholder_list};
use crate::query::CatalogQuery;

/// Oracle catalog queries over the `ALL_*` dictionary views.
///
/// Oracle reports labels upper-cased; readers look fields up ignoring case.
#[derive(Debug, Clone, Copy, Default)]
pub struct OracleDialect;

fn table_list(tables: &[String], first: usize) -> String {
    placeholder_list(tables.len(), first, |n| format!(":{n}"))
}

/// `ALL_CONSTRAINTS.CONSTRAINT_TYPE` code.
fn constraint_code(kind: ConstraintKind) -> &'static str {
    match kind {
        ConstraintKind::PrimaryKey => "P",
        ConstraintKind::Unique => "U",
    }
}

impl CatalogDialect for OracleDialect {
    fn engine(&self) -> Engine {
        Engine::Oracle
    }

    fn schemas_query(&self) -> CatalogQuery {
        CatalogQuery::new(
            r#"
            SELECT USERNAME AS schema_name
            FROM ALL_USERS
            WHERE USERNAME NOT IN ('SYS', 'SYSTEM', 'DBSNMP', 'SYSMAN', 'OUTLN', 'MGMT_VIEW',
                                   'DIP', 'ORACLE_OCM', 'XDB', 'WMSYS', 'CTXSYS', 'MDSYS',
                                   'ORDSYS', 'ORDDATA', 'SI_INFORMTN_SCHEMA', 'OLAPSYS')
            ORDER BY USERNAME
            "#,
        )
    }

    fn tables_query(&self, schema: &str) -> CatalogQuery {
        CatalogQuery::new(
            r#"
            SELECT TABLE_NAME AS table_name
            FROM ALL_TABLES
            WHERE OWNER = :1
            ORDER BY TABLE_NAME
            "#,
        )
        .bind(schema)
    }

    fn columns_query(&self, schema: &str, tables: &[String]) -> CatalogQuery {
        CatalogQuery::new(format!(
            r#"
            SELECT TABLE_NAME AS table_name, COLUMN_NAME AS column_name, DATA_TYPE AS data_type
            FROM ALL_TAB_COLUMNS
            WHERE OWNER = :1
              AND TABLE_NAME IN ({})
            ORDER BY TABLE_NAME, COLUMN_ID
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
            SELECT ac.TABLE_NAME AS table_name, acc.COLUMN_NAME AS column_name
            FROM ALL_CONSTRAINTS ac
            JOIN ALL_CONS_COLUMNS acc
              ON acc.OWNER = ac.OWNER
             AND acc.CONSTRAINT_NAME = ac.CONSTRAINT_NAME
            WHERE ac.CONSTRAINT_TYPE = :1
              AND ac.OWNER = :2
              AND ac.TABLE_NAME IN ({})
            ORDER BY ac.TABLE_NAME, ac.CONSTRAINT_NAME, acc.POSITION
            "#,
            table_list(tables, 3)
        ))
        .bind(constraint_code(kind))
        .bind(schema)
        .bind_all(tables)
    }

    fn foreign_keys_query(&self, schema: &str, tables: &[String]) -> CatalogQuery {
        CatalogQuery::new(format!(
            r#"
            SELECT
              ac.TABLE_NAME AS source_table,
              acc.COLUMN_NAME AS source_column,
              ref.TABLE_NAME AS target_table,
              ref_cols.COLUMN_NAME AS target_column
            FROM ALL_CONSTRAINTS ac
            JOIN ALL_CONS_COLUMNS acc
              ON acc.OWNER = ac.OWNER
             AND acc.CONSTRAINT_NAME = ac.CONSTRAINT_NAME
            JOIN ALL_CONSTRAINTS ref
              ON ref.OWNER = ac.R_OWNER
             AND ref.CONSTRAINT_NAME = ac.R_CONSTRAINT_NAME
            JOIN ALL_CONS_COLUMNS ref_cols
              ON ref_cols.OWNER = ref.OWNER
             AND ref_cols.CONSTRAINT_NAME = ref.CONSTRAINT_NAME
             AND ref_cols.POSITION = acc.POSITION
            WHERE ac.CONSTRAINT_TYPE = 'R'
              AND ac.OWNER = :1
              AND ac.TABLE_NAME IN ({})
            ORDER BY ac.TABLE_NAME, ac.CONSTRAINT_NAME, acc.POSITION
            "#,
            table_list(tables, 2)
        ))
        .bind(schema)
        .bind_all(tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryParam;

    #[test]
    fn binds_dictionary_constraint_codes() {
        let tables = vec!["USERS".to_string()];
        let pk = OracleDialect.constraints_query("APP", &tables, ConstraintKind::PrimaryKey);
        let unique = OracleDialect.constraints_query("APP", &tables, ConstraintKind::Unique);
        assert_eq!(pk.params[0], QueryParam::Text("P".into()));
        assert_eq!(unique.params[0], QueryParam::Text("U".into()));
        assert!(pk.sql.contains("IN (:3)"));
    }
}
