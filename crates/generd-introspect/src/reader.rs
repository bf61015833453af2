use generd_core::{
    CatalogSnapshot, ColumnDescriptor, ConstraintKind, ConstraintMap, ForeignKeyEdge, Result,
    TableDescriptor, synthesize,
};

use crate::dialect::CatalogDialect;
use crate::provider::CatalogProvider;
use crate::query::{CatalogQuery, CatalogRow};

/// Runs catalog queries through a connected provider, one at a time.
pub struct CatalogReader<'a> {
    provider: &'a mut dyn CatalogProvider,
    dialect: &'a dyn CatalogDialect,
}

impl<'a> CatalogReader<'a> {
    pub fn new(provider: &'a mut dyn CatalogProvider, dialect: &'a dyn CatalogDialect) -> Self {
        Self { provider, dialect }
    }

    async fn run(&mut self, step: &'static str, query: CatalogQuery) -> Result<Vec<CatalogRow>> {
        tracing::debug!(
            event = "catalog_query",
            engine = %self.dialect.engine(),
            step,
            params = query.params.len()
        );
        let rows = self.provider.query(&query).await?;
        tracing::debug!(event = "catalog_rows", step, rows = rows.len());
        Ok(rows)
    }

    /// Names of user schemas.
    pub async fn fetch_schemas(&mut self) -> Result<Vec<String>> {
        let query = self.dialect.schemas_query();
        self.run("schemas", query)
            .await?
            .iter()
            .map(|row| row.require_owned("schema_name"))
            .collect()
    }

    /// Names of base tables in `schema`.
    pub async fn fetch_tables(&mut self, schema: &str) -> Result<Vec<String>> {
        let query = self.dialect.tables_query(schema);
        self.run("tables", query)
            .await?
            .iter()
            .map(|row| row.require_owned("table_name"))
            .collect()
    }

    /// Columns of the selected tables with normalized type names.
    pub async fn fetch_columns_metadata(
        &mut self,
        schema: &str,
        tables: &[String],
    ) -> Result<Vec<ColumnDescriptor>> {
        let query = self.dialect.columns_query(schema, tables);
        self.run("columns", query)
            .await?
            .iter()
            .map(|row| {
                Ok(ColumnDescriptor::from_raw(
                    row.require_owned("table_name")?,
                    row.require_owned("column_name")?,
                    row.require("data_type")?,
                ))
            })
            .collect()
    }

    /// Columns taking part in constraints of `kind`, grouped by table.
    pub async fn fetch_constraints_metadata(
        &mut self,
        schema: &str,
        tables: &[String],
        kind: ConstraintKind,
    ) -> Result<ConstraintMap> {
        let step = match kind {
            ConstraintKind::PrimaryKey => "primary_keys",
            ConstraintKind::Unique => "unique_keys",
        };
        let query = self.dialect.constraints_query(schema, tables, kind);

        let mut map = ConstraintMap::new();
        for row in self.run(step, query).await? {
            map.insert(
                row.require_owned("table_name")?,
                row.require_owned("column_name")?,
            );
        }
        Ok(map)
    }

    /// One edge per foreign-key column pair.
    pub async fn fetch_fk_metadata(
        &mut self,
        schema: &str,
        tables: &[String],
    ) -> Result<Vec<ForeignKeyEdge>> {
        let query = self.dialect.foreign_keys_query(schema, tables);
        self.run("foreign_keys", query)
            .await?
            .iter()
            .map(|row| {
                Ok(ForeignKeyEdge {
                    source_table: row.require_owned("source_table")?,
                    source_column: row.require_owned("source_column")?,
                    target_table: row.require_owned("target_table")?,
                    target_column: row.require_owned("target_column")?,
                })
            })
            .collect()
    }

    /// Fetch columns, primary keys, unique keys and foreign keys, in that order.
    pub async fn fetch_snapshot(
        &mut self,
        schema: &str,
        tables: &[String],
    ) -> Result<CatalogSnapshot> {
        let columns = self.fetch_columns_metadata(schema, tables).await?;
        let primary_keys = self
            .fetch_constraints_metadata(schema, tables, ConstraintKind::PrimaryKey)
            .await?;
        let unique_keys = self
            .fetch_constraints_metadata(schema, tables, ConstraintKind::Unique)
            .await?;
        let foreign_keys = self.fetch_fk_metadata(schema, tables).await?;

        Ok(CatalogSnapshot {
            columns,
            primary_keys,
            unique_keys,
            foreign_keys,
        })
    }

    /// Fetch the catalog for `tables` and synthesize one descriptor per table.
    pub async fn fetch_metadata(
        &mut self,
        schema: &str,
        tables: &[String],
    ) -> Result<Vec<TableDescriptor>> {
        let snapshot = self.fetch_snapshot(schema, tables).await?;
        Ok(synthesize(tables, &snapshot))
    }
}
