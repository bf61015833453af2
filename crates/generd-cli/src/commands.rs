use std::collections::HashSet;
use std::time::Instant;

use generd_core::{
    ConnectionTarget, Error as CoreError, MetadataSummary, Result as CoreResult, TableDescriptor,
    summarize, validate_metadata,
};
use generd_introspect::CatalogSession;

use crate::artifact::write_metadata;
use crate::error::CliError;
use crate::settings::Settings;

/// Tables requested on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSelection {
    All,
    Named(Vec<String>),
}

impl TableSelection {
    pub fn from_flags(tables: Vec<String>, all_tables: bool) -> CoreResult<Self> {
        if all_tables {
            return Ok(TableSelection::All);
        }
        if tables.is_empty() {
            return Err(CoreError::UserInput(
                "select at least one table with --table or use --all-tables".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for table in &tables {
            if !seen.insert(table.as_str()) {
                return Err(CoreError::UserInput(format!(
                    "table `{table}` was selected more than once"
                )));
            }
        }
        Ok(TableSelection::Named(tables))
    }

    /// Check the selection against the tables the schema actually has.
    pub fn resolve(self, schema: &str, available: &[String]) -> CoreResult<Vec<String>> {
        match self {
            TableSelection::All if available.is_empty() => Err(CoreError::UserInput(format!(
                "schema `{schema}` has no tables"
            ))),
            TableSelection::All => Ok(available.to_vec()),
            TableSelection::Named(tables) => {
                if let Some(unknown) = tables.iter().find(|t| !available.contains(t)) {
                    return Err(CoreError::UserInput(format!(
                        "table `{unknown}` does not exist in schema `{schema}`"
                    )));
                }
                Ok(tables)
            }
        }
    }
}

fn check_schema(schema: &str, available: &[String]) -> CoreResult<()> {
    if available.iter().any(|s| s == schema) {
        Ok(())
    } else {
        Err(CoreError::UserInput(format!(
            "schema `{schema}` does not exist; available: {}",
            available.join(", ")
        )))
    }
}

async fn read_selection(
    session: &mut CatalogSession,
    schema: &str,
    selection: TableSelection,
) -> CoreResult<Vec<TableDescriptor>> {
    let mut reader = session.reader();
    check_schema(schema, &reader.fetch_schemas().await?)?;
    let available = reader.fetch_tables(schema).await?;
    let tables = selection.resolve(schema, &available)?;
    tracing::info!(event = "tables_selected", schema, tables = tables.len());
    reader.fetch_metadata(schema, &tables).await
}

/// Introspect the selection, write the artifact and print a summary.
pub async fn run_init(
    target: &ConnectionTarget,
    schema: &str,
    selection: TableSelection,
    settings: &Settings,
) -> Result<MetadataSummary, CliError> {
    let timer = Instant::now();
    tracing::info!(event = "run_started", engine = %target.engine(), schema);

    let mut session = CatalogSession::open(target).await?;
    let result = read_selection(&mut session, schema, selection).await;
    let metadata = session.finish(result).await?;
    validate_metadata(&metadata)?;

    write_metadata(&settings.output_path, &metadata)?;
    tracing::info!(
        event = "metadata_written",
        path = %settings.output_path.display()
    );

    let summary = summarize(&metadata);
    tracing::info!(
        event = "run_finished",
        status = "success",
        tables = summary.tables,
        foreign_keys = summary.foreign_keys,
        duration_ms = timer.elapsed().as_millis()
    );
    println!("{}", render_summary(&summary, settings));
    Ok(summary)
}

pub async fn run_schemas(target: &ConnectionTarget) -> Result<Vec<String>, CliError> {
    let mut session = CatalogSession::open(target).await?;
    let result = session.reader().fetch_schemas().await;
    Ok(session.finish(result).await?)
}

pub async fn run_tables(target: &ConnectionTarget, schema: &str) -> Result<Vec<String>, CliError> {
    let mut session = CatalogSession::open(target).await?;
    let result = read_tables(&mut session, schema).await;
    Ok(session.finish(result).await?)
}

async fn read_tables(session: &mut CatalogSession, schema: &str) -> CoreResult<Vec<String>> {
    let mut reader = session.reader();
    check_schema(schema, &reader.fetch_schemas().await?)?;
    reader.fetch_tables(schema).await
}

fn render_summary(summary: &MetadataSummary, settings: &Settings) -> String {
    let mut lines = vec![
        format!("Wrote {}", settings.output_path.display()),
        format!(
            "  {} tables, {} columns, {} foreign keys",
            summary.tables, summary.columns, summary.foreign_keys
        ),
    ];
    if !summary.join_tables.is_empty() {
        lines.push(format!("  join tables: {}", summary.join_tables.join(", ")));
    }
    if !summary.dangling_references.is_empty() {
        lines.push(format!(
            "  references outside the selection: {}",
            summary.dangling_references.join(", ")
        ));
    }
    lines.push(format!(
        "  serve with `generd serve` on port {}",
        settings.port
    ));
    lines.join("\n")
}
