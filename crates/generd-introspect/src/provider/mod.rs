//! Connection and query providers, one per engine driver.

use async_trait::async_trait;
use sqlx::{Column, Decode, Row, Type};

use generd_core::{ConnectionTarget, Engine, Error, Result};

use crate::query::{CatalogQuery, CatalogRow};

mod mssql;
mod mysql;
mod postgres;
mod sqlite;

pub use mssql::MssqlProvider;
pub use mysql::MysqlProvider;
pub use postgres::PostgresProvider;
pub use sqlite::SqliteProvider;

/// A single database connection able to run catalog queries.
///
/// Queries run one at a time on one connection. Dropping a provider releases
/// its connection even when `close` was never reached.
#[async_trait]
pub trait CatalogProvider: Send {
    fn engine(&self) -> Engine;

    async fn connect(&mut self) -> Result<()>;

    async fn query(&mut self, query: &CatalogQuery) -> Result<Vec<CatalogRow>>;

    async fn close(&mut self) -> Result<()>;
}

/// Select the provider for the target's engine.
pub fn provider_for(target: &ConnectionTarget) -> Result<Box<dyn CatalogProvider>> {
    match target.engine() {
        Engine::Postgres => Ok(Box::new(PostgresProvider::new(target.url()))),
        Engine::Mysql => Ok(Box::new(MysqlProvider::new(target.url()))),
        Engine::Sqlite => Ok(Box::new(SqliteProvider::new(target.url()))),
        Engine::Mssql => Ok(Box::new(MssqlProvider::from_target(target)?)),
        Engine::Oracle => Err(Error::Unsupported(format!(
            "no {} driver is built into this binary",
            Engine::Oracle
        ))),
    }
}

fn not_connected(engine: Engine) -> Error {
    Error::Db(format!("{engine} connection is not open"))
}

fn driver_error(engine: Engine, action: &str, err: sqlx::Error) -> Error {
    Error::Db(format!("{engine} {action} failed: {err}"))
}

/// Decode every column of a driver row as nullable text.
fn decode_row<R>(row: &R) -> Result<CatalogRow>
where
    R: Row,
    usize: sqlx::ColumnIndex<R>,
    for<'r> Option<String>: Decode<'r, R::Database> + Type<R::Database>,
{
    let fields = row
        .columns()
        .iter()
        .map(|column| {
            let value: Option<String> = row.try_get(column.ordinal()).map_err(|err| {
                Error::Db(format!("failed to decode column `{}`: {err}", column.name()))
            })?;
            Ok((column.name().to_string(), value))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CatalogRow::new(fields))
}
