use async_trait::async_trait;
use sqlx::{Connection, SqliteConnection};

use generd_core::{Engine, Error, Result};

use super::{CatalogProvider, decode_row, driver_error, not_connected};
use crate::query::{CatalogQuery, CatalogRow, QueryParam};

/// Provider backed by a single sqlx SQLite connection.
///
/// The database file must already exist; it is never created.
pub struct SqliteProvider {
    url: String,
    conn: Option<SqliteConnection>,
}

impl SqliteProvider {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            conn: None,
        }
    }
}

#[async_trait]
impl CatalogProvider for SqliteProvider {
    fn engine(&self) -> Engine {
        Engine::Sqlite
    }

    async fn connect(&mut self) -> Result<()> {
        let conn = SqliteConnection::connect(&self.url)
            .await
            .map_err(|err| driver_error(Engine::Sqlite, "connect", err))?;
        self.conn = Some(conn);
        Ok(())
    }

    async fn query(&mut self, query: &CatalogQuery) -> Result<Vec<CatalogRow>> {
        let conn = self
            .conn
            .as_mut()
            .ok_or_else(|| not_connected(Engine::Sqlite))?;

        let mut statement = sqlx::query(&query.sql);
        for param in &query.params {
            statement = match param {
                QueryParam::Text(value) => statement.bind(value.clone()),
                QueryParam::TextArray(_) => {
                    return Err(Error::Internal(
                        "sqlite does not bind array parameters".to_string(),
                    ));
                }
            };
        }

        let rows = statement
            .fetch_all(&mut *conn)
            .await
            .map_err(|err| driver_error(Engine::Sqlite, "query", err))?;
        rows.iter().map(decode_row).collect()
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            conn.close()
                .await
                .map_err(|err| driver_error(Engine::Sqlite, "close", err))?;
        }
        Ok(())
    }
}
