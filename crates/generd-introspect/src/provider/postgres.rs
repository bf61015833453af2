use async_trait::async_trait;
use sqlx::{Connection, PgConnection};

use generd_core::{Engine, Result};

use super::{CatalogProvider, decode_row, driver_error, not_connected};
use crate::query::{CatalogQuery, CatalogRow, QueryParam};

/// Provider backed by a single sqlx Postgres connection.
pub struct PostgresProvider {
    url: String,
    conn: Option<PgConnection>,
}

impl PostgresProvider {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            conn: None,
        }
    }
}

#[async_trait]
impl CatalogProvider for PostgresProvider {
    fn engine(&self) -> Engine {
        Engine::Postgres
    }

    async fn connect(&mut self) -> Result<()> {
        let conn = PgConnection::connect(&self.url)
            .await
            .map_err(|err| driver_error(Engine::Postgres, "connect", err))?;
        self.conn = Some(conn);
        Ok(())
    }

    async fn query(&mut self, query: &CatalogQuery) -> Result<Vec<CatalogRow>> {
        let conn = self
            .conn
            .as_mut()
            .ok_or_else(|| not_connected(Engine::Postgres))?;

        let mut statement = sqlx::query(&query.sql);
        for param in &query.params {
            statement = match param {
                QueryParam::Text(value) => statement.bind(value.clone()),
                QueryParam::TextArray(values) => statement.bind(values.clone()),
            };
        }

        let rows = statement
            .fetch_all(&mut *conn)
            .await
            .map_err(|err| driver_error(Engine::Postgres, "query", err))?;
        rows.iter().map(decode_row).collect()
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            conn.close()
                .await
                .map_err(|err| driver_error(Engine::Postgres, "close", err))?;
        }
        Ok(())
    }
}
