use async_trait::async_trait;
use sqlx::{Connection, MySqlConnection};

use generd_core::{Engine, Error, Result};

use super::{CatalogProvider, decode_row, driver_error, not_connected};
use crate::query::{CatalogQuery, CatalogRow, QueryParam};

/// Provider backed by a single sqlx MySQL connection.
pub struct MysqlProvider {
    url: String,
    conn: Option<MySqlConnection>,
}

impl MysqlProvider {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            conn: None,
        }
    }
}

#[async_trait]
impl CatalogProvider for MysqlProvider {
    fn engine(&self) -> Engine {
        Engine::Mysql
    }

    async fn connect(&mut self) -> Result<()> {
        let conn = MySqlConnection::connect(&self.url)
            .await
            .map_err(|err| driver_error(Engine::Mysql, "connect", err))?;
        self.conn = Some(conn);
        Ok(())
    }

    async fn query(&mut self, query: &CatalogQuery) -> Result<Vec<CatalogRow>> {
        let conn = self
            .conn
            .as_mut()
            .ok_or_else(|| not_connected(Engine::Mysql))?;

        let mut statement = sqlx::query(&query.sql);
        for param in &query.params {
            statement = match param {
                QueryParam::Text(value) => statement.bind(value.clone()),
                QueryParam::TextArray(_) => {
                    return Err(Error::Internal(
                        "mysql does not bind array parameters".to_string(),
                    ));
                }
            };
        }

        let rows = statement
            .fetch_all(&mut *conn)
            .await
            .map_err(|err| driver_error(Engine::Mysql, "query", err))?;
        rows.iter().map(decode_row).collect()
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            conn.close()
                .await
                .map_err(|err| driver_error(Engine::Mysql, "close", err))?;
        }
        Ok(())
    }
}
