use async_trait::async_trait;
use tiberius::{AuthMethod, Client, Config, EncryptionLevel, Query, Row};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

use generd_core::{ConnectionParts, ConnectionTarget, Engine, Error, Result};

use super::{CatalogProvider, not_connected};
use crate::query::{CatalogQuery, CatalogRow, QueryParam};

/// Provider backed by a single tiberius SQL Server connection.
///
/// Only the login is encrypted and the server certificate is trusted as is.
pub struct MssqlProvider {
    parts: ConnectionParts,
    client: Option<Client<Compat<TcpStream>>>,
}

impl MssqlProvider {
    pub fn from_target(target: &ConnectionTarget) -> Result<Self> {
        Ok(Self {
            parts: target.parts()?,
            client: None,
        })
    }

    fn config(&self) -> Config {
        let mut config = Config::new();
        config.host(&self.parts.host);
        if let Some(port) = self.parts.port.or(Engine::Mssql.default_port()) {
            config.port(port);
        }
        if let Some(database) = &self.parts.database {
            config.database(database);
        }
        config.authentication(AuthMethod::sql_server(
            self.parts.user.as_deref().unwrap_or_default(),
            self.parts.password.as_deref().unwrap_or_default(),
        ));
        config.encryption(EncryptionLevel::Off);
        config.trust_cert();
        config
    }
}

fn mssql_error(action: &str, err: impl std::fmt::Display) -> Error {
    Error::Db(format!("{} {action} failed: {err}", Engine::Mssql))
}

/// Decode every column as nullable text; catalog queries only select strings.
fn decode_row(row: &Row) -> Result<CatalogRow> {
    let fields = row
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            let value: Option<&str> = row.try_get(idx).map_err(|err| {
                Error::Db(format!("failed to decode column `{}`: {err}", column.name()))
            })?;
            Ok((column.name().to_string(), value.map(str::to_string)))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CatalogRow::new(fields))
}

#[async_trait]
impl CatalogProvider for MssqlProvider {
    fn engine(&self) -> Engine {
        Engine::Mssql
    }

    async fn connect(&mut self) -> Result<()> {
        let config = self.config();
        let tcp = TcpStream::connect(config.get_addr())
            .await
            .map_err(|err| mssql_error("connect", err))?;
        tcp.set_nodelay(true)
            .map_err(|err| mssql_error("connect", err))?;

        let client = Client::connect(config, tcp.compat_write())
            .await
            .map_err(|err| mssql_error("connect", err))?;
        self.client = Some(client);
        Ok(())
    }

    async fn query(&mut self, query: &CatalogQuery) -> Result<Vec<CatalogRow>> {
        let client = self
            .client
            .as_mut()
            .ok_or_else(|| not_connected(Engine::Mssql))?;

        let mut statement = Query::new(query.sql.as_str());
        for param in &query.params {
            match param {
                QueryParam::Text(value) => statement.bind(value.as_str()),
                QueryParam::TextArray(_) => {
                    return Err(Error::Internal(
                        "mssql does not bind array parameters".to_string(),
                    ));
                }
            }
        }

        let rows = statement
            .query(client)
            .await
            .map_err(|err| mssql_error("query", err))?
            .into_first_result()
            .await
            .map_err(|err| mssql_error("query", err))?;
        rows.iter().map(decode_row).collect()
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(client) = self.client.take() {
            client
                .close()
                .await
                .map_err(|err| mssql_error("close", err))?;
        }
        Ok(())
    }
}
