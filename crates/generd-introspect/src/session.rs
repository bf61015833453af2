use generd_core::{ConnectionTarget, Engine, Result, TableDescriptor};

use crate::dialect::{CatalogDialect, dialect_for};
use crate::provider::{CatalogProvider, provider_for};
use crate::reader::CatalogReader;

/// An open provider paired with its engine's dialect.
///
/// Call [`CatalogSession::finish`] to close the connection; if the session
/// is dropped instead, the driver connection is dropped with it.
pub struct CatalogSession {
    provider: Box<dyn CatalogProvider>,
    dialect: &'static dyn CatalogDialect,
}

impl CatalogSession {
    /// Open a session for a connection target.
    pub async fn open(target: &ConnectionTarget) -> Result<Self> {
        tracing::info!(
            event = "connect_started",
            engine = %target.engine(),
            connection = %target.redacted().redacted
        );
        Self::connect(provider_for(target)?).await
    }

    /// Connect an already constructed provider.
    pub async fn connect(mut provider: Box<dyn CatalogProvider>) -> Result<Self> {
        provider.connect().await?;
        let dialect = dialect_for(provider.engine());
        tracing::info!(event = "connected", engine = %provider.engine());
        Ok(Self { provider, dialect })
    }

    pub fn engine(&self) -> Engine {
        self.provider.engine()
    }

    pub fn reader(&mut self) -> CatalogReader<'_> {
        CatalogReader::new(self.provider.as_mut(), self.dialect)
    }

    /// Close the connection and hand back `result`.
    ///
    /// An error from `result` wins over an error from closing.
    pub async fn finish<T>(mut self, result: Result<T>) -> Result<T> {
        let closed = self.provider.close().await;
        tracing::debug!(event = "connection_closed", ok = closed.is_ok());

        match (result, closed) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(err)) => Err(err),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(close_err)) => {
                tracing::warn!(event = "close_failed", error = %close_err);
                Err(err)
            }
        }
    }
}

/// Connect, read the catalog for `tables`, synthesize, and close.
pub async fn introspect(
    provider: Box<dyn CatalogProvider>,
    schema: &str,
    tables: &[String],
) -> Result<Vec<TableDescriptor>> {
    let mut session = CatalogSession::connect(provider).await?;
    let result = session.reader().fetch_metadata(schema, tables).await;
    session.finish(result).await
}

/// Like [`introspect`] but selects the provider from the target's engine.
pub async fn introspect_target(
    target: &ConnectionTarget,
    schema: &str,
    tables: &[String],
) -> Result<Vec<TableDescriptor>> {
    introspect(provider_for(target)?, schema, tables).await
}
