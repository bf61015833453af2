use std::io;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::prelude::*;

use crate::error::CliError;
use crate::settings::SettingsError;

pub const LOG_ENV: &str = "GENERD_LOG";

/// Install the global subscriber writing to stderr.
///
/// `GENERD_LOG` takes precedence over the configured filter.
pub fn init_logging(configured_filter: &str, json: bool) -> Result<(), CliError> {
    let filter = build_filter(std::env::var(LOG_ENV).ok().as_deref(), configured_filter)?;

    let result = if json {
        let layer = tracing_subscriber::fmt::layer()
            .json()
            .with_timer(UtcTime::rfc_3339())
            .with_writer(io::stderr);
        tracing_subscriber::registry()
            .with(filter)
            .with(layer)
            .try_init()
    } else {
        let layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(io::stderr);
        tracing_subscriber::registry()
            .with(filter)
            .with(layer)
            .try_init()
    };

    result.map_err(|err| CliError::Logging(err.to_string()))
}

fn build_filter(from_env: Option<&str>, configured: &str) -> Result<EnvFilter, SettingsError> {
    let directives = from_env
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(configured);
    EnvFilter::try_new(directives).map_err(|err| {
        SettingsError::Invalid(format!("invalid log filter `{directives}`: {err}"))
    })
}
