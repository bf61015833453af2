use std::io;

use generd_core::{Error as CoreError, ErrorKind};
use thiserror::Error;

use crate::settings::SettingsError;

pub const EXIT_INTERNAL: u8 = 1;
pub const EXIT_USER_INPUT: u8 = 2;
pub const EXIT_DATABASE: u8 = 3;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("logging setup failed: {0}")]
    Logging(String),
    #[error("metadata artifact not found at {0}; run `generd init` first")]
    MissingArtifact(String),
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Core(err) => match err.kind() {
                ErrorKind::UserInput => EXIT_USER_INPUT,
                ErrorKind::Database => EXIT_DATABASE,
                ErrorKind::Internal => EXIT_INTERNAL,
            },
            CliError::Settings(_) | CliError::MissingArtifact(_) => EXIT_USER_INPUT,
            CliError::Io(_) | CliError::Json(_) | CliError::Logging(_) => EXIT_INTERNAL,
        }
    }

    /// Message for the terminal; internal failures stay generic unless `debug`.
    pub fn report(&self, debug: bool) -> String {
        if self.exit_code() == EXIT_INTERNAL && !debug {
            "an unexpected error occurred; set GENERD_DEBUG=1 for details".to_string()
        } else {
            self.to_string()
        }
    }
}
