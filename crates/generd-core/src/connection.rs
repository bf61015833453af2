//! Connection targets built from a connection string or individual fields.

use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::redaction::{RedactedConnection, redact_connection};

/// Connection parameters collected field by field.
#[derive(Debug, Clone, Default)]
pub struct ConnectionFields {
    pub host: String,
    pub port: Option<u16>,
    pub user: String,
    pub password: String,
    /// Database name, or the database file path for SQLite.
    pub database: String,
}

/// Decoded address and credentials of a network connection string.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionParts {
    pub host: String,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
}

impl std::fmt::Debug for ConnectionParts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionParts")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("database", &self.database)
            .finish()
    }
}

/// A validated connection string for a known engine.
#[derive(Clone)]
pub struct ConnectionTarget {
    engine: Engine,
    url: String,
}

impl ConnectionTarget {
    /// Validate a connection string, detecting the engine from its prefix.
    ///
    /// When `expected` is given the detected engine must match it.
    pub fn from_url(url: &str, expected: Option<Engine>) -> Result<Self> {
        let url = url.trim();
        if url.is_empty() {
            return Err(Error::UserInput(
                "connection string cannot be empty".to_string(),
            ));
        }

        let engine = Engine::from_url(url)?;
        if let Some(expected) = expected {
            if expected != engine {
                return Err(Error::UserInput(format!(
                    "connection string is for {engine} but engine {expected} was selected"
                )));
            }
        }

        let url = if engine == Engine::Sqlite {
            sqlite_url(url)
        } else {
            url.to_string()
        };

        Ok(Self { engine, url })
    }

    /// Build a connection string from individual fields.
    pub fn from_fields(engine: Engine, fields: &ConnectionFields) -> Result<Self> {
        let database = required("database", &fields.database)?;

        if engine.is_file_based() {
            return Ok(Self {
                engine,
                url: format!("sqlite://{database}"),
            });
        }

        let host = required("host", &fields.host)?;
        let user = required("username", &fields.user)?;
        let password = required("password", &fields.password)?;
        let port = match fields.port.or(engine.default_port()) {
            Some(0) | None => {
                return Err(Error::UserInput(
                    "port must be a number between 1 and 65535".to_string(),
                ));
            }
            Some(port) => port,
        };

        let scheme = engine.url_prefixes()[0];
        Ok(Self {
            engine,
            url: format!(
                "{scheme}{}:{}@{host}:{port}/{}",
                encode_component(user),
                encode_component(password),
                encode_component(database)
            ),
        })
    }

    pub fn engine(&self) -> Engine {
        self.engine
    }

    /// Full connection string, secrets included. Never log this.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Split a network connection string into decoded parts.
    ///
    /// Drivers without a URL-based connect, such as SQL Server, build their
    /// configuration from these.
    pub fn parts(&self) -> Result<ConnectionParts> {
        if self.engine.is_file_based() {
            return Err(Error::UserInput(format!(
                "{} connection strings have no network address",
                self.engine
            )));
        }
        let after_scheme = self
            .url
            .split_once("://")
            .map(|(_, rest)| rest)
            .ok_or_else(|| Error::UserInput("connection string has no scheme".to_string()))?;

        let before_query = after_scheme.split('?').next().unwrap_or("");
        let (userinfo, rest) = match before_query.rfind('@') {
            Some(at_idx) => (Some(&after_scheme[..at_idx]), &after_scheme[at_idx + 1..]),
            None => (None, after_scheme),
        };
        let host_end = rest.find(['/', '?']).unwrap_or(rest.len());
        let (host, port) = match rest[..host_end].rsplit_once(':') {
            Some((host, port)) => {
                let port = port.parse::<u16>().ok().filter(|p| *p != 0).ok_or_else(|| {
                    Error::UserInput(format!("invalid port `{port}` in connection string"))
                })?;
                (host, Some(port))
            }
            None => (&rest[..host_end], None),
        };
        if host.is_empty() {
            return Err(Error::UserInput(
                "connection string has no host".to_string(),
            ));
        }

        let (user, password) = match userinfo.map(|info| info.split_once(':').ok_or(info)) {
            Some(Ok((user, password))) => (
                Some(decode_component(user)),
                Some(decode_component(password)),
            ),
            Some(Err(user)) => (Some(decode_component(user)), None),
            None => (None, None),
        };
        let database = rest[host_end..]
            .trim_start_matches('/')
            .split('?')
            .next()
            .filter(|db| !db.is_empty())
            .map(decode_component);

        Ok(ConnectionParts {
            host: host.to_string(),
            port,
            user,
            password,
            database,
        })
    }

    /// Connection metadata safe to log or display.
    pub fn redacted(&self) -> RedactedConnection {
        redact_connection(self.engine, &self.url)
    }
}

impl std::fmt::Debug for ConnectionTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionTarget")
            .field("engine", &self.engine)
            .field("url", &self.redacted().redacted)
            .finish()
    }
}

fn required<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        Err(Error::UserInput(format!("{field} cannot be empty")))
    } else {
        Ok(value)
    }
}

fn sqlite_url(url: &str) -> String {
    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .or_else(|| url.strip_prefix("file:"))
        .unwrap_or(url);
    format!("sqlite://{path}")
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
fn encode_component(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                encoded.push(byte as char)
            }
            other => encoded.push_str(&format!("%{other:02X}")),
        }
    }
    encoded
}

/// Reverse of [`encode_component`]; malformed escapes are kept verbatim.
fn decode_component(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut idx = 0;
    while idx < bytes.len() {
        let escaped = (bytes[idx] == b'%')
            .then(|| value.get(idx + 1..idx + 3))
            .flatten()
            .and_then(|hex| u8::from_str_radix(hex, 16).ok());
        match escaped {
            Some(byte) => {
                decoded.push(byte);
                idx += 3;
            }
            None => {
                decoded.push(bytes[idx]);
                idx += 1;
            }
        }
    }
    String::from_utf8_lossy(&decoded).into_owned()
}
