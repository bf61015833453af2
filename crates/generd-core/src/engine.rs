use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Database engines with a catalog dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Engine {
    Postgres,
    Mysql,
    Mssql,
    Sqlite,
    Oracle,
}

impl Engine {
    pub const ALL: [Engine; 5] = [
        Engine::Postgres,
        Engine::Mysql,
        Engine::Mssql,
        Engine::Sqlite,
        Engine::Oracle,
    ];

    /// Stable identifier used in configuration and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Engine::Postgres => "postgres",
            Engine::Mysql => "mysql",
            Engine::Mssql => "mssql",
            Engine::Sqlite => "sqlite",
            Engine::Oracle => "oracle",
        }
    }

    /// Port used when individual connection fields omit one.
    pub fn default_port(self) -> Option<u16> {
        match self {
            Engine::Postgres => Some(5432),
            Engine::Mysql => Some(3306),
            Engine::Mssql => Some(1433),
            Engine::Sqlite => None,
            Engine::Oracle => Some(1521),
        }
    }

    /// Connection string prefixes accepted for this engine.
    pub fn url_prefixes(self) -> &'static [&'static str] {
        match self {
            Engine::Postgres => &["postgresql://", "postgres://"],
            Engine::Mysql => &["mysql://"],
            Engine::Mssql => &["mssql://"],
            Engine::Sqlite => &["sqlite://", "sqlite:", "file:"],
            Engine::Oracle => &["oracle://"],
        }
    }

    /// Whether the engine is file based rather than reached over the network.
    pub fn is_file_based(self) -> bool {
        matches!(self, Engine::Sqlite)
    }

    /// Detect the engine from a connection string prefix.
    pub fn from_url(url: &str) -> Result<Engine> {
        Engine::ALL
            .into_iter()
            .find(|engine| {
                engine
                    .url_prefixes()
                    .iter()
                    .any(|prefix| url.starts_with(prefix))
            })
            .ok_or_else(|| {
                let accepted: Vec<&str> = Engine::ALL
                    .iter()
                    .flat_map(|engine| engine.url_prefixes().iter().copied())
                    .collect();
                Error::UserInput(format!(
                    "unrecognized connection string; must start with one of {}",
                    accepted.join(", ")
                ))
            })
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Engine {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Engine::Postgres),
            "mysql" | "mariadb" => Ok(Engine::Mysql),
            "mssql" | "sqlserver" => Ok(Engine::Mssql),
            "sqlite" => Ok(Engine::Sqlite),
            "oracle" => Ok(Engine::Oracle),
            other => Err(Error::UserInput(format!("unsupported engine: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tags_and_aliases() {
        assert_eq!("postgresql".parse::<Engine>().unwrap(), Engine::Postgres);
        assert_eq!("MySQL".parse::<Engine>().unwrap(), Engine::Mysql);
        assert_eq!("sqlserver".parse::<Engine>().unwrap(), Engine::Mssql);
        assert!(matches!(
            "db2".parse::<Engine>(),
            Err(Error::UserInput(message)) if message.contains("db2")
        ));
    }

    #[test]
    fn detects_engine_from_url() {
        assert_eq!(
            Engine::from_url("postgres://u:p@localhost/db").unwrap(),
            Engine::Postgres
        );
        assert_eq!(Engine::from_url("file:erd.db").unwrap(), Engine::Sqlite);
        assert_eq!(
            Engine::from_url("oracle://u:p@host:1521/XE").unwrap(),
            Engine::Oracle
        );
        assert!(Engine::from_url("http://localhost").is_err());
    }

    #[test]
    fn tags_round_trip_through_display() {
        for engine in Engine::ALL {
            assert_eq!(engine.to_string().parse::<Engine>().unwrap(), engine);
        }
    }
}
