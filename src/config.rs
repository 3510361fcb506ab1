//! A little hard-coded config, plus whatever the environment tells us about
//! where to listen and which store to use.

use std::{env, net::SocketAddr};
use thiserror::Error;

/// Every note route hangs off of this path.
pub const BASE_PATH: &str = "/api/v1/notes";

// Lengths are counted in Unicode scalar values (`str::chars`), which is also
// what Postgres `char_length` counts, so the validator and the table's check
// constraints agree. .NET's `MinLength`/`MaxLength` count UTF-16 code units
// instead; the two differ only for characters outside the BMP, e.g. emoji.
pub const TITLE_MIN_LEN: usize = 3;
pub const TITLE_MAX_LEN: usize = 255;
pub const CONTENT_MAX_LEN: usize = 65535;

/// Leaves headroom under Postgres' default `max_connections` of 100.
pub const PG_MAX_CONNECTIONS: u32 = 80;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be defined in environment")]
    Missing(&'static str),
    #[error("{var} has an invalid value: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PgConfig {
    pub user: String,
    pub password: String,
    pub db: String,
    pub host: String,
    pub port: u16,
}

impl PgConfig {
    pub fn url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.db
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Postgres(PgConfig),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub store: StoreBackend,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// `lookup` stands in for the process environment so tests don't have to
    /// mutate global state.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_raw =
            lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
        let bind_addr =
            bind_raw.parse().map_err(|_| ConfigError::Invalid {
                var: "BIND_ADDR",
                value: bind_raw.clone(),
            })?;

        let store = match lookup("NOTES_STORE").as_deref() {
            None | Some("memory") => StoreBackend::Memory,
            Some("postgres") => StoreBackend::Postgres(pg_from_lookup(&lookup)?),
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "NOTES_STORE",
                    value: other.to_string(),
                })
            }
        };

        Ok(Config { bind_addr, store })
    }
}

fn pg_from_lookup<F>(lookup: &F) -> Result<PgConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let required = |var: &'static str| lookup(var).ok_or(ConfigError::Missing(var));
    let port = match lookup("POSTGRES_PORT") {
        Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
            var: "POSTGRES_PORT",
            value: raw,
        })?,
        None => 5432,
    };

    Ok(PgConfig {
        user: required("POSTGRES_USER")?,
        password: required("POSTGRES_PASSWORD")?,
        db: required("POSTGRES_DB")?,
        host: lookup("POSTGRES_HOST").unwrap_or_else(|| "localhost".into()),
        port,
    })
}
