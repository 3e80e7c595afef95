//! Process configuration.
//!
//! Settings come from an optional `customers.{toml,json,yaml}` file in the
//! working directory, overridden by environment variables:
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `DB_URL` | `mongodb://localhost:27017` | MongoDB connection string |
//! | `DB_NAME` | none, required unless `APP_ENV=test` | database holding `customers` |
//! | `HOST` | `::` | listen address |
//! | `PORT` | `9999` | listen port |
//! | `APP_ENV` | `development` | `test` disables listening and the `DB_NAME` check |
//! | `LOG_LEVEL` | `info` | `trace`, `debug`, `info`, `warn` or `error` |

use std::net::{IpAddr, Ipv6Addr, SocketAddr};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::error::Error;

/// Database name used in test mode when `DB_NAME` is absent.
pub const TEST_DB_NAME: &str = "customers-test";

#[derive(Clone, Debug, Deserialize)]
pub struct Settings {
    #[serde(default = "default_db_url")]
    pub db_url: String,
    #[serde(default)]
    pub db_name: Option<String>,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_app_env")]
    pub app_env: String,
    #[serde(default)]
    pub log_level: Level,
}

fn default_db_url() -> String {
    "mongodb://localhost:27017".to_owned()
}

fn default_host() -> String {
    Ipv6Addr::UNSPECIFIED.to_string()
}

fn default_port() -> u16 {
    9999
}

fn default_app_env() -> String {
    "development".to_owned()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_url: default_db_url(),
            db_name: None,
            host: default_host(),
            port: default_port(),
            app_env: default_app_env(),
            log_level: Level::default(),
        }
    }
}

impl Settings {
    /// Reads the optional settings file and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_sources(Environment::default())
    }

    fn from_sources(env: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("customers").required(false))
            .add_source(env)
            .build()?
            .try_deserialize()
    }

    pub fn is_test(&self) -> bool {
        self.app_env == "test"
    }

    /// Outside test mode a database name must be configured.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.is_test() && self.db_name.is_none() {
            return Err(Error::MissingSetting("DB_NAME"));
        }
        Ok(())
    }

    pub fn database_name(&self) -> &str {
        self.db_name.as_deref().unwrap_or(TEST_DB_NAME)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, Error> {
        let ip: IpAddr = self.host.parse().map_err(|_| Error::InvalidSetting {
            key: "HOST",
            value: self.host.clone(),
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Maximum log level.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<Level> for tracing::Level {
    fn from(value: Level) -> Self {
        match value {
            Level::Trace => tracing::Level::TRACE,
            Level::Debug => tracing::Level::DEBUG,
            Level::Info => tracing::Level::INFO,
            Level::Warn => tracing::Level::WARN,
            Level::Error => tracing::Level::ERROR,
        }
    }
}
