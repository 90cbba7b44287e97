use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use anyhow::Context;

const DEFAULT_DB_PATH: &str = "todoApplication.db";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub db_path: PathBuf,
    pub host: IpAddr,
    pub port: u16,
    pub init_schema: bool,
}

impl Config {
    /// Reads `TODO_*` variables, loading a `.env` file first if present.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = lookup("TODO_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
        let host = match lookup("TODO_HOST") {
            Some(value) => value
                .parse::<IpAddr>()
                .with_context(|| format!("TODO_HOST is not an IP address: {value}"))?,
            None => DEFAULT_HOST.parse::<IpAddr>()?,
        };
        let port = match lookup("TODO_PORT") {
            Some(value) => value
                .parse::<u16>()
                .with_context(|| format!("TODO_PORT is not a port number: {value}"))?,
            None => DEFAULT_PORT,
        };
        let init_schema = match lookup("TODO_INIT_SCHEMA") {
            Some(value) => value
                .parse::<bool>()
                .with_context(|| format!("TODO_INIT_SCHEMA must be true or false: {value}"))?,
            None => false,
        };

        Ok(Self {
            db_path: PathBuf::from(db_path),
            host,
            port,
            init_schema,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_listen_on_port_3000() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.db_path, PathBuf::from("todoApplication.db"));
        assert_eq!(config.addr(), SocketAddr::from(([0, 0, 0, 0], 3000)));
        assert!(!config.init_schema);
    }

    #[test]
    fn overrides_are_applied() {
        let config = config_from(&[
            ("TODO_DB_PATH", "/tmp/todos.db"),
            ("TODO_HOST", "127.0.0.1"),
            ("TODO_PORT", "8080"),
            ("TODO_INIT_SCHEMA", "true"),
        ])
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/todos.db"));
        assert_eq!(config.addr(), SocketAddr::from(([127, 0, 0, 1], 8080)));
        assert!(config.init_schema);
    }

    #[test]
    fn bad_values_are_errors() {
        assert!(config_from(&[("TODO_PORT", "70000")]).is_err());
        assert!(config_from(&[("TODO_HOST", "localhost")]).is_err());
        assert!(config_from(&[("TODO_INIT_SCHEMA", "yes")]).is_err());
    }
}
