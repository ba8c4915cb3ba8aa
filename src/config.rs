use std::env;
use std::path::PathBuf;

use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a valid port number, got {value:?}")]
    InvalidPort { name: &'static str, value: String },
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Server settings, read from `IOU_LEDGER_*` environment variables.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// JSON file with the users to start from
    pub seed: Option<PathBuf>,
    /// Only this origin may call the API when set
    pub cors_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = match lookup("IOU_LEDGER_HOST") {
            Some(host) if host.trim().is_empty() => return Err(ConfigError::Empty("IOU_LEDGER_HOST")),
            Some(host) => host,
            None => DEFAULT_HOST.to_string(),
        };
        let port = match lookup("IOU_LEDGER_PORT") {
            Some(value) => value.trim().parse::<u16>().map_err(|_| ConfigError::InvalidPort {
                name: "IOU_LEDGER_PORT",
                value,
            })?,
            None => DEFAULT_PORT,
        };
        let seed = lookup("IOU_LEDGER_SEED")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);
        let cors_origin = lookup("IOU_LEDGER_CORS_ORIGIN").filter(|origin| !origin.trim().is_empty());

        Ok(Config {
            host,
            port,
            seed,
            cors_origin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.seed, None);
        assert_eq!(config.cors_origin, None);
    }

    #[test]
    fn reads_every_variable() {
        let config = config_from(&[
            ("IOU_LEDGER_HOST", "127.0.0.1"),
            ("IOU_LEDGER_PORT", "9000"),
            ("IOU_LEDGER_SEED", "users.json"),
            ("IOU_LEDGER_CORS_ORIGIN", "https://example.org"),
        ])
        .unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9000);
        assert_eq!(config.seed, Some(PathBuf::from("users.json")));
        assert_eq!(config.cors_origin.as_deref(), Some("https://example.org"));
    }

    #[test]
    fn rejects_bad_port() {
        assert_eq!(
            config_from(&[("IOU_LEDGER_PORT", "http")]),
            Err(ConfigError::InvalidPort {
                name: "IOU_LEDGER_PORT",
                value: "http".to_string()
            })
        );
    }

    #[test]
    fn rejects_blank_host() {
        assert_eq!(
            config_from(&[("IOU_LEDGER_HOST", " ")]),
            Err(ConfigError::Empty("IOU_LEDGER_HOST"))
        );
    }
}
